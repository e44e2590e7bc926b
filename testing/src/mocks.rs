//! In-memory implementations of the race environment traits.
//!
//! - [`InMemoryStateStore`]: HashMap-backed state with injectable read/write failures
//! - [`StaticScheduleChecker`]: fixed schedule answer, records every lookup
//! - [`RecordingNotifier`]: captures posted events, can be told to fail
//! - [`RecordingIotSync`]: counts sync triggers and lets tests wait for them
//! - [`FixedClock`]: deterministic time

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Mutexes here are never poisoned

use chrono::{DateTime, NaiveDate, Utc};
use race_admin_core::{
    BoxFuture, Clock, DemoZone, EventNotifier, IotSync, NotifyError, RaceEvent, ScheduleChecker,
    StateKey, StateStore, StoreError, SyncError, SyncOutcome,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// In-memory state store.
///
/// Reads of a key that was never written fail like a missing file.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStateStore {
    values: Arc<Mutex<HashMap<StateKey, String>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryStateStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a raw value directly, bypassing failure injection.
    pub fn insert(&self, key: StateKey, value: impl Into<String>) {
        self.values.lock().unwrap().insert(key, value.into());
    }

    /// Raw value currently held for `key`.
    #[must_use]
    pub fn value(&self, key: &StateKey) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Make every subsequent read fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl StateStore for InMemoryStateStore {
    fn get(&self, key: &StateKey) -> BoxFuture<'_, Result<String, StoreError>> {
        let key = key.clone();
        Box::pin(async move {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StoreError::Read {
                    key,
                    reason: "injected read failure".to_string(),
                });
            }
            self.values
                .lock()
                .unwrap()
                .get(&key)
                .cloned()
                .ok_or_else(|| StoreError::Read {
                    key,
                    reason: "no such slot".to_string(),
                })
        })
    }

    fn set(&self, key: &StateKey, value: &str) -> BoxFuture<'_, Result<(), StoreError>> {
        let key = key.clone();
        let value = value.to_string();
        Box::pin(async move {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Write {
                    key,
                    reason: "injected write failure".to_string(),
                });
            }
            self.values.lock().unwrap().insert(key, value);
            Ok(())
        })
    }
}

/// Schedule checker with a fixed answer.
#[derive(Clone, Debug)]
pub struct StaticScheduleChecker {
    scheduled: Arc<AtomicBool>,
    lookups: Arc<Mutex<Vec<(DemoZone, NaiveDate)>>>,
}

impl StaticScheduleChecker {
    /// Create a checker that always answers `scheduled`.
    #[must_use]
    pub fn new(scheduled: bool) -> Self {
        Self {
            scheduled: Arc::new(AtomicBool::new(scheduled)),
            lookups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Change the answer.
    pub fn set_scheduled(&self, scheduled: bool) {
        self.scheduled.store(scheduled, Ordering::SeqCst);
    }

    /// Every `(zone, date)` looked up so far.
    #[must_use]
    pub fn lookups(&self) -> Vec<(DemoZone, NaiveDate)> {
        self.lookups.lock().unwrap().clone()
    }
}

impl ScheduleChecker for StaticScheduleChecker {
    fn is_scheduled(&self, zone: &DemoZone, date: NaiveDate) -> BoxFuture<'_, bool> {
        self.lookups.lock().unwrap().push((zone.clone(), date));
        let scheduled = self.scheduled.load(Ordering::SeqCst);
        Box::pin(async move { scheduled })
    }
}

/// Event notifier that records events instead of posting them.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<RaceEvent>>>,
    should_fail: Arc<AtomicBool>,
}

impl RecordingNotifier {
    /// Create a notifier that accepts every event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent notifications fail (the event is still recorded).
    pub fn fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Events received so far.
    #[must_use]
    pub fn events(&self) -> Vec<RaceEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventNotifier for RecordingNotifier {
    fn notify(&self, event: RaceEvent) -> BoxFuture<'_, Result<(), NotifyError>> {
        self.events.lock().unwrap().push(event);
        let fail = self.should_fail.load(Ordering::SeqCst);
        Box::pin(async move {
            if fail {
                Err(NotifyError::Rejected {
                    status: 503,
                    message: "injected notify failure".to_string(),
                })
            } else {
                Ok(())
            }
        })
    }
}

/// IoT sync double that counts triggers.
#[derive(Clone, Debug)]
pub struct RecordingIotSync {
    zones: Arc<Mutex<Vec<DemoZone>>>,
    calls: Arc<AtomicUsize>,
    called: Arc<Notify>,
    outcome: Arc<Mutex<Result<SyncOutcome, SyncError>>>,
}

impl Default for RecordingIotSync {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingIotSync {
    /// Create a double whose triggers succeed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zones: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            called: Arc::new(Notify::new()),
            outcome: Arc::new(Mutex::new(Ok(SyncOutcome::Triggered))),
        }
    }

    /// Set the result returned by subsequent triggers.
    pub fn respond_with(&self, outcome: Result<SyncOutcome, SyncError>) {
        *self.outcome.lock().unwrap() = outcome;
    }

    /// Number of triggers so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Zones triggered so far.
    #[must_use]
    pub fn zones(&self) -> Vec<DemoZone> {
        self.zones.lock().unwrap().clone()
    }

    /// Wait until at least `count` triggers happened, or `timeout` elapsed.
    ///
    /// Returns whether the count was reached.
    pub async fn wait_for_calls(&self, count: usize, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, async {
            loop {
                let notified = self.called.notified();
                if self.calls() >= count {
                    return;
                }
                notified.await;
            }
        })
        .await
        .is_ok()
    }
}

impl IotSync for RecordingIotSync {
    fn trigger_sync(&self, zone: &DemoZone) -> BoxFuture<'_, Result<SyncOutcome, SyncError>> {
        let zone = zone.clone();
        Box::pin(async move {
            self.zones.lock().unwrap().push(zone);
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.called.notify_waiters();
            self.outcome.lock().unwrap().clone()
        })
    }
}

/// Fixed clock for deterministic tests.
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time.
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

/// Create a default fixed clock for tests (2025-01-01 10:00:00 UTC).
#[must_use]
pub fn test_clock() -> FixedClock {
    FixedClock::new(
        DateTime::parse_from_rfc3339("2025-01-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc),
    )
}

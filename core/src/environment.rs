//! Environment module - dependency injection traits.
//!
//! Every external collaborator of the race controller sits behind a trait in
//! this module: the flat-file store, the schedule lookup, the event service,
//! the IoT integration and the clock. Production implementations live in the
//! `race-admin-store` and `race-admin-clients` crates; in-memory doubles live
//! in `race-admin-testing`.
//!
//! # Dyn Compatibility
//!
//! The traits return `Pin<Box<dyn Future>>` instead of using `async fn` so the
//! controller can hold them as `Arc<dyn Trait>`.

use crate::error::{NotifyError, StoreError, SyncError};
use crate::types::{CarId, DemoZone, RaceId, RaceStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed, sendable future returned by the environment traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A scalar slot in the persistent race state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StateKey {
    /// Demo zone of this installation.
    DemoZone,
    /// Current race id.
    RaceId,
    /// Current race status.
    RaceStatus,
    /// Lap counter of one car.
    LapCount(CarId),
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DemoZone => f.write_str("demo zone"),
            Self::RaceId => f.write_str("race id"),
            Self::RaceStatus => f.write_str("race status"),
            Self::LapCount(car) => write!(f, "lap count of {car}"),
        }
    }
}

/// Key/value access to the persisted race state.
///
/// Each key is an independent slot: writing one never touches another, so a
/// sequence of writes can be interrupted half-way.
pub trait StateStore: Send + Sync {
    /// Read the raw text stored for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the slot cannot be read.
    fn get(&self, key: &StateKey) -> BoxFuture<'_, Result<String, StoreError>>;

    /// Overwrite the slot for `key` with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the slot cannot be written.
    fn set(&self, key: &StateKey, value: &str) -> BoxFuture<'_, Result<(), StoreError>>;
}

/// Lookup of the demo schedule.
///
/// Implementations are fail-closed: any transport or remote error must resolve
/// to `false`, so there is no error channel.
pub trait ScheduleChecker: Send + Sync {
    /// Whether a demo is scheduled for `zone` on `date`.
    fn is_scheduled(&self, zone: &DemoZone, date: NaiveDate) -> BoxFuture<'_, bool>;
}

/// Race lifecycle event posted to the event service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceEvent {
    /// Zone the race runs in.
    pub demozone: DemoZone,
    /// Race the event is about.
    pub race_id: RaceId,
    /// Status after the transition.
    pub race_status: RaceStatus,
    /// When the transition happened.
    pub timestamp: DateTime<Utc>,
}

/// Delivery of race lifecycle events.
pub trait EventNotifier: Send + Sync {
    /// Post a single event. No retry is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the event was not accepted.
    fn notify(&self, event: RaceEvent) -> BoxFuture<'_, Result<(), NotifyError>>;
}

/// What the IoT sync trigger ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The integration accepted the sync request.
    Triggered,
    /// Nothing was sent (no integration configured, or the lookup failed).
    Skipped {
        /// Why the sync was skipped.
        reason: String,
    },
}

/// Best-effort "sync now" trigger for the zone's IoT integration.
pub trait IotSync: Send + Sync {
    /// Trigger a sync for `zone`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the trigger request itself failed or was not
    /// accepted. Lookup problems are reported as [`SyncOutcome::Skipped`].
    fn trigger_sync(&self, zone: &DemoZone) -> BoxFuture<'_, Result<SyncOutcome, SyncError>>;
}

/// Clock trait - abstracts time operations for testability.
pub trait Clock: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// All collaborators of the race controller.
#[derive(Clone)]
pub struct RaceEnvironment {
    /// Persistent race state.
    pub store: Arc<dyn StateStore>,
    /// Demo schedule lookup.
    pub schedule: Arc<dyn ScheduleChecker>,
    /// Event delivery.
    pub notifier: Arc<dyn EventNotifier>,
    /// IoT sync trigger.
    pub iot_sync: Arc<dyn IotSync>,
    /// Source of the current date and event timestamps.
    pub clock: Arc<dyn Clock>,
}

impl fmt::Debug for RaceEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RaceEnvironment").finish_non_exhaustive()
    }
}

//! Race lifecycle controller.
//!
//! # State Machine
//!
//! ```text
//!            start (scheduled)
//!   STOPPED ──────────────────▶ RACING
//!      ▲                          │
//!      └──────────────────────────┘
//!                 stop
//! ```
//!
//! - `start` while `STOPPED` checks the demo schedule, bumps the race id,
//!   zeroes the lap counters, persists `RACING` and posts the event.
//! - `stop` while `RACING` persists `STOPPED`, posts the event and then spawns
//!   the IoT sync in the background.
//! - Repeating the current state is rejected without touching anything.
//!
//! State is always written before the event is posted. A failed notification
//! is reported to the caller but the status change is kept.

use crate::environment::{IotSync, RaceEnvironment, RaceEvent, SyncOutcome};
use crate::error::{RaceError, Result};
use crate::state::RaceStateStore;
use crate::types::{CarId, DemoZone, RaceId, RaceOp, RaceOutcome, RaceStatus};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Orchestrates start/stop of the race for one demo zone.
#[derive(Debug, Clone)]
pub struct RaceController {
    zone: DemoZone,
    state: RaceStateStore,
    env: RaceEnvironment,
}

impl RaceController {
    /// Create a controller for `zone`, tracking lap counters for `cars`.
    #[must_use]
    pub fn new(zone: DemoZone, cars: Vec<CarId>, env: RaceEnvironment) -> Self {
        let state = RaceStateStore::new(Arc::clone(&env.store), cars);
        Self { zone, state, env }
    }

    /// Demo zone this controller runs.
    #[must_use]
    pub const fn zone(&self) -> &DemoZone {
        &self.zone
    }

    /// Typed access to the persisted state.
    #[must_use]
    pub const fn state(&self) -> &RaceStateStore {
        &self.state
    }

    /// Read the current race id.
    ///
    /// # Errors
    ///
    /// Returns [`RaceError::Storage`] if the id cannot be read.
    pub async fn race_id(&self) -> Result<RaceId> {
        Ok(self.state.race_id().await?)
    }

    /// Validate and store an operator-supplied race id.
    ///
    /// Status and lap counters are left alone.
    ///
    /// # Errors
    ///
    /// - [`RaceError::InvalidRaceId`] if `raw` is not a non-negative integer
    /// - [`RaceError::Storage`] if the id cannot be written
    pub async fn set_race_id(&self, raw: &str) -> Result<RaceId> {
        let race_id: RaceId = raw
            .parse()
            .map_err(|_| RaceError::InvalidRaceId(raw.to_string()))?;
        self.state.set_race_id(race_id).await?;
        tracing::info!(race_id = %race_id, "Race id set");
        Ok(race_id)
    }

    /// Run the operation named by `token` (`start` or `stop`, any case).
    ///
    /// # Errors
    ///
    /// Returns [`RaceError::UnknownOperation`] for any other token, otherwise
    /// whatever [`start`](Self::start) or [`stop`](Self::stop) returns.
    pub async fn operate(&self, token: &str) -> Result<RaceOutcome> {
        match RaceOp::parse(token) {
            Some(RaceOp::Start) => self.start().await,
            Some(RaceOp::Stop) => self.stop().await.map(|(outcome, _sync)| outcome),
            None => Err(RaceError::UnknownOperation(token.to_string())),
        }
    }

    /// Start a new race.
    ///
    /// # Errors
    ///
    /// - [`RaceError::AlreadyStarted`] if a race is running
    /// - [`RaceError::NoDemoScheduled`] if the schedule says no (or is unreachable)
    /// - [`RaceError::Storage`] if state cannot be read or written
    /// - [`RaceError::Notify`] if the event was not delivered; the race is
    ///   still started
    pub async fn start(&self) -> Result<RaceOutcome> {
        let status = self.state.status().await?;
        let current = self.state.race_id().await?;
        if status == RaceStatus::Racing {
            tracing::warn!(race_id = %current, "Start requested while racing");
            return Err(RaceError::AlreadyStarted { race_id: current });
        }

        let now = self.env.clock.now();
        let date = now.date_naive();
        if !self.env.schedule.is_scheduled(&self.zone, date).await {
            tracing::warn!(zone = %self.zone, %date, "No demo scheduled, refusing to start");
            return Err(RaceError::NoDemoScheduled {
                zone: self.zone.clone(),
                date,
            });
        }

        let race_id = current.next().ok_or(RaceError::RaceIdExhausted(current))?;
        self.state.set_race_id(race_id).await?;
        self.state.reset_laps().await?;
        self.state.set_status(RaceStatus::Racing).await?;
        tracing::info!(race_id = %race_id, zone = %self.zone, "Race started");

        self.publish(race_id, RaceStatus::Racing).await?;

        Ok(RaceOutcome {
            status: RaceStatus::Racing,
            message: "Race started".to_string(),
            race_id,
        })
    }

    /// Stop the running race.
    ///
    /// On success the IoT sync has been spawned on the tokio runtime; the
    /// returned handle only exists so callers (tests) can wait for it.
    ///
    /// # Errors
    ///
    /// - [`RaceError::AlreadyStopped`] if no race is running
    /// - [`RaceError::Storage`] if state cannot be read or written
    /// - [`RaceError::Notify`] if the event was not delivered; the race is
    ///   still stopped and no sync is attempted
    pub async fn stop(&self) -> Result<(RaceOutcome, JoinHandle<()>)> {
        let status = self.state.status().await?;
        let race_id = self.state.race_id().await?;
        if status == RaceStatus::Stopped {
            tracing::warn!(race_id = %race_id, "Stop requested while stopped");
            return Err(RaceError::AlreadyStopped { race_id });
        }

        self.state.set_status(RaceStatus::Stopped).await?;
        tracing::info!(race_id = %race_id, zone = %self.zone, "Race stopped");

        self.publish(race_id, RaceStatus::Stopped).await?;

        let sync = tokio::spawn(run_iot_sync(
            Arc::clone(&self.env.iot_sync),
            self.zone.clone(),
            race_id,
        ));

        Ok((
            RaceOutcome {
                status: RaceStatus::Stopped,
                message: "Race stopped".to_string(),
                race_id,
            },
            sync,
        ))
    }

    async fn publish(&self, race_id: RaceId, status: RaceStatus) -> Result<()> {
        let event = RaceEvent {
            demozone: self.zone.clone(),
            race_id,
            race_status: status,
            timestamp: self.env.clock.now(),
        };
        self.env.notifier.notify(event).await.map_err(|source| {
            tracing::error!(race_id = %race_id, %status, error = %source, "Race event not delivered");
            RaceError::Notify {
                race_id,
                status,
                source,
            }
        })
    }
}

async fn run_iot_sync(iot_sync: Arc<dyn IotSync>, zone: DemoZone, race_id: RaceId) {
    match iot_sync.trigger_sync(&zone).await {
        Ok(SyncOutcome::Triggered) => {
            tracing::info!(zone = %zone, race_id = %race_id, "IoT sync triggered");
        }
        Ok(SyncOutcome::Skipped { reason }) => {
            tracing::warn!(zone = %zone, race_id = %race_id, %reason, "IoT sync skipped");
        }
        Err(e) => {
            tracing::error!(zone = %zone, race_id = %race_id, error = %e, "IoT sync failed");
        }
    }
}

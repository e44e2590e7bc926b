//! # Race Admin Testing
//!
//! Testing utilities for the race admin service.
//!
//! This crate provides:
//! - In-memory implementations of the environment traits ([`mocks`])
//! - [`RaceHarness`], a controller wired to those doubles with seeded state
//!
//! ## Example
//!
//! ```ignore
//! use race_admin_core::RaceStatus;
//! use race_admin_testing::RaceHarness;
//!
//! #[tokio::test]
//! async fn starts_a_race() {
//!     let harness = RaceHarness::new(4, RaceStatus::Stopped);
//!     let outcome = harness.controller.operate("start").await.unwrap();
//!     assert_eq!(outcome.race_id.value(), 5);
//! }
//! ```

pub mod mocks;

use race_admin_core::{
    parse_car_list, CarId, DemoZone, RaceController, RaceEnvironment, RaceStatus, StateKey,
};
use std::sync::Arc;

pub use mocks::{
    test_clock, FixedClock, InMemoryStateStore, RecordingIotSync, RecordingNotifier,
    StaticScheduleChecker,
};

/// Zone used by [`RaceHarness`].
pub const TEST_ZONE: &str = "MADRID";

/// Cars used by [`RaceHarness`].
pub const TEST_CARS: &str = "Thermo,Ground Shock,Skull,Guardian";

/// A [`RaceController`] wired to in-memory doubles.
///
/// The doubles are kept as public fields so tests can inspect and steer them.
#[derive(Debug, Clone)]
pub struct RaceHarness {
    /// Controller under test.
    pub controller: RaceController,
    /// Backing state.
    pub store: InMemoryStateStore,
    /// Schedule answer (scheduled by default).
    pub schedule: StaticScheduleChecker,
    /// Captured events.
    pub notifier: RecordingNotifier,
    /// Captured IoT triggers.
    pub iot_sync: RecordingIotSync,
    /// Configured cars.
    pub cars: Vec<CarId>,
}

impl RaceHarness {
    /// Build a harness with the given race id and status, every lap counter at 7.
    #[must_use]
    pub fn new(race_id: u64, status: RaceStatus) -> Self {
        let cars = parse_car_list(TEST_CARS);
        let store = InMemoryStateStore::new();
        store.insert(StateKey::DemoZone, TEST_ZONE);
        store.insert(StateKey::RaceId, race_id.to_string());
        store.insert(StateKey::RaceStatus, status.as_str());
        for car in &cars {
            store.insert(StateKey::LapCount(car.clone()), "7");
        }

        let schedule = StaticScheduleChecker::new(true);
        let notifier = RecordingNotifier::new();
        let iot_sync = RecordingIotSync::new();

        let env = RaceEnvironment {
            store: Arc::new(store.clone()),
            schedule: Arc::new(schedule.clone()),
            notifier: Arc::new(notifier.clone()),
            iot_sync: Arc::new(iot_sync.clone()),
            clock: Arc::new(test_clock()),
        };
        let controller = RaceController::new(DemoZone::new(TEST_ZONE), cars.clone(), env);

        Self {
            controller,
            store,
            schedule,
            notifier,
            iot_sync,
            cars,
        }
    }

    /// Raw stored race id.
    #[must_use]
    pub fn stored_race_id(&self) -> Option<String> {
        self.store.value(&StateKey::RaceId)
    }

    /// Raw stored status.
    #[must_use]
    pub fn stored_status(&self) -> Option<String> {
        self.store.value(&StateKey::RaceStatus)
    }

    /// Raw stored lap counter for `car`.
    #[must_use]
    pub fn stored_laps(&self, car: &CarId) -> Option<String> {
        self.store.value(&StateKey::LapCount(car.clone()))
    }
}

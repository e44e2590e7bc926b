//! Typed access to the persisted race state.

use crate::environment::{StateKey, StateStore};
use crate::error::StoreError;
use crate::types::{parse_count, CarId, DemoZone, RaceId, RaceStatus};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Typed view over a raw [`StateStore`].
///
/// Parses and formats the scalar slots and knows the configured car set for
/// the lap counters.
#[derive(Clone)]
pub struct RaceStateStore {
    inner: Arc<dyn StateStore>,
    cars: Vec<CarId>,
}

impl RaceStateStore {
    /// Wrap `inner`, tracking lap counters for `cars`.
    #[must_use]
    pub fn new(inner: Arc<dyn StateStore>, cars: Vec<CarId>) -> Self {
        Self { inner, cars }
    }

    /// Cars with a lap counter.
    #[must_use]
    pub fn cars(&self) -> &[CarId] {
        &self.cars
    }

    /// Read the demo zone.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the slot is unreadable or blank.
    pub async fn demo_zone(&self) -> Result<DemoZone, StoreError> {
        let raw = self.inner.get(&StateKey::DemoZone).await?;
        let zone = DemoZone::new(&raw);
        if zone.as_str().is_empty() {
            return Err(StoreError::Corrupt {
                key: StateKey::DemoZone,
                value: raw,
            });
        }
        Ok(zone)
    }

    /// Read the current race id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the slot is unreadable or not a number.
    pub async fn race_id(&self) -> Result<RaceId, StoreError> {
        let raw = self.inner.get(&StateKey::RaceId).await?;
        raw.parse().map_err(|_| StoreError::Corrupt {
            key: StateKey::RaceId,
            value: raw,
        })
    }

    /// Overwrite the race id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] on write failure.
    pub async fn set_race_id(&self, race_id: RaceId) -> Result<(), StoreError> {
        self.inner
            .set(&StateKey::RaceId, &race_id.to_string())
            .await
    }

    /// Read the race status.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the slot is unreadable or holds an unknown word.
    pub async fn status(&self) -> Result<RaceStatus, StoreError> {
        let raw = self.inner.get(&StateKey::RaceStatus).await?;
        raw.parse().map_err(|_| StoreError::Corrupt {
            key: StateKey::RaceStatus,
            value: raw,
        })
    }

    /// Overwrite the race status.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] on write failure.
    pub async fn set_status(&self, status: RaceStatus) -> Result<(), StoreError> {
        self.inner.set(&StateKey::RaceStatus, status.as_str()).await
    }

    /// Read the lap counter of one car.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the slot is unreadable or not a number.
    pub async fn lap_count(&self, car: &CarId) -> Result<u64, StoreError> {
        let key = StateKey::LapCount(car.clone());
        let raw = self.inner.get(&key).await?;
        parse_count(&raw).map_err(|_| StoreError::Corrupt { key, value: raw })
    }

    /// Read the lap counters of every configured car.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`] encountered.
    pub async fn lap_counts(&self) -> Result<BTreeMap<CarId, u64>, StoreError> {
        let mut counts = BTreeMap::new();
        for car in &self.cars {
            counts.insert(car.clone(), self.lap_count(car).await?);
        }
        Ok(counts)
    }

    /// Reset every configured lap counter to zero.
    ///
    /// Stops at the first failure; counters already reset stay reset.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError::Write`] encountered.
    pub async fn reset_laps(&self) -> Result<(), StoreError> {
        for car in &self.cars {
            self.inner
                .set(&StateKey::LapCount(car.clone()), "0")
                .await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for RaceStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaceStateStore")
            .field("cars", &self.cars)
            .finish_non_exhaustive()
    }
}

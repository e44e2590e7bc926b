//! # Race Admin Store
//!
//! Flat-file implementation of [`StateStore`].
//!
//! Every scalar lives in its own file under one directory, holding the plain
//! text of the value with no framing:
//!
//! | Key | File |
//! |---|---|
//! | demo zone | `demozone.dat` |
//! | race id | `race_count.dat` |
//! | race status | `race_status.dat` |
//! | lap count of `Ground Shock` | `ground_shock_lap_count.dat` |
//!
//! Writes overwrite the whole file. There is no locking and no atomic rename:
//! the last writer wins.

use race_admin_core::{
    BoxFuture, CarId, RaceId, RaceStatus, StateKey, StateStore, StoreError,
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const DEMO_ZONE_FILE: &str = "demozone.dat";
const RACE_ID_FILE: &str = "race_count.dat";
const RACE_STATUS_FILE: &str = "race_status.dat";
const LAP_COUNT_SUFFIX: &str = "_lap_count.dat";

/// State store backed by one file per key.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Create a store rooted at `dir`. Nothing is touched on disk.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the state files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &StateKey) -> PathBuf {
        match key {
            StateKey::DemoZone => self.dir.join(DEMO_ZONE_FILE),
            StateKey::RaceId => self.dir.join(RACE_ID_FILE),
            StateKey::RaceStatus => self.dir.join(RACE_STATUS_FILE),
            StateKey::LapCount(car) => self.dir.join(lap_file_name(car)),
        }
    }

    /// Create the directory and seed missing race id, status and lap files.
    ///
    /// Existing files are left as they are. The demo zone is never seeded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the directory or a seed file cannot be
    /// created.
    pub async fn initialize(&self, cars: &[CarId]) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Write {
                key: StateKey::RaceId,
                reason: format!("cannot create {}: {e}", self.dir.display()),
            })?;

        let mut seeds = vec![
            (StateKey::RaceId, RaceId::default().to_string()),
            (StateKey::RaceStatus, RaceStatus::Stopped.as_str().to_string()),
        ];
        seeds.extend(
            cars.iter()
                .map(|car| (StateKey::LapCount(car.clone()), "0".to_string())),
        );

        for (key, value) in seeds {
            let path = self.path_for(&key);
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                continue;
            }
            tracing::info!(file = %path.display(), %value, "Seeding race state file");
            write_value(&key, &path, &value).await?;
        }
        Ok(())
    }
}

fn lap_file_name(car: &CarId) -> String {
    let slug: String = car
        .as_str()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{slug}{LAP_COUNT_SUFFIX}")
}

async fn write_value(key: &StateKey, path: &Path, value: &str) -> Result<(), StoreError> {
    tokio::fs::write(path, value)
        .await
        .map_err(|e| StoreError::Write {
            key: key.clone(),
            reason: format!("{}: {e}", path.display()),
        })
}

impl StateStore for FileStateStore {
    fn get(&self, key: &StateKey) -> BoxFuture<'_, Result<String, StoreError>> {
        let key = key.clone();
        let path = self.path_for(&key);
        Box::pin(async move {
            match tokio::fs::read_to_string(&path).await {
                Ok(raw) => Ok(raw.trim().to_string()),
                Err(e) => {
                    let reason = if e.kind() == ErrorKind::NotFound {
                        format!("{} does not exist", path.display())
                    } else {
                        format!("{}: {e}", path.display())
                    };
                    tracing::error!(%key, %reason, "Race state read failed");
                    Err(StoreError::Read { key, reason })
                }
            }
        })
    }

    fn set(&self, key: &StateKey, value: &str) -> BoxFuture<'_, Result<(), StoreError>> {
        let key = key.clone();
        let path = self.path_for(&key);
        let value = value.to_string();
        Box::pin(async move {
            let result = write_value(&key, &path, &value).await;
            if let Err(e) = &result {
                tracing::error!(error = %e, "Race state write failed");
            } else {
                tracing::debug!(%key, %value, "Race state written");
            }
            result
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lap_file_name_slugifies_car() {
        let car = CarId::new("Ground Shock").unwrap();
        assert_eq!(lap_file_name(&car), "ground_shock_lap_count.dat");
    }

    #[test]
    fn test_paths_are_under_dir() {
        let store = FileStateStore::new("/tmp/race");
        assert_eq!(
            store.path_for(&StateKey::RaceId),
            PathBuf::from("/tmp/race/race_count.dat")
        );
        assert_eq!(
            store.path_for(&StateKey::DemoZone),
            PathBuf::from("/tmp/race/demozone.dat")
        );
    }
}

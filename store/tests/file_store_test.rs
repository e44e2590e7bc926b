//! File store tests against a temporary directory.

#![allow(clippy::unwrap_used)] // Tests can use unwrap

use race_admin_core::{
    parse_car_list, RaceId, RaceStateStore, RaceStatus, StateKey, StateStore, StoreError,
};
use race_admin_store::FileStateStore;
use std::sync::Arc;

#[tokio::test]
async fn test_set_then_get_round_trips_plain_text() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::new(dir.path());

    store.set(&StateKey::RaceId, "17").await.unwrap();

    assert_eq!(store.get(&StateKey::RaceId).await.unwrap(), "17");
    let on_disk = std::fs::read_to_string(dir.path().join("race_count.dat")).unwrap();
    assert_eq!(on_disk, "17");
}

#[tokio::test]
async fn test_get_trims_trailing_newline() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("demozone.dat"), "MADRID\n").unwrap();
    let store = FileStateStore::new(dir.path());

    assert_eq!(store.get(&StateKey::DemoZone).await.unwrap(), "MADRID");
}

#[tokio::test]
async fn test_blank_demo_zone_file_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let cars = parse_car_list("Thermo");
    let store = FileStateStore::new(dir.path());
    store.initialize(&cars).await.unwrap();
    std::fs::write(dir.path().join("demozone.dat"), " \n").unwrap();

    let state = RaceStateStore::new(Arc::new(store), cars);

    assert!(matches!(
        state.demo_zone().await.unwrap_err(),
        StoreError::Corrupt {
            key: StateKey::DemoZone,
            ..
        }
    ));
}

#[tokio::test]
async fn test_missing_demo_zone_is_not_seeded() {
    let dir = tempfile::tempdir().unwrap();
    let cars = parse_car_list("Thermo");
    let store = FileStateStore::new(dir.path());
    store.initialize(&cars).await.unwrap();

    let state = RaceStateStore::new(Arc::new(store), cars);

    assert!(matches!(
        state.demo_zone().await.unwrap_err(),
        StoreError::Read {
            key: StateKey::DemoZone,
            ..
        }
    ));
}

#[tokio::test]
async fn test_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::new(dir.path());

    let err = store.get(&StateKey::RaceStatus).await.unwrap_err();

    assert!(matches!(
        err,
        StoreError::Read {
            key: StateKey::RaceStatus,
            ..
        }
    ));
}

#[tokio::test]
async fn test_write_into_missing_directory_is_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::new(dir.path().join("does-not-exist"));

    let err = store.set(&StateKey::RaceId, "1").await.unwrap_err();

    assert!(matches!(err, StoreError::Write { .. }));
}

#[tokio::test]
async fn test_initialize_seeds_only_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let state_dir = dir.path().join("setup");
    std::fs::create_dir_all(&state_dir).unwrap();
    std::fs::write(state_dir.join("race_count.dat"), "99").unwrap();
    let cars = parse_car_list("Thermo,Ground Shock");
    let store = FileStateStore::new(&state_dir);

    store.initialize(&cars).await.unwrap();

    assert_eq!(store.get(&StateKey::RaceId).await.unwrap(), "99");
    assert_eq!(store.get(&StateKey::RaceStatus).await.unwrap(), "STOPPED");
    for car in &cars {
        assert_eq!(
            store.get(&StateKey::LapCount(car.clone())).await.unwrap(),
            "0"
        );
    }
    assert!(store.get(&StateKey::DemoZone).await.is_err());
}

#[tokio::test]
async fn test_initialize_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::new(dir.path().join("nested").join("setup"));

    store.initialize(&[]).await.unwrap();

    assert!(store.dir().join("race_status.dat").exists());
}

#[tokio::test]
async fn test_typed_view_over_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("demozone.dat"), "ROME").unwrap();
    let cars = parse_car_list("Skull,Guardian");
    let files = FileStateStore::new(dir.path());
    files.initialize(&cars).await.unwrap();
    let state = RaceStateStore::new(Arc::new(files), cars.clone());

    state.set_race_id(RaceId::new(8)).await.unwrap();
    state.set_status(RaceStatus::Racing).await.unwrap();
    std::fs::write(dir.path().join("skull_lap_count.dat"), "12").unwrap();

    assert_eq!(state.demo_zone().await.unwrap().as_str(), "ROME");
    assert_eq!(state.race_id().await.unwrap(), RaceId::new(8));
    assert_eq!(state.status().await.unwrap(), RaceStatus::Racing);
    assert_eq!(state.lap_count(&cars[0]).await.unwrap(), 12);

    state.reset_laps().await.unwrap();
    assert!(state.lap_counts().await.unwrap().values().all(|&n| n == 0));
}

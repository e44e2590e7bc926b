//! Outbound client tests against a mock HTTP server.

#![allow(clippy::unwrap_used)] // Tests can use unwrap

use chrono::{NaiveDate, TimeZone, Utc};
use race_admin_clients::{DirectoryClient, EventClient, IotSyncClient};
use race_admin_core::{
    DemoZone, EventNotifier, IotSync, NotifyError, RaceEvent, RaceId, RaceStatus, ScheduleChecker,
    SyncError, SyncOutcome,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(2);

/// Nothing listens on port 1.
const UNREACHABLE: &str = "http://127.0.0.1:1";

fn zone() -> DemoZone {
    DemoZone::new("MADRID")
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

#[tokio::test]
async fn test_schedule_with_items_is_scheduled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/demozone/MADRID/schedule"))
        .and(query_param("date", "2025-01-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [{"id": 1}]})))
        .expect(1)
        .mount(&server)
        .await;

    let client = DirectoryClient::new(&server.uri(), TIMEOUT).unwrap();

    assert!(client.is_scheduled(&zone(), date()).await);
}

#[tokio::test]
async fn test_schedule_with_no_items_is_not_scheduled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/demozone/MADRID/schedule"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let client = DirectoryClient::new(&server.uri(), TIMEOUT).unwrap();

    assert!(!client.is_scheduled(&zone(), date()).await);
}

#[tokio::test]
async fn test_schedule_not_found_is_not_scheduled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/demozone/MADRID/schedule"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = DirectoryClient::new(&server.uri(), TIMEOUT).unwrap();

    assert!(!client.lookup_schedule(&zone(), date()).await.unwrap());
}

#[tokio::test]
async fn test_schedule_fails_closed_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let client = DirectoryClient::new(&server.uri(), TIMEOUT).unwrap();

    assert!(client.lookup_schedule(&zone(), date()).await.is_err());
    assert!(!client.is_scheduled(&zone(), date()).await);
}

#[tokio::test]
async fn test_schedule_fails_closed_on_garbage_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = DirectoryClient::new(&server.uri(), TIMEOUT).unwrap();

    assert!(!client.is_scheduled(&zone(), date()).await);
}

#[tokio::test]
async fn test_schedule_fails_closed_on_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"items": [{"id": 1}]}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = DirectoryClient::new(&server.uri(), Duration::from_millis(50)).unwrap();

    assert!(!client.is_scheduled(&zone(), date()).await);
}

#[tokio::test]
async fn test_schedule_fails_closed_when_unreachable() {
    let client = DirectoryClient::new(UNREACHABLE, TIMEOUT).unwrap();

    assert!(!client.is_scheduled(&zone(), date()).await);
}

fn race_event() -> RaceEvent {
    RaceEvent {
        demozone: zone(),
        race_id: RaceId::new(7),
        race_status: RaceStatus::Racing,
        timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn test_notify_posts_event_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/event/race"))
        .and(body_json(json!({
            "demozone": "MADRID",
            "raceId": 7,
            "raceStatus": "RACING",
            "timestamp": "2025-01-01T10:00:00Z"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = EventClient::new(&server.uri(), TIMEOUT).unwrap();

    client.notify(race_event()).await.unwrap();
}

#[tokio::test]
async fn test_notify_reports_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .expect(1)
        .mount(&server)
        .await;

    let client = EventClient::new(&server.uri(), TIMEOUT).unwrap();

    let err = client.notify(race_event()).await.unwrap_err();
    assert_eq!(
        err,
        NotifyError::Rejected {
            status: 503,
            message: "busy".to_string()
        }
    );
}

#[tokio::test]
async fn test_notify_reports_transport_failure() {
    let client = EventClient::new(UNREACHABLE, TIMEOUT).unwrap();

    assert!(matches!(
        client.notify(race_event()).await,
        Err(NotifyError::RequestFailed(_))
    ));
}

async fn mount_integration(server: &MockServer, iot_host: &str) {
    Mock::given(method("GET"))
        .and(path("/demozone/MADRID/iot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "hostname": iot_host,
                "applicationid": "APP1",
                "integrationid": "INT9",
                "username": "iot",
                "password": "pw"
            }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sync_triggers_integration() {
    let directory = MockServer::start().await;
    let iot = MockServer::start().await;
    mount_integration(&directory, &iot.uri()).await;
    Mock::given(method("PUT"))
        .and(path("/iot/api/v2/apps/APP1/integrations/INT9/sync/now"))
        .and(basic_auth("iot", "pw"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&iot)
        .await;

    let client = IotSyncClient::new(
        DirectoryClient::new(&directory.uri(), TIMEOUT).unwrap(),
        TIMEOUT,
    )
    .unwrap();

    assert_eq!(client.trigger_sync(&zone()).await.unwrap(), SyncOutcome::Triggered);
}

#[tokio::test]
async fn test_sync_not_accepted_is_error() {
    let directory = MockServer::start().await;
    let iot = MockServer::start().await;
    mount_integration(&directory, &iot.uri()).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done?"))
        .expect(1)
        .mount(&iot)
        .await;

    let client = IotSyncClient::new(
        DirectoryClient::new(&directory.uri(), TIMEOUT).unwrap(),
        TIMEOUT,
    )
    .unwrap();

    assert_eq!(
        client.trigger_sync(&zone()).await.unwrap_err(),
        SyncError::NotAccepted {
            status: 200,
            message: "done?".to_string()
        }
    );
}

#[tokio::test]
async fn test_sync_skipped_without_integration() {
    let directory = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/demozone/MADRID/iot"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&directory)
        .await;

    let client = IotSyncClient::new(
        DirectoryClient::new(&directory.uri(), TIMEOUT).unwrap(),
        TIMEOUT,
    )
    .unwrap();

    assert!(matches!(
        client.trigger_sync(&zone()).await.unwrap(),
        SyncOutcome::Skipped { .. }
    ));
}

#[tokio::test]
async fn test_sync_skipped_with_empty_items() {
    let directory = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/demozone/MADRID/iot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&directory)
        .await;

    let client = IotSyncClient::new(
        DirectoryClient::new(&directory.uri(), TIMEOUT).unwrap(),
        TIMEOUT,
    )
    .unwrap();

    assert!(matches!(
        client.trigger_sync(&zone()).await.unwrap(),
        SyncOutcome::Skipped { .. }
    ));
}

#[tokio::test]
async fn test_sync_skipped_when_lookup_fails() {
    let directory = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&directory)
        .await;

    let client = IotSyncClient::new(
        DirectoryClient::new(&directory.uri(), TIMEOUT).unwrap(),
        TIMEOUT,
    )
    .unwrap();

    assert!(matches!(
        client.trigger_sync(&zone()).await.unwrap(),
        SyncOutcome::Skipped { .. }
    ));
}

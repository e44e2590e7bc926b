//! Directory service client
//!
//! The directory service knows, per demo zone, which days have a demo
//! scheduled and how to reach the zone's IoT integration. Both lookups answer
//! with an `{"items": [...]}` envelope.

use crate::{endpoint, http_client, parse_base_url, ClientError};
use chrono::NaiveDate;
use race_admin_core::{BoxFuture, DemoZone, ScheduleChecker};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// `{"items": [...]}` envelope used by every directory response.
#[derive(Debug, Deserialize)]
struct Items<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// Connection details of a zone's IoT integration.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct IotIntegration {
    /// Host (or base URL) of the IoT server.
    pub hostname: String,
    /// Application the integration belongs to.
    #[serde(rename = "applicationid")]
    pub application_id: String,
    /// Integration to trigger.
    #[serde(rename = "integrationid")]
    pub integration_id: String,
    /// Basic auth user.
    pub username: String,
    /// Basic auth password.
    pub password: String,
}

impl fmt::Debug for IotIntegration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IotIntegration")
            .field("hostname", &self.hostname)
            .field("application_id", &self.application_id)
            .field("integration_id", &self.integration_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Directory service client
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: Client,
    base_url: Url,
}

impl DirectoryClient {
    /// Create a client for the directory service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` for an unparseable URL or
    /// `ClientError::Build` if the HTTP client cannot be created.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Look up whether a demo is scheduled for `zone` on `date`.
    ///
    /// 404 means nothing is scheduled.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, unexpected statuses, or parsing
    /// failures.
    pub async fn lookup_schedule(&self, zone: &DemoZone, date: NaiveDate) -> Result<bool, ClientError> {
        let url = endpoint(&self.base_url, &["demozone", zone.as_str(), "schedule"])?;
        let response = self
            .client
            .get(url)
            .query(&[("date", date.format("%Y-%m-%d").to_string())])
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let body = response
                    .json::<Items<serde_json::Value>>()
                    .await
                    .map_err(|e| ClientError::ResponseParseFailed(e.to_string()))?;
                Ok(!body.items.is_empty())
            }
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ClientError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            }
        }
    }

    /// Look up the IoT integration configured for `zone`.
    ///
    /// Returns `None` when the zone has none (404 or an empty item list).
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, unexpected statuses, or parsing
    /// failures.
    pub async fn iot_integration(&self, zone: &DemoZone) -> Result<Option<IotIntegration>, ClientError> {
        let url = endpoint(&self.base_url, &["demozone", zone.as_str(), "iot"])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let body = response
                    .json::<Items<IotIntegration>>()
                    .await
                    .map_err(|e| ClientError::ResponseParseFailed(e.to_string()))?;
                Ok(body.items.into_iter().next())
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ClientError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            }
        }
    }
}

impl ScheduleChecker for DirectoryClient {
    fn is_scheduled(&self, zone: &DemoZone, date: NaiveDate) -> BoxFuture<'_, bool> {
        let zone = zone.clone();
        Box::pin(async move {
            match self.lookup_schedule(&zone, date).await {
                Ok(scheduled) => {
                    tracing::debug!(zone = %zone, %date, scheduled, "Demo schedule checked");
                    scheduled
                }
                Err(e) => {
                    tracing::error!(zone = %zone, %date, error = %e, "Demo schedule lookup failed, treating as not scheduled");
                    false
                }
            }
        })
    }
}

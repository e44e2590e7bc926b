//! IoT "sync now" trigger
//!
//! Looks up the zone's integration in the directory, then asks the IoT server
//! to sync that integration immediately. Lookup problems skip the sync; only
//! the trigger itself can fail.

use crate::directory::{DirectoryClient, IotIntegration};
use crate::{endpoint, http_client, parse_base_url, ClientError};
use race_admin_core::{BoxFuture, DemoZone, IotSync, SyncError, SyncOutcome};
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

/// IoT sync trigger client
#[derive(Debug, Clone)]
pub struct IotSyncClient {
    directory: DirectoryClient,
    client: Client,
}

impl IotSyncClient {
    /// Create a trigger that resolves integrations through `directory`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Build` if the HTTP client cannot be created.
    pub fn new(directory: DirectoryClient, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            directory,
            client: http_client(timeout)?,
        })
    }

    /// URL of the "sync now" action for `integration`.
    ///
    /// A hostname without a scheme is reached over https.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` if the hostname does not form a URL.
    pub fn sync_url(integration: &IotIntegration) -> Result<Url, ClientError> {
        let host = integration.hostname.trim();
        let base = if host.contains("://") {
            parse_base_url(host)?
        } else {
            parse_base_url(&format!("https://{host}"))?
        };
        endpoint(
            &base,
            &[
                "iot",
                "api",
                "v2",
                "apps",
                &integration.application_id,
                "integrations",
                &integration.integration_id,
                "sync",
                "now",
            ],
        )
    }

    async fn trigger(&self, integration: &IotIntegration) -> Result<SyncOutcome, SyncError> {
        let url = Self::sync_url(integration).map_err(|e| SyncError::RequestFailed(e.to_string()))?;
        tracing::debug!(%url, "Triggering IoT sync");

        let response = self
            .client
            .put(url)
            .basic_auth(&integration.username, Some(&integration.password))
            .send()
            .await
            .map_err(|e| SyncError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::ACCEPTED => Ok(SyncOutcome::Triggered),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(SyncError::NotAccepted {
                    status: status.as_u16(),
                    message: body,
                })
            }
        }
    }
}

impl IotSync for IotSyncClient {
    fn trigger_sync(&self, zone: &DemoZone) -> BoxFuture<'_, Result<SyncOutcome, SyncError>> {
        let zone = zone.clone();
        Box::pin(async move {
            let integration = match self.directory.iot_integration(&zone).await {
                Ok(Some(integration)) => integration,
                Ok(None) => {
                    return Ok(SyncOutcome::Skipped {
                        reason: format!("no IoT integration configured for zone {zone}"),
                    });
                }
                Err(e) => {
                    return Ok(SyncOutcome::Skipped {
                        reason: format!("IoT integration lookup failed: {e}"),
                    });
                }
            };
            self.trigger(&integration).await
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn integration(hostname: &str) -> IotIntegration {
        IotIntegration {
            hostname: hostname.to_string(),
            application_id: "APP1".to_string(),
            integration_id: "INT9".to_string(),
            username: "iot".to_string(),
            password: "pw".to_string(),
        }
    }

    #[test]
    fn test_sync_url_defaults_to_https() {
        let url = IotSyncClient::sync_url(&integration("iot.example.com")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://iot.example.com/iot/api/v2/apps/APP1/integrations/INT9/sync/now"
        );
    }

    #[test]
    fn test_sync_url_keeps_explicit_scheme_and_port() {
        let url = IotSyncClient::sync_url(&integration("http://127.0.0.1:7101")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:7101/iot/api/v2/apps/APP1/integrations/INT9/sync/now"
        );
    }
}

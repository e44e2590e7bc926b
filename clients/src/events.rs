//! Event service client

use crate::{endpoint, http_client, parse_base_url, ClientError};
use race_admin_core::{BoxFuture, EventNotifier, NotifyError, RaceEvent};
use reqwest::{Client, Url};
use std::time::Duration;

/// Posts race lifecycle events to `{base}/event/race`.
#[derive(Debug, Clone)]
pub struct EventClient {
    client: Client,
    events_url: Url,
}

impl EventClient {
    /// Create a client for the event service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` for an unparseable URL or
    /// `ClientError::Build` if the HTTP client cannot be created.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = parse_base_url(base_url)?;
        Ok(Self {
            client: http_client(timeout)?,
            events_url: endpoint(&base, &["event", "race"])?,
        })
    }

    /// Endpoint events are posted to.
    #[must_use]
    pub const fn events_url(&self) -> &Url {
        &self.events_url
    }

    async fn post(&self, event: &RaceEvent) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.events_url.clone())
            .json(event)
            .send()
            .await
            .map_err(|e| NotifyError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(NotifyError::Rejected {
            status: status.as_u16(),
            message: body,
        })
    }
}

impl EventNotifier for EventClient {
    fn notify(&self, event: RaceEvent) -> BoxFuture<'_, Result<(), NotifyError>> {
        Box::pin(async move {
            tracing::debug!(
                race_id = %event.race_id,
                status = %event.race_status,
                url = %self.events_url,
                "Posting race event"
            );
            self.post(&event).await
        })
    }
}

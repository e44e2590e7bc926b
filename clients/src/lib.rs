//! # Race Admin Clients
//!
//! `reqwest` implementations of the outbound collaborators of the race
//! controller:
//!
//! - [`DirectoryClient`]: demo schedule lookup ([`ScheduleChecker`]) and IoT
//!   integration lookup
//! - [`EventClient`]: race event delivery ([`EventNotifier`])
//! - [`IotSyncClient`]: "sync now" trigger ([`IotSync`])
//!
//! Every client makes a single attempt with a fixed timeout. Nothing retries.
//!
//! ## Example
//!
//! ```no_run
//! use race_admin_clients::{DirectoryClient, EventClient, IotSyncClient};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), race_admin_clients::ClientError> {
//! let schedule = DirectoryClient::new("http://directory.local", Duration::from_secs(1))?;
//! let events = EventClient::new("http://events.local", Duration::from_secs(5))?;
//! let iot = IotSyncClient::new(
//!     DirectoryClient::new("http://directory.local", Duration::from_secs(10))?,
//!     Duration::from_secs(10),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! [`ScheduleChecker`]: race_admin_core::ScheduleChecker
//! [`EventNotifier`]: race_admin_core::EventNotifier
//! [`IotSync`]: race_admin_core::IotSync

pub mod directory;
pub mod error;
pub mod events;
pub mod iot;

// Re-export main types for convenience
pub use directory::{DirectoryClient, IotIntegration};
pub use error::ClientError;
pub use events::EventClient;
pub use iot::IotSyncClient;

use reqwest::{Client, Url};
use std::time::Duration;

/// Parse a configured base URL.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    Url::parse(raw.trim()).map_err(|e| ClientError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Append percent-encoded path segments to `base`.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ClientError::InvalidUrl {
            url: base.to_string(),
            reason: "URL cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Build an HTTP client with a fixed overall request timeout.
pub(crate) fn http_client(timeout: Duration) -> Result<Client, ClientError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ClientError::Build(e.to_string()))
}

//! Error types for the outbound service clients

use thiserror::Error;

/// Errors that can occur when talking to the directory, event or IoT services
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// A configured base URL does not parse
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The rejected URL
        url: String,
        /// Parser message
        reason: String,
    },

    /// The underlying HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    /// HTTP request failed (connect error, timeout)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response parsing failed
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Service returned an unexpected status
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
}

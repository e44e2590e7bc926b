//! Axum admin API for the race demo.
//!
//! This crate is the imperative shell around [`race_admin_core`]: it parses
//! HTTP requests, checks Basic credentials, calls the [`RaceController`] and
//! maps the outcome or [`RaceError`] to a response.
//!
//! # Request Flow
//!
//! 1. **Authenticate** with [`middleware::basic_auth_layer`]
//! 2. **Extract** path parameters
//! 3. **Call** the controller held in [`AppState`]
//! 4. **Map** the result through [`AppError`]
//!
//! # Example
//!
//! ```ignore
//! use race_admin_web::{build_router, AppState};
//!
//! let app = build_router(AppState::new(controller), config.credentials);
//! let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! [`RaceController`]: race_admin_core::RaceController
//! [`RaceError`]: race_admin_core::RaceError

#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod credentials;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-export key types for convenience
pub use config::{Config, ConfigError};
pub use credentials::{AdminCredentials, HashFormatError, PasswordHash};
pub use error::AppError;
pub use middleware::{basic_auth_header, basic_auth_layer};
pub use routes::build_router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;

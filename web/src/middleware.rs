//! HTTP Basic authentication middleware.
//!
//! Every request must carry `Authorization: Basic <base64(user:password)>`
//! matching the configured [`AdminCredentials`]. Anything else is answered
//! with 401 and a `WWW-Authenticate` challenge before the inner service runs.
//!
//! # Example
//!
//! ```ignore
//! use axum::Router;
//! use race_admin_web::middleware::basic_auth_layer;
//!
//! let app = Router::new()
//!     .route("/admin/raceid", get(get_race_id))
//!     .layer(basic_auth_layer(credentials));
//! ```

use crate::credentials::AdminCredentials;
use crate::error::AppError;
use axum::{
    extract::Request,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Create a layer that requires the given Basic credentials on every request.
#[must_use]
pub fn basic_auth_layer(credentials: AdminCredentials) -> BasicAuthLayer {
    BasicAuthLayer {
        credentials: Arc::new(credentials),
    }
}

/// Layer for Basic authentication.
#[derive(Clone, Debug)]
pub struct BasicAuthLayer {
    credentials: Arc<AdminCredentials>,
}

impl<S> Layer<S> for BasicAuthLayer {
    type Service = BasicAuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BasicAuthMiddleware {
            inner,
            credentials: Arc::clone(&self.credentials),
        }
    }
}

/// Middleware service for Basic authentication.
#[derive(Clone, Debug)]
pub struct BasicAuthMiddleware<S> {
    inner: S,
    credentials: Arc<AdminCredentials>,
}

impl<S> Service<Request> for BasicAuthMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let authorized = basic_credentials(req.headers())
            .is_some_and(|(user, password)| self.credentials.verify(&user, &password));

        if !authorized {
            tracing::warn!(
                method = %req.method(),
                uri = %req.uri(),
                "Rejected request without valid credentials"
            );
            let response = AppError::unauthorized("Valid credentials required").into_response();
            return Box::pin(async move { Ok::<_, S::Error>(response) });
        }

        Box::pin(self.inner.call(req))
    }
}

/// Decode the `user:password` pair from a Basic `Authorization` header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Build an `Authorization` header value for the given pair.
#[must_use]
pub fn basic_auth_header(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

//! Router assembly.

use crate::credentials::AdminCredentials;
use crate::handlers;
use crate::middleware::basic_auth_layer;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

/// Build the admin router.
///
/// Routes live under `/admin`. Basic auth wraps the whole router, fallback
/// included, so unknown paths are challenged too.
pub fn build_router(state: AppState, credentials: AdminCredentials) -> Router {
    let admin = Router::new()
        .route("/raceid", get(handlers::get_race_id))
        .route("/raceid/:raceid", post(handlers::set_race_id))
        .route("/race", put(handlers::missing_operation))
        .route("/race/:raceop", put(handlers::operate_race));

    Router::new()
        .nest("/admin", admin)
        .with_state(state)
        .layer(basic_auth_layer(credentials))
        .layer(TraceLayer::new_for_http())
}

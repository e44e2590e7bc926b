//! Race administration endpoints.

use crate::state::AppState;
use crate::WebResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use race_admin_core::{RaceError, RaceId, RaceOutcome};
use serde::{Deserialize, Serialize};

/// Body of `GET /admin/raceid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceIdBody {
    /// Current race id.
    pub raceid: RaceId,
}

/// Current race id.
///
/// # Endpoint
///
/// ```text
/// GET /admin/raceid
/// ```
///
/// # Response
///
/// ```json
/// { "raceid": 12 }
/// ```
///
/// # Errors
///
/// 500 if the id cannot be read.
pub async fn get_race_id(State(state): State<AppState>) -> WebResult<Json<RaceIdBody>> {
    let raceid = state.controller.race_id().await?;
    Ok(Json(RaceIdBody { raceid }))
}

/// Overwrite the race id.
///
/// # Endpoint
///
/// ```text
/// POST /admin/raceid/:raceid
/// ```
///
/// # Errors
///
/// 400 unless the segment is a non-negative integer, 500 if it cannot be stored.
pub async fn set_race_id(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> WebResult<StatusCode> {
    state.controller.set_race_id(&raw).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Start or stop the race.
///
/// # Endpoint
///
/// ```text
/// PUT /admin/race/:raceop
/// ```
///
/// # Response
///
/// ```json
/// { "status": "RACING", "message": "Race started", "raceid": 13 }
/// ```
///
/// # Errors
///
/// - 400 if the race is already in the requested state
/// - 403 if no demo is scheduled today
/// - 404 for an unknown operation
/// - 500 on storage or event delivery failure
pub async fn operate_race(
    State(state): State<AppState>,
    Path(op): Path<String>,
) -> WebResult<Json<RaceOutcome>> {
    let outcome = state.controller.operate(&op).await?;
    Ok(Json(outcome))
}

/// `PUT /admin/race` with no operation segment.
///
/// # Errors
///
/// Always 500.
#[allow(clippy::unused_async)]
pub async fn missing_operation() -> WebResult<Json<RaceOutcome>> {
    Err(RaceError::MissingOperation.into())
}

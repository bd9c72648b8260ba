//! Transient UI state and the simulated submit.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::core_state::ShellStatus;

/// `GET /api/status`
pub async fn get(State(ctx): State<ApiContext>) -> Result<Json<ShellStatus>, ApiError> {
    Ok(Json(ctx.core.status()?))
}

/// `POST /api/submit`: start the simulated validation.
pub async fn submit(State(ctx): State<ApiContext>) -> Result<Json<ShellStatus>, ApiError> {
    Ok(Json(ctx.core.submit()?))
}

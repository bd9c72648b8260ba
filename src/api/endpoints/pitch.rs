//! AI sales pitch generation.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, PitchResponse};

/// `POST /api/pitch`: generate a pitch for the current record.
///
/// 422 when company or purpose is empty, 409 when a pitch is already shown.
/// Service failures are not errors: the fallback text is returned as the pitch.
pub async fn generate(State(ctx): State<ApiContext>) -> Result<Json<PitchResponse>, ApiError> {
    let pitch = ctx.core.request_pitch().await?;
    Ok(Json(PitchResponse { pitch }))
}

/// `DELETE /api/pitch`: discard the shown pitch.
pub async fn clear(State(ctx): State<ApiContext>) -> Result<Json<PitchResponse>, ApiError> {
    let pitch = ctx.core.clear_pitch()?;
    Ok(Json(PitchResponse { pitch }))
}

//! The appointment record and the sales representative list.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AppointmentResponse, FieldUpdate, SalesRepView};
use crate::appointment::{AppointmentField, SALES_REPS};

/// `GET /api/appointment`
pub async fn get(State(ctx): State<ApiContext>) -> Result<Json<AppointmentResponse>, ApiError> {
    let appointment = ctx.core.appointment()?;
    Ok(Json(AppointmentResponse { appointment }))
}

/// `PATCH /api/appointment`: apply one `(field, value)` change.
///
/// Unknown field names, including the read-only `id` and `createdAt`,
/// are rejected.
pub async fn update(
    State(ctx): State<ApiContext>,
    Json(update): Json<FieldUpdate>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let field = AppointmentField::from_name(&update.field)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown field: {}", update.field)))?;
    let appointment = ctx.core.update_field(field, update.value)?;
    Ok(Json(AppointmentResponse { appointment }))
}

/// `GET /api/sales-reps`
pub async fn sales_reps() -> Json<Vec<SalesRepView>> {
    Json(SALES_REPS.iter().map(SalesRepView::from).collect())
}

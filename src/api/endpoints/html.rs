//! The form page and its plain HTML form actions.
//!
//! Actions answer with a redirect to `/` (post/redirect/get), except a pitch
//! request with missing inputs, which re-renders the page with the alert.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::appointment::AppointmentField;
use crate::core_state::{CoreError, MISSING_PITCH_FIELDS_MESSAGE};
use crate::page::{render_page, PageContext};

fn render(ctx: &ApiContext, alert: Option<&str>) -> Result<Html<String>, ApiError> {
    let appointment = ctx.core.appointment()?;
    let status = ctx.core.status()?;
    Ok(Html(render_page(&PageContext {
        appointment: &appointment,
        status: &status,
        alert,
        notice_ms: ctx.core.timings.notice.as_millis(),
    })))
}

/// `GET /`
pub async fn index(State(ctx): State<ApiContext>) -> Result<Html<String>, ApiError> {
    render(&ctx, None)
}

/// `POST /submit`: apply the posted fields, then start the simulated submit.
///
/// Unknown form keys are ignored.
pub async fn submit(
    State(ctx): State<ApiContext>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Redirect, ApiError> {
    let edits = fields
        .into_iter()
        .filter_map(|(name, value)| AppointmentField::from_name(&name).map(|field| (field, value)));
    ctx.core.update_fields(edits)?;
    ctx.core.submit()?;
    Ok(Redirect::to("/"))
}

/// `POST /pitch`
pub async fn generate_pitch(State(ctx): State<ApiContext>) -> Result<Response, ApiError> {
    match ctx.core.request_pitch().await {
        Ok(_) | Err(CoreError::PitchAlreadyShown) => Ok(Redirect::to("/").into_response()),
        Err(CoreError::MissingPitchFields) => {
            let page = render(&ctx, Some(MISSING_PITCH_FIELDS_MESSAGE))?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// `POST /pitch/clear`
pub async fn clear_pitch(State(ctx): State<ApiContext>) -> Result<Redirect, ApiError> {
    ctx.core.clear_pitch()?;
    Ok(Redirect::to("/"))
}

//! CSV and PDF downloads.

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::Response;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ExportQuery};
use crate::core_state::ExportArtifact;

/// `GET /api/export/csv`
pub async fn csv(
    State(ctx): State<ApiContext>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let artifact = ctx.core.export_csv()?;
    download(&ctx, artifact, query.save)
}

/// `GET /api/export/pdf`: rendered off the async workers.
pub async fn pdf(
    State(ctx): State<ApiContext>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let core = ctx.core.clone();
    let artifact = tokio::task::spawn_blocking(move || core.export_pdf())
        .await
        .map_err(|e| ApiError::Internal(format!("PDF task failed: {e}")))??;
    download(&ctx, artifact, query.save)
}

fn download(ctx: &ApiContext, artifact: ExportArtifact, save: bool) -> Result<Response, ApiError> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, artifact.mime_type())
        .header(header::CONTENT_DISPOSITION, content_disposition(&artifact.filename))
        .header(header::CACHE_CONTROL, "no-cache, no-store");

    if save {
        let path = ctx.core.save_artifact(&artifact)?;
        tracing::info!(path = %path.display(), "Export saved");
        builder = builder.header("X-Saved-Path", path.display().to_string());
    }

    tracing::debug!(file = %artifact.filename, bytes = artifact.bytes.len(), "Export served");
    builder
        .body(Body::from(artifact.bytes))
        .map_err(|e| ApiError::Internal(format!("Response build failed: {e}")))
}

/// `attachment` disposition with a printable-ASCII `filename` fallback and
/// the exact UTF-8 name in `filename*` (RFC 5987).
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c.is_ascii() && c != '"' && c != '\\' { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    )
}

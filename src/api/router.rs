//! Application router.
//!
//! `/` serves the form page and its HTML form actions; the JSON API is
//! nested under `/api/`. API responses are marked `Cache-Control: no-store`.

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the full application router.
pub fn app_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/appointment",
            get(endpoints::appointment::get).patch(endpoints::appointment::update),
        )
        .route("/sales-reps", get(endpoints::appointment::sales_reps))
        .route("/status", get(endpoints::status::get))
        .route("/submit", post(endpoints::status::submit))
        .route(
            "/pitch",
            post(endpoints::pitch::generate).delete(endpoints::pitch::clear),
        )
        .route("/export/csv", get(endpoints::export::csv))
        .route("/export/pdf", get(endpoints::export::pdf))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    let pages = Router::new()
        .route("/", get(endpoints::html::index))
        .route("/submit", post(endpoints::html::submit))
        .route("/pitch", post(endpoints::html::generate_pitch))
        .route("/pitch/clear", post(endpoints::html::clear_pitch));

    Router::new()
        .merge(pages)
        .nest("/api", api)
        .with_state(ctx)
}

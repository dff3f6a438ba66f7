//! Route table

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{analyze, generate, meta, transform};
use crate::middleware::cors::CorsLayer;
use crate::AppState;

/// Build the application router.
///
/// Known paths hit with another method fall through to the capability
/// listing, same as unknown paths.
pub fn create_router(state: Arc<AppState>) -> Router {
    let max_upload_bytes = state.settings.server.max_upload_bytes;

    Router::new()
        .route("/", get(meta::index).fallback(meta::capabilities))
        .route(
            "/api/analyze-image",
            post(analyze::analyze_image).fallback(meta::capabilities),
        )
        .route(
            "/api/generate-image",
            post(generate::generate_image).fallback(meta::capabilities),
        )
        .route(
            "/api/transform-image",
            post(transform::transform_image).fallback(meta::capabilities),
        )
        .fallback(meta::capabilities)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

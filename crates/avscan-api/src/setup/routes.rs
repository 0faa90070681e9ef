//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use avscan_core::Config;
use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    Router::new()
        .route("/scan", post(handlers::scan::scan_upload))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_size_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

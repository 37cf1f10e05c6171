pub mod documents;
pub mod health;
pub mod query;
pub mod upload;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Router,
};
use bytes::Bytes;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::services::UpstreamClient;

/// Assemble the proxy surface: health probes plus the three forwarders.
pub fn build_router(client: Arc<UpstreamClient>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            "/api/query",
            get(query::query_handler).post(query::query_post_handler),
        )
        .route("/api/upload", post(upload::upload_handler))
        .route("/api/documents", get(documents::list_documents_handler))
        // Shared state
        .layer(Extension(client))
        // CORS
        .layer(
            CorsLayer::permissive()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Tracing
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        // Body limit (uploads - max 100MB)
        .layer(DefaultBodyLimit::max(100 * 1024 * 1024))
}

/// Hand an upstream success body to the caller byte for byte.
pub(crate) fn passthrough_json(body: Bytes) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

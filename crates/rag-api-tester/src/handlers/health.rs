use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::services::UpstreamClient;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Readiness probes the upstream list endpoint, the proxy's only
/// dependency.
pub async fn readiness_check(
    Extension(client): Extension<Arc<UpstreamClient>>,
) -> StatusCode {
    match client.list_documents().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            warn!("Upstream not ready: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

use axum::{extract::Extension, response::Response};
use std::sync::Arc;
use tracing::error;

use crate::services::UpstreamClient;
use crate::utils::error::ApiError;

use super::passthrough_json;

/// GET /api/documents forwards the upstream document list untouched.
pub async fn list_documents_handler(
    Extension(client): Extension<Arc<UpstreamClient>>,
) -> Result<Response, ApiError> {
    let body = client.list_documents().await.map_err(|e| {
        error!("Document list proxy failed: {}", e);
        ApiError::UpstreamFailure("Failed to load documents".to_string())
    })?;

    Ok(passthrough_json(body))
}

use axum::{
    extract::{Extension, Query},
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

use crate::services::UpstreamClient;
use crate::utils::error::ApiError;

use super::passthrough_json;

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub query: Option<String>,
}

/// GET /api/query?query=... forwards to the upstream retrieval endpoint
/// and returns its body untouched.
pub async fn query_handler(
    Extension(client): Extension<Arc<UpstreamClient>>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::InputMissing("Query parameter is required".to_string()))?;

    let body = client.rag_query(query).await.map_err(|e| {
        error!("Query proxy failed: {}", e);
        ApiError::UpstreamFailure("Failed to process query".to_string())
    })?;

    Ok(passthrough_json(body))
}

/// POST /api/query with a JSON body carrying the query string.
pub async fn query_post_handler(
    Extension(client): Extension<Arc<UpstreamClient>>,
    Json(payload): Json<Value>,
) -> Result<Response, ApiError> {
    let query = payload
        .get("query")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::InputMissing("Query is required".to_string()))?;

    let body = client.rag_query(query).await.map_err(|e| {
        error!("Query proxy failed: {}", e);
        ApiError::UpstreamFailure("Failed to process query".to_string())
    })?;

    Ok(passthrough_json(body))
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failure taxonomy shared by the proxy handlers and the tester state:
/// every operation resolves to data or one of these kinds.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing input: {0}")]
    InputMissing(String),

    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    #[error("Malformed upstream response: {0}")]
    MalformedUpstreamResponse(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InputMissing(msg) => {
                tracing::warn!("Missing input: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::UpstreamFailure(msg) => {
                tracing::error!("Upstream failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ApiError::MalformedUpstreamResponse(msg) => {
                tracing::error!("Malformed upstream response: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse { error: message });

        (status, body).into_response()
    }
}

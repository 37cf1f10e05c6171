use axum::{
    extract::{Extension, Multipart},
    response::Response,
};
use std::sync::Arc;
use tracing::{error, info};

use crate::services::UpstreamClient;
use crate::utils::error::ApiError;

use super::passthrough_json;

/// POST /api/upload re-posts the `document` form file to the upstream
/// processing pipeline.
pub async fn upload_handler(
    Extension(client): Extension<Arc<UpstreamClient>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut file_data: Option<Vec<u8>> = None;

    // Parse multipart form
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InputMissing(format!("Failed to read field: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "document" => {
                filename = field.file_name().map(|s| s.to_string());
                content_type = field.content_type().map(|s| s.to_string());
                file_data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::InputMissing(format!("Failed to read file: {e}")))?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    let file_data =
        file_data.ok_or_else(|| ApiError::InputMissing("No file provided".to_string()))?;
    let filename = filename.unwrap_or_else(|| "document".to_string());
    let content_type = content_type.unwrap_or_else(|| {
        mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .to_string()
    });

    info!("Forwarding upload: {} ({} bytes)", filename, file_data.len());

    let body = client
        .upload_document(&filename, &content_type, file_data)
        .await
        .map_err(|e| {
            error!("Upload proxy failed: {}", e);
            ApiError::UpstreamFailure("Failed to upload document".to_string())
        })?;

    Ok(passthrough_json(body))
}

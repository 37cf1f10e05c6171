use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart;
use reqwest::Client;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::utils::error::ApiError;

/// Thin client for the hosted RAG API. Every request carries the Basic
/// credentials fixed at construction, and success bodies come back as
/// raw bytes so the proxy routes can forward them unchanged.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    auth_header: String,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        let credentials = STANDARD.encode(format!("{}:{}", config.username, config.password));

        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(config.timeout_seconds))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {credentials}"),
        }
    }

    /// GET /api/document/rag/?query=...
    pub async fn rag_query(&self, query: &str) -> Result<Bytes, ApiError> {
        debug!("Forwarding query upstream: {} chars", query.chars().count());

        let url = format!("{}/api/document/rag/", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("query", query)])
            .header(AUTHORIZATION, self.auth_header.as_str())
            .send()
            .await
            .map_err(|e| ApiError::UpstreamFailure(format!("Query request failed: {e}")))?;

        Self::success_bytes(response).await
    }

    /// POST /api/document/upload/ with the file under a `document` field.
    pub async fn upload_document(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<Bytes, ApiError> {
        debug!("Forwarding upload upstream: {} ({} bytes)", filename, data.len());

        let part = multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| {
                ApiError::UpstreamFailure(format!("Invalid content type {content_type}: {e}"))
            })?;
        let form = multipart::Form::new().part("document", part);

        let url = format!("{}/api/document/upload/", self.base_url);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .header(AUTHORIZATION, self.auth_header.as_str())
            .send()
            .await
            .map_err(|e| ApiError::UpstreamFailure(format!("Upload request failed: {e}")))?;

        Self::success_bytes(response).await
    }

    /// GET /api/document/list/
    pub async fn list_documents(&self) -> Result<Bytes, ApiError> {
        let url = format!("{}/api/document/list/", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.auth_header.as_str())
            .send()
            .await
            .map_err(|e| ApiError::UpstreamFailure(format!("List request failed: {e}")))?;

        Self::success_bytes(response).await
    }

    async fn success_bytes(response: reqwest::Response) -> Result<Bytes, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UpstreamFailure(format!(
                "Upstream returned {status}: {body}"
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| ApiError::UpstreamFailure(format!("Failed to read upstream body: {e}")))
    }
}

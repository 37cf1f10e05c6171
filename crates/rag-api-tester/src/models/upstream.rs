use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use crate::utils::error::ApiError;

// ===== SHARED TYPES =====

/// Identifier as serialized by the upstream: integer in current payloads,
/// string in older ones.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UpstreamId {
    Number(i64),
    Text(String),
}

impl fmt::Display for UpstreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamId::Number(n) => write!(f, "{n}"),
            UpstreamId::Text(s) => f.write_str(s),
        }
    }
}

// ===== QUERY RESPONSE =====

#[derive(Debug, Clone, Deserialize)]
pub struct RagQueryResponse {
    pub chunks: Vec<RetrievedChunk>,
}

/// One scored hit from the retrieval endpoint. Field aliases cover the
/// spellings observed across upstream revisions.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievedChunk {
    pub id: UpstreamId,
    #[serde(alias = "text")]
    pub content: String,
    #[serde(default, alias = "similarity")]
    pub score: Option<f64>,
    #[serde(default, alias = "document")]
    pub source: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl RagQueryResponse {
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        serde_json::from_slice(body)
            .map_err(|e| ApiError::MalformedUpstreamResponse(format!("query response: {e}")))
    }
}

// ===== DOCUMENT LIST =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChunkingStatus {
    #[default]
    Pending,
    Processing,
    Done,
    Error,
}

impl ChunkingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkingStatus::Pending => "pending",
            ChunkingStatus::Processing => "processing",
            ChunkingStatus::Done => "done",
            ChunkingStatus::Error => "error",
        }
    }
}

/// A document row as returned by the upstream list endpoint. Only `id`,
/// `name` and `created_at` are required; everything else defaults so a
/// sparse payload still parses.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRecord {
    #[serde(alias = "document_id")]
    pub id: i64,
    #[serde(alias = "filename")]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub file: Option<String>,  // storage path or URL
    #[serde(default)]
    pub extracted_text: String,
    #[serde(default)]
    pub chunking_offset: i64,
    #[serde(default)]
    pub is_public: bool,
    #[serde(alias = "uploaded_at")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub chunking_status: ChunkingStatus,
    #[serde(default)]
    pub chunking_done: bool,
    #[serde(default)]
    pub last_error: String,
    #[serde(default)]
    pub retry_count: i64,
}

impl DocumentRecord {
    pub fn parse_list(body: &[u8]) -> Result<Vec<Self>, ApiError> {
        serde_json::from_slice(body)
            .map_err(|e| ApiError::MalformedUpstreamResponse(format!("document list: {e}")))
    }
}

// ===== UPLOAD RECEIPT =====

#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    pub success: bool,
    #[serde(default)]
    pub document_id: Option<UpstreamId>,
    #[serde(default)]
    pub message: String,
}

impl UploadReceipt {
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        serde_json::from_slice(body)
            .map_err(|e| ApiError::MalformedUpstreamResponse(format!("upload receipt: {e}")))
    }
}

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::document::chunker::{Chunk, TextChunker};
use crate::models::upstream::{
    ChunkingStatus, DocumentRecord, RagQueryResponse, RetrievedChunk, UploadReceipt,
};
use crate::services::UpstreamClient;

/// Severity of a pending notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A notification for whatever shell renders this state. Replaced on
/// every operation, never queued.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub title: String,
    pub detail: String,
    pub level: NoticeLevel,
}

impl Notice {
    fn info(title: &str, detail: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            detail: detail.into(),
            level: NoticeLevel::Info,
        }
    }

    fn error(title: &str, detail: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            detail: detail.into(),
            level: NoticeLevel::Error,
        }
    }
}

/// One row of the documents table.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentRow {
    pub id: String,
    pub filename: String,
    pub status: ChunkingStatus,
    pub uploaded_at: DateTime<Utc>,
}

impl From<DocumentRecord> for DocumentRow {
    fn from(record: DocumentRecord) -> Self {
        Self {
            id: record.id.to_string(),
            filename: record.name,
            status: record.chunking_status,
            uploaded_at: record.created_at,
        }
    }
}

/// One retrieval hit, with display defaults filled in for fields the
/// upstream left out.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryHit {
    pub id: String,
    pub content: String,
    pub score: f64,
    pub source: String,
    pub metadata: Value,
}

impl From<RetrievedChunk> for QueryHit {
    fn from(chunk: RetrievedChunk) -> Self {
        Self {
            id: chunk.id.to_string(),
            content: chunk.content,
            score: chunk.score.unwrap_or(0.0),
            source: chunk.source.unwrap_or_else(|| "unknown".to_string()),
            metadata: chunk.metadata.unwrap_or_else(|| Value::Object(Default::default())),
        }
    }
}

/// The file picked for upload or local preview.
#[derive(Clone, Debug)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .to_string();
        Self {
            name,
            content_type,
            data,
        }
    }
}

/// Output of running the local chunking engine over the selected file.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkPreview {
    pub filename: String,
    pub total_chunks: usize,
    pub chunks: Vec<Chunk>,
}

/// Tester state machine: documents table, query results, file selection
/// and notices, driven against the upstream client.
pub struct App {
    client: Arc<UpstreamClient>,
    chunker: TextChunker,

    // Documents tab
    pub documents: Vec<DocumentRow>,
    pub is_loading_documents: bool,

    // Query tab
    pub query: String,
    pub query_results: Vec<QueryHit>,
    pub is_querying: bool,
    pub has_queried: bool,

    // Upload / local preview
    pub selected_file: Option<SelectedFile>,
    pub is_uploading: bool,
    pub local_preview: Option<ChunkPreview>,

    pub notice: Option<Notice>,
}

impl App {
    pub fn new(client: Arc<UpstreamClient>, chunker: TextChunker) -> Self {
        Self {
            client,
            chunker,
            documents: Vec::new(),
            is_loading_documents: false,
            query: String::new(),
            query_results: Vec::new(),
            is_querying: false,
            has_queried: false,
            selected_file: None,
            is_uploading: false,
            local_preview: None,
            notice: None,
        }
    }

    pub fn select_file(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.selected_file = Some(SelectedFile::new(name, data));
    }

    pub fn clear_selection(&mut self) {
        self.selected_file = None;
    }

    // Async operations (called from the shell's event loop)

    /// Refresh the documents table from the upstream list endpoint.
    pub async fn load_documents(&mut self) {
        self.is_loading_documents = true;

        let result = self.client.list_documents().await;
        match result.and_then(|body| DocumentRecord::parse_list(&body)) {
            Ok(records) => {
                self.documents = records.into_iter().map(DocumentRow::from).collect();
            }
            Err(e) => {
                warn!("Failed to load documents: {}", e);
                self.notice = Some(Notice::error(
                    "Failed to load documents",
                    "Could not connect to the API. Please check your connection.",
                ));
            }
        }

        self.is_loading_documents = false;
    }

    /// Run the current query against the upstream retrieval endpoint.
    pub async fn run_query(&mut self) {
        let query = self.query.trim().to_string();
        if query.is_empty() {
            self.notice = Some(Notice::error(
                "No query entered",
                "Please enter a query to search for relevant chunks.",
            ));
            return;
        }

        self.is_querying = true;
        self.has_queried = true;

        let result = self.client.rag_query(&query).await;
        match result.and_then(|body| RagQueryResponse::parse(&body)) {
            Ok(response) => {
                self.query_results = response.chunks.into_iter().map(QueryHit::from).collect();
                self.notice = Some(Notice::info(
                    "Query completed!",
                    format!("Found {} relevant chunks", self.query_results.len()),
                ));
            }
            Err(e) => {
                warn!("Query failed: {}", e);
                self.query_results.clear();
                self.notice = Some(Notice::error(
                    "Query failed",
                    "There was an error processing your query. Please try again.",
                ));
            }
        }

        self.is_querying = false;
    }

    /// Upload the selected file to the upstream processing pipeline and,
    /// on success, drop the selection and refresh the documents table.
    pub async fn upload_selected(&mut self) {
        let Some(file) = self.selected_file.clone() else {
            self.notice = Some(Notice::error(
                "No file selected",
                "Please select a document to upload.",
            ));
            return;
        };

        self.is_uploading = true;

        let result = self
            .client
            .upload_document(&file.name, &file.content_type, file.data)
            .await;
        match result.and_then(|body| UploadReceipt::parse(&body)) {
            Ok(receipt) => {
                info!(
                    "Upstream accepted {}: success={} document_id={:?}",
                    file.name, receipt.success, receipt.document_id
                );
                self.notice = Some(Notice::info(
                    "Document uploaded!",
                    format!("Successfully uploaded {}", file.name),
                ));
                self.selected_file = None;
                self.load_documents().await;
            }
            Err(e) => {
                warn!("Upload failed: {}", e);
                self.notice = Some(Notice::error(
                    "Upload failed",
                    "There was an error uploading your document. Please try again.",
                ));
            }
        }

        self.is_uploading = false;
    }

    /// Run the chunking engine over the selected file without touching
    /// the upstream. The file is read as UTF-8 text.
    pub fn preview_chunks(&mut self) {
        let (name, text) = match &self.selected_file {
            Some(file) => (
                file.name.clone(),
                String::from_utf8_lossy(&file.data).into_owned(),
            ),
            None => {
                self.notice = Some(Notice::error(
                    "No file selected",
                    "Please select a document to preview.",
                ));
                return;
            }
        };

        let chunks = self.chunker.chunk(&text, &name);
        let total_chunks = chunks.len();

        self.local_preview = Some(ChunkPreview {
            filename: name.clone(),
            total_chunks,
            chunks,
        });
        self.notice = Some(Notice::info(
            "Document processed",
            format!("Split {name} into {total_chunks} chunks"),
        ));
    }
}

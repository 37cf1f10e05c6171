pub mod upstream;

pub use upstream::{
    ChunkingStatus, DocumentRecord, RagQueryResponse, RetrievedChunk, UploadReceipt, UpstreamId,
};

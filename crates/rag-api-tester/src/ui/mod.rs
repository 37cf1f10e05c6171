pub mod app;

pub use app::{App, ChunkPreview, DocumentRow, Notice, NoticeLevel, QueryHit, SelectedFile};

pub mod chunker;

pub use chunker::{Chunk, ChunkMetadata, TextChunker};

pub mod config;
pub mod document;
pub mod handlers;
pub mod models;
pub mod services;
pub mod ui;
pub mod utils;

pub use config::Settings;
pub use document::chunker::{Chunk, TextChunker};
pub use utils::error::ApiError;

pub mod settings;

pub use settings::{ChunkingConfig, ServerConfig, Settings, UpstreamConfig};

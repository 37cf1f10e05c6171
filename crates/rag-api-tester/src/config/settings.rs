use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::document::chunker::DEFAULT_MAX_CHUNK_CHARS;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Connection details for the hosted RAG API. Credentials have no
/// default and no config-file entry; they must come from the
/// environment (APP__UPSTREAM__USERNAME / APP__UPSTREAM__PASSWORD).
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
        }
    }
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHUNK_CHARS
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Load from config file
            .add_source(File::with_name("config/settings").required(false))
            // Override with environment variables (prefix: APP)
            // Example: APP_UPSTREAM__BASE_URL=http://...
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            anyhow::bail!("server.host must not be empty");
        }

        if self.upstream.base_url.trim().is_empty() {
            anyhow::bail!("upstream.base_url must not be empty");
        }

        if self.upstream.username.trim().is_empty() || self.upstream.password.trim().is_empty() {
            anyhow::bail!(
                "Upstream credentials missing: set APP__UPSTREAM__USERNAME and \
                 APP__UPSTREAM__PASSWORD (the tester ships without a default login)"
            );
        }

        Ok(())
    }
}

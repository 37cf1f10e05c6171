use anyhow::Result;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber: filtered stdout plus a daily rolling
/// file under logs/. `LOG_FORMAT=json` switches stdout to JSON lines.
pub fn init_logger() -> Result<()> {
    let log_level = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,rag_api_tester=debug".to_string());
    let filter = EnvFilter::try_new(&log_level)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("rag-api-tester")
        .filename_suffix("log")
        .build("logs")?;
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_ansi(false);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => {
            registry
                .with(fmt::layer().json().with_target(true).with_thread_ids(true))
                .init();
        }
        _ => {
            registry.with(fmt::layer().pretty().with_target(true)).init();
        }
    }

    Ok(())
}

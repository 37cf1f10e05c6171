use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use rag_api_tester::config::Settings;
use rag_api_tester::document::TextChunker;
use rag_api_tester::handlers::build_router;
use rag_api_tester::services::UpstreamClient;
use rag_api_tester::ui::{App, NoticeLevel};
use rag_api_tester::utils::logger;

#[derive(Parser, Debug)]
#[command(
    name = "rag-api-tester",
    version,
    about = "Test bench for a hosted RAG document API"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the local proxy server for a browser UI
    Serve,
    /// List the documents known to the upstream
    Documents,
    /// Run a retrieval query and print the scored hits
    Query {
        /// Free-text query
        query: String,
    },
    /// Upload a document into the upstream processing pipeline
    Upload {
        /// File to upload
        file: PathBuf,
    },
    /// Chunk a text file locally, without touching the upstream
    Chunk {
        /// Text file to split
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init_logger()?;

    let cli = Cli::parse();

    let settings = Settings::load()?;
    info!("Configuration loaded");

    let client = Arc::new(UpstreamClient::new(&settings.upstream));
    let chunker = TextChunker::new(settings.chunking.max_chars);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&settings, client).await,
        Command::Documents => list_documents(client, chunker).await,
        Command::Query { query } => run_query(client, chunker, query).await,
        Command::Upload { file } => upload(client, chunker, &file).await,
        Command::Chunk { file } => chunk_file(client, chunker, &file),
    }
}

async fn serve(settings: &Settings, client: Arc<UpstreamClient>) -> Result<()> {
    let app = build_router(client);

    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("Proxy listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn list_documents(client: Arc<UpstreamClient>, chunker: TextChunker) -> Result<()> {
    let mut app = App::new(client, chunker);
    app.load_documents().await;
    check_notice(&app)?;

    for row in &app.documents {
        println!(
            "{:>6}  {:<10}  {}  {}",
            row.id,
            row.status.as_str(),
            row.uploaded_at.to_rfc3339(),
            row.filename
        );
    }

    Ok(())
}

async fn run_query(client: Arc<UpstreamClient>, chunker: TextChunker, query: String) -> Result<()> {
    let mut app = App::new(client, chunker);
    app.query = query;
    app.run_query().await;
    check_notice(&app)?;

    for hit in &app.query_results {
        println!("[{:.3}] {} ({})", hit.score, hit.id, hit.source);
        println!("{}", hit.content);
        println!();
    }

    Ok(())
}

async fn upload(client: Arc<UpstreamClient>, chunker: TextChunker, file: &Path) -> Result<()> {
    let data = tokio::fs::read(file).await?;

    let mut app = App::new(client, chunker);
    app.select_file(display_name(file), data);
    app.upload_selected().await;
    check_notice(&app)?;

    Ok(())
}

fn chunk_file(client: Arc<UpstreamClient>, chunker: TextChunker, file: &Path) -> Result<()> {
    let data = std::fs::read(file)?;

    let mut app = App::new(client, chunker);
    app.select_file(display_name(file), data);
    app.preview_chunks();
    check_notice(&app)?;

    if let Some(preview) = &app.local_preview {
        println!("{}", serde_json::to_string_pretty(preview)?);
    }

    Ok(())
}

fn display_name(file: &Path) -> String {
    file.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string()
}

/// Surface the operation's notice: info goes to the log, an error ends
/// the run with a nonzero exit.
fn check_notice(app: &App) -> Result<()> {
    if let Some(notice) = &app.notice {
        match notice.level {
            NoticeLevel::Error => anyhow::bail!("{}: {}", notice.title, notice.detail),
            NoticeLevel::Info => info!("{}: {}", notice.title, notice.detail),
        }
    }

    Ok(())
}

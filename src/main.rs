use ambient_scribe::note::OpenAiGenerator;
use ambient_scribe::store::{JsonTemplateStore, JsonVisitStore};
use ambient_scribe::transcribe::{ChunkTranscriber, ProviderFactory};
use ambient_scribe::{create_router, AppState, Config};
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "ambient-scribe", about = "Ambient clinical scribe service")]
struct Args {
    /// Path to the config file (extension optional)
    #[arg(long, default_value = "config/scribe")]
    config: String,

    /// Override the HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;
    let port = args.port.unwrap_or(cfg.service.http.port);

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Transcription provider: {}", cfg.transcription.provider);

    // Credentials are validated here, before any network attempt
    let provider = ProviderFactory::create(&cfg.transcription)?;
    let transcriber = Arc::new(ChunkTranscriber::new(
        provider,
        cfg.transcription.min_chunk_bytes,
        cfg.transcription.language.clone(),
        &cfg.transcription.vocabulary,
    ));
    let generator = OpenAiGenerator::from_config(&cfg.generation)?;

    let templates = Arc::new(JsonTemplateStore::new(cfg.storage.templates_path())?);
    let visits = Arc::new(JsonVisitStore::new(cfg.storage.visits_path())?);

    let state = AppState::new(transcriber, generator, templates, visits);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}

use anyhow::{Context, Result};
use annals::{
    api,
    app_state::AppState,
    classifier::{Classifier, Lexicon},
    config::{Config, LogFormat},
    events::MemoryEventRepository,
    extractor::{ContentExtractor, SourcePolicy},
    fetcher::FetchOptions,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format());

    let lexicon = Lexicon::load(config.lexicon_path()).context("Failed to load lexicon")?;
    let classifier = Classifier::new(&lexicon);

    let options = FetchOptions {
        timeout: config.fetch_timeout(),
        ..FetchOptions::default()
    };
    let extractor = ContentExtractor::new(SourcePolicy::new(config.allowed_host()), options)
        .context("Failed to build HTTP client")?;

    let state = AppState::new(
        classifier,
        extractor,
        Arc::new(MemoryEventRepository::new()),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr()))?;
    info!(addr = %config.bind_addr(), "Server listening");

    axum::serve(listener, api::router(state)).await?;
    Ok(())
}

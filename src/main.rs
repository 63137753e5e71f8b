//! Binary entry point.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use domainchat::api::server::{start_server, AppState};
use domainchat::cache::ResponseCache;
use domainchat::chat::ChatService;
use domainchat::config::Config;
use domainchat::domains::{DomainChecker, DomainRegistry};
use domainchat::providers::OpenAiProvider;
use domainchat::recovery::RecoveryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    let provider =
        OpenAiProvider::from_config(&config.openai).context("OpenAI initialization failed")?;

    let cache = ResponseCache::new(Duration::from_secs(config.cache.ttl_secs));
    cache.spawn_sweeper(Duration::from_secs(config.cache.sweep_interval_secs));

    let chat = ChatService::new(Arc::new(provider), cache, &config.retry);
    let state = AppState::new(
        chat,
        DomainChecker::new(DomainRegistry::new()),
        RecoveryStore::new(),
        config.server.environment.clone(),
    );

    info!("Environment: {}", config.server.environment);
    info!("Model: {}", config.openai.model);

    start_server(&config.server, state)
        .await
        .context("server failed")?;
    Ok(())
}

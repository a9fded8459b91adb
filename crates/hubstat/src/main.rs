mod cli;

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hubstat::server::router;
use hubstat_api::GitHubClient;
use hubstat_core::{Aggregator, StatsCache};

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.debug);

    // Every startup failure is logged and exits; once serving, nothing
    // is fatal -- refresh errors surface as scrape-error samples.
    if let Err(err) = run(cli).await {
        error!("failed to start: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug { "hubstat=debug" } else { "hubstat=info" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = hubstat_config::load(cli.config.as_deref())?;
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }
    config.validate()?;

    let token = config.resolve_token()?;
    if token.is_none() {
        info!("no GitHub token configured; using anonymous access (low rate limit)");
    }

    let client = GitHubClient::new(&config.github.api_url, token.as_ref())?;
    let aggregator = Aggregator::new(
        client,
        config.repos.users.clone(),
        config.repos.repos.clone(),
        config.repos.include_archived,
    );
    let cache = Arc::new(StatsCache::new(aggregator, config.cache_lifetime()));

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    info!(
        listen = %config.server.listen,
        users = config.repos.users.len(),
        repos = config.repos.repos.len(),
        lifetime_secs = config.cache.lifetime_secs,
        "serving metrics"
    );

    axum::serve(listener, router(cache)).await?;
    Ok(())
}

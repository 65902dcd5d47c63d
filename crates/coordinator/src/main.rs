mod config;
mod dispatcher;
mod http;
mod index;
mod merger;
mod pending;
mod query;
mod state;
mod status;

use std::sync::Arc;

use clap::Parser;
use idx_common::broker::redis_broker::RedisBroker;
use idx_common::broker::BrokerClient;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Config};
use crate::index::InvertedIndex;
use crate::pending::PendingSet;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::resolve(Cli::parse())?;

    tracing::info!(port = config.port, broker = ?config.broker, "starting coordinator");

    // Boot step 1: do not serve requests until the broker is reachable.
    let broker: Arc<dyn BrokerClient> = Arc::new(
        RedisBroker::connect_with_backoff(&config.broker.host, config.broker.port, 10).await?,
    );

    // Boot step 2: load the prior snapshot, proceeding on absence.
    let index = Arc::new(InvertedIndex::new());
    index.load(&config.index_path)?;

    let pending = Arc::new(PendingSet::new());

    // Boot step 3: start the merger subscription as a background task.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let merger_handle = tokio::spawn(merger::run(
        broker.clone(),
        index.clone(),
        pending.clone(),
        shutdown_rx,
    ));

    let state = AppState {
        broker,
        index,
        pending,
        language: config.language,
        config: Arc::new(config.clone()),
    };

    // Boot step 4: start serving HTTP.
    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    let app = http::router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    let _ = merger_handle.await;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received, draining in-flight merges");
}

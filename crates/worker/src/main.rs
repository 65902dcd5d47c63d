mod config;
mod heartbeat;
mod task_loop;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use idx_common::broker::redis_broker::RedisBroker;
use idx_common::broker::BrokerClient;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::resolve(Cli::parse())?;
    let worker_id = config::worker_id(&config.worker_id_prefix);

    tracing::info!(worker_id, language = %config.language, "starting worker");

    let broker: Arc<dyn BrokerClient> = Arc::new(
        RedisBroker::connect_with_backoff(&config.broker.host, config.broker.port, 10).await?,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let task_loop = tokio::spawn({
        let broker = broker.clone();
        let worker_id = worker_id.clone();
        let language = config.language;
        let shutdown_rx = shutdown_rx.clone();
        async move { task_loop::run(broker.as_ref(), &worker_id, language, shutdown_rx).await }
    });

    let heartbeat_loop = tokio::spawn({
        let broker = broker.clone();
        let worker_id = worker_id.clone();
        let interval = Duration::from_secs(config.heartbeat_interval_secs);
        async move { heartbeat::run(broker.as_ref(), &worker_id, interval, shutdown_rx).await }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    let _ = shutdown_tx.send(true);

    let _ = tokio::join!(task_loop, heartbeat_loop);
    Ok(())
}

//! ImageHub relay - forwards upload events from SQS to the SNS notification topic.
//!
//! Polls the upload queue on a fixed delay, hands each message to a bounded
//! worker pool, and drains the pool on SIGINT/SIGTERM.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use imagehub::aws::load_sdk_config;
use imagehub::util::shutdown_signal;
use imagehub::{Config, RelayPoller, SnsPublisher, SqsQueue};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    tracing::info!("relay_starting");

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        region = %config.aws_region,
        queue_url = %config.relay.queue_url,
        topic_arn = %config.relay.topic_arn,
        pool_size = config.relay.worker_pool_size,
        poll_interval_ms = config.relay.poll_interval.as_millis() as u64,
        "config_loaded"
    );

    let sdk_config = load_sdk_config(&config).await;

    let queue = SqsQueue::new(
        aws_sdk_sqs::Client::new(&sdk_config),
        config.relay.queue_url.clone(),
    );
    let publisher = SnsPublisher::new(
        aws_sdk_sns::Client::new(&sdk_config),
        config.relay.topic_arn.clone(),
    );

    let poller = RelayPoller::new(Arc::new(queue), Arc::new(publisher), config.relay.clone());

    if let Err(e) = poller.run(shutdown_signal()).await {
        // Unfinished deliveries stay in the queue and are redelivered after restart.
        tracing::warn!(error = %e, "relay_unclean_shutdown");
    }

    tracing::info!("relay_exited");
    Ok(())
}

//! Configuration module for environment variable parsing.
//!
//! All settings come from environment variables. Queue and topic identifiers
//! are required; everything else falls back to a default.

use std::env;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

/// Upper bound the queue service accepts for a single receive call.
pub const MAX_BATCH_SIZE: i32 = 10;

/// Upper bound for the long-poll wait of a single receive call.
pub const MAX_WAIT_TIME_SECONDS: i32 = 10;

pub const DEFAULT_NOTIFICATION_SUBJECT: &str = "New Image Uploaded";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// AWS region shared by every client
    pub aws_region: String,

    /// Optional endpoint override (localstack and friends)
    pub aws_endpoint_url: Option<String>,

    /// DynamoDB table holding per-image analytics counters
    pub analytics_table_name: String,

    pub relay: RelayConfig,
}

/// Settings consumed by the relay poller and its worker pool.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// SQS queue URL the upload events arrive on
    pub queue_url: String,

    /// SNS topic ARN notifications are published to
    pub topic_arn: String,

    /// Number of delivery workers in the pool
    pub worker_pool_size: usize,

    /// Fixed delay between the end of one poll cycle and the start of the next
    pub poll_interval: Duration,

    /// Messages requested per receive call (1..=10)
    pub max_messages: i32,

    /// Long-poll wait per receive call in seconds (0..=10)
    pub wait_time_seconds: i32,

    /// How long the pool may take to drain on shutdown
    pub shutdown_grace: Duration,

    /// Subject line of every published notification
    pub notification_subject: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig {
            queue_url: String::new(),
            topic_arn: String::new(),
            worker_pool_size: 5,
            poll_interval: Duration::from_millis(5000),
            max_messages: MAX_BATCH_SIZE,
            wait_time_seconds: MAX_WAIT_TIME_SECONDS,
            shutdown_grace: Duration::from_millis(30_000),
            notification_subject: DEFAULT_NOTIFICATION_SUBJECT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = RelayConfig::default();

        let worker_pool_size = match parse_var::<usize>("RELAY_WORKER_POOL_SIZE") {
            Some(0) => {
                warn!(env_var = "RELAY_WORKER_POOL_SIZE", "Pool size must be positive, using default");
                defaults.worker_pool_size
            }
            Some(n) => n,
            None => defaults.worker_pool_size,
        };

        let relay = RelayConfig {
            queue_url: require("SQS_QUEUE_URL")?,

            topic_arn: require("SNS_TOPIC_ARN")?,

            worker_pool_size,

            poll_interval: parse_var("RELAY_POLL_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll_interval),

            max_messages: clamp_var("RELAY_MAX_MESSAGES", 1, MAX_BATCH_SIZE, defaults.max_messages),

            wait_time_seconds: clamp_var(
                "RELAY_WAIT_TIME_SECONDS",
                0,
                MAX_WAIT_TIME_SECONDS,
                defaults.wait_time_seconds,
            ),

            shutdown_grace: parse_var("RELAY_SHUTDOWN_GRACE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.shutdown_grace),

            notification_subject: env::var("RELAY_NOTIFICATION_SUBJECT")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.notification_subject),
        };

        Ok(Config {
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-west-2".to_string()),

            aws_endpoint_url: env::var("AWS_ENDPOINT_URL").ok().filter(|s| !s.is_empty()),

            analytics_table_name: env::var("DYNAMODB_TABLE_NAME")
                .unwrap_or_else(|_| "image-analytics".to_string()),

            relay,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}

/// Parse a variable, warning (and returning `None`) when it is set but unparseable.
fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            None
        }
    }
}

/// Parse an integer variable and clamp it into `min..=max`.
fn clamp_var(name: &str, min: i32, max: i32, default: i32) -> i32 {
    let Some(value) = parse_var::<i32>(name) else {
        return default;
    };

    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!(env_var = name, value, clamped, "Value out of range, clamping");
    }
    clamped
}

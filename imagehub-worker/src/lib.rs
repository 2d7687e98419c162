//! ImageHub worker - upload notification relay and image analytics counters.
//!
//! This library provides:
//! - `relay`: drains the upload SQS queue into the notification SNS topic
//!   through a fixed-size worker pool, deleting messages only after publish
//! - `analytics`: view/download counters kept in DynamoDB with a
//!   conditional-update-or-create protocol
//!
//! ## Architecture
//!
//! ```text
//! Upload API → SQS → RelayPoller → WorkerPool → SNS → email subscribers
//! Request handlers → CounterService → DynamoDB
//! ```

pub mod analytics;
pub mod aws;
pub mod config;
pub mod queue;
pub mod relay;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use analytics::{CounterKind, CounterService, DynamoCounterStore};
pub use config::{Config, RelayConfig};
pub use queue::{MessageQueue, Notifier, SnsPublisher, SqsQueue};
pub use relay::RelayPoller;

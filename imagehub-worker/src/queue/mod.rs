//! Queue and notification channel access.
//!
//! This module provides:
//! - Message types for the relay
//! - The `MessageQueue` and `Notifier` seams the relay is written against
//! - SQS and SNS implementations of those seams
//!
//! ## Architecture
//!
//! ```text
//! Upload API → SQS upload queue → Relay → SNS topic → subscribers
//! ```

pub mod publisher;
pub mod sqs;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use publisher::SnsPublisher;
pub use sqs::SqsQueue;
pub use types::{NotificationPayload, QueueMessage, UploadEvent};

/// Failure of a call to the queue or notification service.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("receive failed: {0}")]
    Receive(String),
    #[error("publish failed: {0}")]
    Publish(String),
    #[error("delete failed: {0}")]
    Delete(String),
}

/// A work queue with long-poll receive and handle-based delete.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Fetch up to `max_messages`, waiting up to `wait_seconds` if none are available.
    async fn receive(
        &self,
        max_messages: i32,
        wait_seconds: i32,
    ) -> Result<Vec<QueueMessage>, QueueError>;

    /// Remove a received message using its delivery handle.
    async fn delete(&self, receipt_handle: &str) -> Result<(), QueueError>;
}

/// A pub/sub channel bound to one topic.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, payload: &NotificationPayload) -> Result<(), QueueError>;
}

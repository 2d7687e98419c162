//! SNS publisher for upload notifications.
//!
//! The publisher is cheap to clone and can be shared across all delivery
//! workers; the underlying SDK client pools its own connections.

use async_trait::async_trait;
use aws_sdk_sns::{error::DisplayErrorContext, Client};
use tracing::info;

use super::{NotificationPayload, Notifier, QueueError};

/// Publishes notifications to a single SNS topic.
#[derive(Clone)]
pub struct SnsPublisher {
    client: Client,
    topic_arn: String,
}

impl SnsPublisher {
    /// Create a new publisher bound to `topic_arn`.
    pub fn new(client: Client, topic_arn: String) -> Self {
        Self { client, topic_arn }
    }
}

#[async_trait]
impl Notifier for SnsPublisher {
    async fn publish(&self, payload: &NotificationPayload) -> Result<(), QueueError> {
        let output = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(&payload.subject)
            .message(&payload.message)
            .send()
            .await
            .map_err(|e| QueueError::Publish(DisplayErrorContext(&e).to_string()))?;

        info!(
            topic_arn = %self.topic_arn,
            sns_message_id = output.message_id().unwrap_or("unknown"),
            body_length = payload.message.len(),
            "sns_notification_published"
        );

        Ok(())
    }
}

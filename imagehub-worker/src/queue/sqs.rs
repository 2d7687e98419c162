//! SQS-backed upload queue.

use async_trait::async_trait;
use aws_sdk_sqs::{error::DisplayErrorContext, Client};
use tracing::{debug, warn};

use super::{MessageQueue, QueueError, QueueMessage};

/// Upload queue backed by an SQS queue URL.
#[derive(Clone)]
pub struct SqsQueue {
    client: Client,
    queue_url: String,
}

impl SqsQueue {
    pub fn new(client: Client, queue_url: String) -> Self {
        Self { client, queue_url }
    }
}

#[async_trait]
impl MessageQueue for SqsQueue {
    async fn receive(
        &self,
        max_messages: i32,
        wait_seconds: i32,
    ) -> Result<Vec<QueueMessage>, QueueError> {
        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(max_messages)
            .wait_time_seconds(wait_seconds)
            .send()
            .await
            .map_err(|e| QueueError::Receive(DisplayErrorContext(&e).to_string()))?;

        let mut messages = Vec::with_capacity(output.messages().len());
        for msg in output.messages() {
            let message_id = msg.message_id().unwrap_or("unknown").to_string();

            // Without a handle the message can never be deleted; let it time out and come back.
            let Some(receipt_handle) = msg.receipt_handle() else {
                warn!(message_id = %message_id, "sqs_message_missing_receipt_handle");
                continue;
            };

            messages.push(QueueMessage {
                message_id,
                receipt_handle: receipt_handle.to_string(),
                body: msg.body().unwrap_or_default().to_string(),
            });
        }

        debug!(
            queue_url = %self.queue_url,
            message_count = messages.len(),
            "sqs_receive_complete"
        );

        Ok(messages)
    }

    async fn delete(&self, receipt_handle: &str) -> Result<(), QueueError> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| QueueError::Delete(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}

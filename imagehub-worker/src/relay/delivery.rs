//! Delivery of a single queue message to the notification topic.

use thiserror::Error;
use tracing::{error, info};

use crate::queue::{MessageQueue, NotificationPayload, Notifier, QueueError, QueueMessage};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("malformed message body: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Forward one message: build the notification, publish it, then delete the message.
///
/// The delete only happens after a successful publish. Any error leaves the
/// message in the queue so it is redelivered on a later poll.
pub async fn deliver(
    queue: &dyn MessageQueue,
    notifier: &dyn Notifier,
    subject: &str,
    message: &QueueMessage,
) -> Result<(), RelayError> {
    let payload = NotificationPayload::from_body(subject, &message.body)?;

    notifier.publish(&payload).await?;
    queue.delete(&message.receipt_handle).await?;

    Ok(())
}

/// Run `deliver` and log the outcome. Used as the body of a pool job.
pub async fn deliver_and_log(
    queue: &dyn MessageQueue,
    notifier: &dyn Notifier,
    subject: &str,
    message: &QueueMessage,
) {
    match deliver(queue, notifier, subject, message).await {
        Ok(()) => {
            info!(message_id = %message.message_id, "relay_message_forwarded");
        }
        Err(RelayError::MalformedBody(e)) => {
            let preview = &message.body[..floor_char_boundary(&message.body, 500)];
            error!(
                message_id = %message.message_id,
                error = %e,
                body_preview = %preview,
                "relay_message_malformed"
            );
        }
        Err(e) => {
            error!(
                message_id = %message.message_id,
                error = %e,
                "relay_message_failed"
            );
        }
    }
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

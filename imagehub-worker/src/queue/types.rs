//! Message types flowing through the relay.
//!
//! - `QueueMessage`: what the queue hands out on receive
//! - `UploadEvent`: the JSON body producers put on the queue
//! - `NotificationPayload`: what gets published to the topic

use serde::{Deserialize, Serialize};

/// A message received from the upload queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    /// Queue-assigned identifier, used for logging only
    pub message_id: String,
    /// Delivery handle proving receipt; required to delete the message
    pub receipt_handle: String,
    /// Raw JSON body
    pub body: String,
}

/// Upload event published by the upload endpoint.
///
/// Field names match the JSON produced upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadEvent {
    /// Human-readable file name
    pub file_name: String,
    /// Size in bytes
    pub size: u64,
    /// File extension, e.g. `png`
    pub extension: String,
    /// Presigned or public download link
    pub download_url: String,
}

/// Notification derived from an upload event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub subject: String,
    pub message: String,
}

impl NotificationPayload {
    /// Build the notification for an upload event.
    pub fn for_upload(subject: &str, event: &UploadEvent) -> Self {
        let message = format!(
            "An image was uploaded!\nName: {}\nSize: {} bytes\nType: {}\nDownload: {}",
            event.file_name, event.size, event.extension, event.download_url
        );

        Self {
            subject: subject.to_string(),
            message,
        }
    }

    /// Parse a raw queue body and build its notification.
    pub fn from_body(subject: &str, body: &str) -> Result<Self, serde_json::Error> {
        let event: UploadEvent = serde_json::from_str(body)?;
        Ok(Self::for_upload(subject, &event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_from_body() {
        let body = r#"{
            "fileName": "cat.png",
            "size": 20480,
            "extension": "png",
            "downloadUrl": "https://cdn.example.com/cat.png",
            "uploadedBy": "ignored"
        }"#;

        let payload = NotificationPayload::from_body("New Image Uploaded", body).unwrap();

        assert_eq!(payload.subject, "New Image Uploaded");
        assert_eq!(
            payload.message,
            "An image was uploaded!\nName: cat.png\nSize: 20480 bytes\nType: png\nDownload: https://cdn.example.com/cat.png"
        );
    }

    #[test]
    fn test_notification_missing_field() {
        let body = r#"{"fileName": "cat.png", "size": 1, "extension": "png"}"#;
        assert!(NotificationPayload::from_body("s", body).is_err());
    }

    #[test]
    fn test_notification_non_numeric_size() {
        let body = r#"{
            "fileName": "cat.png",
            "size": "big",
            "extension": "png",
            "downloadUrl": "https://cdn.example.com/cat.png"
        }"#;
        assert!(NotificationPayload::from_body("s", body).is_err());
    }

    #[test]
    fn test_notification_rejects_negative_and_quoted_size() {
        for size in [r#"-1"#, r#""1024""#] {
            let body = format!(
                r#"{{"fileName": "cat.png", "size": {size}, "extension": "png", "downloadUrl": "https://cdn.example.com/cat.png"}}"#
            );
            assert!(NotificationPayload::from_body("s", &body).is_err(), "size {size}");
        }
    }

    #[test]
    fn test_notification_not_json() {
        assert!(NotificationPayload::from_body("s", "not json").is_err());
    }
}

//! Storage seam for analytics counters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::record::{CounterKind, CounterRecord};

/// Result of a conditional increment that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The record existed and was incremented.
    Updated,
    /// No record exists for the key; nothing was written.
    NotFound,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("counter store request failed: {0}")]
    Request(String),
}

/// Key-value store with a single-key conditional write.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Add one to `kind`'s count and stamp `at`, only if a record for `image_id` exists.
    async fn conditional_increment(
        &self,
        image_id: u64,
        kind: CounterKind,
        at: DateTime<Utc>,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Write a whole record, replacing any existing one with the same key.
    async fn put(&self, record: &CounterRecord) -> Result<(), StoreError>;
}

//! View and download counters for images.
//!
//! An increment first tries a conditional update that only applies when the
//! record already exists. If the store reports the record missing, a fresh
//! record is written with the counter set to one.
//!
//! Two first increments racing on the same unseen image can both see the
//! record missing; both then write a fresh record and the later write wins,
//! losing one increment. No in-process lock guards this window; the store's
//! conditional write is the only coordination.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error};

use super::record::{CounterKind, CounterRecord};
use super::store::{CounterStore, StoreError, UpdateOutcome};

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("failed to increment {kind} count for image {image_id}")]
    Increment {
        kind: CounterKind,
        image_id: u64,
        #[source]
        source: StoreError,
    },
    #[error("failed to create analytics record for image {image_id}")]
    Create {
        image_id: u64,
        #[source]
        source: StoreError,
    },
}

#[derive(Clone)]
pub struct CounterService {
    store: Arc<dyn CounterStore>,
}

impl CounterService {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    pub async fn increment_view(&self, image_id: u64) -> Result<(), CounterError> {
        self.increment(CounterKind::View, image_id).await
    }

    pub async fn increment_download(&self, image_id: u64) -> Result<(), CounterError> {
        self.increment(CounterKind::Download, image_id).await
    }

    /// Add one to `kind`'s counter for `image_id`, creating the record if needed.
    pub async fn increment(&self, kind: CounterKind, image_id: u64) -> Result<(), CounterError> {
        let now = Utc::now();

        let outcome = self
            .store
            .conditional_increment(image_id, kind, now)
            .await
            .map_err(|source| {
                error!(image_id = image_id, kind = %kind, error = %source, "counter_increment_failed");
                CounterError::Increment {
                    kind,
                    image_id,
                    source,
                }
            })?;

        match outcome {
            UpdateOutcome::Updated => {
                debug!(image_id = image_id, kind = %kind, "counter_incremented");
            }
            UpdateOutcome::NotFound => {
                let record = CounterRecord::first(image_id, kind, now);
                self.store.put(&record).await.map_err(|source| {
                    error!(image_id = image_id, error = %source, "counter_record_create_failed");
                    CounterError::Create { image_id, source }
                })?;
                debug!(image_id = image_id, kind = %kind, "counter_record_created");
            }
        }

        Ok(())
    }
}

//! DynamoDB-backed counter store.
//!
//! ## Table schema
//! ```text
//! Partition key: id (N)
//! Attributes:
//!   - viewCount, downloadCount: N
//!   - lastViewTimestamp, lastDownloadTimestamp: S (RFC 3339, optional)
//!   - createdAt, updatedAt: S (RFC 3339)
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_dynamodb::{error::DisplayErrorContext, types::AttributeValue, Client};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info};

use crate::config::Config;

use super::record::{CounterKind, CounterRecord};
use super::store::{CounterStore, StoreError, UpdateOutcome};

pub struct DynamoCounterStore {
    client: Client,
    table_name: String,
}

impl DynamoCounterStore {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// Build a store on the configured analytics table.
    pub fn from_config(sdk_config: &SdkConfig, config: &Config) -> Self {
        info!(table_name = %config.analytics_table_name, "dynamodb_counter_store_configured");
        Self::new(Client::new(sdk_config), config.analytics_table_name.clone())
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

fn timestamp(at: DateTime<Utc>) -> AttributeValue {
    AttributeValue::S(at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn key(image_id: u64) -> AttributeValue {
    AttributeValue::N(image_id.to_string())
}

/// Update expression adding one to `kind`'s count and stamping both timestamps.
pub(crate) fn increment_expression(kind: CounterKind) -> String {
    format!(
        "ADD {} :increment SET {} = :timestamp, updatedAt = :updatedAt",
        kind.count_attribute(),
        kind.timestamp_attribute()
    )
}

pub(crate) fn record_to_item(record: &CounterRecord) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();
    item.insert("id".to_string(), key(record.image_id));
    item.insert(
        "viewCount".to_string(),
        AttributeValue::N(record.view_count.to_string()),
    );
    item.insert(
        "downloadCount".to_string(),
        AttributeValue::N(record.download_count.to_string()),
    );
    item.insert("createdAt".to_string(), timestamp(record.created_at));
    item.insert("updatedAt".to_string(), timestamp(record.updated_at));

    if let Some(at) = record.last_view_timestamp {
        item.insert("lastViewTimestamp".to_string(), timestamp(at));
    }
    if let Some(at) = record.last_download_timestamp {
        item.insert("lastDownloadTimestamp".to_string(), timestamp(at));
    }

    item
}

#[async_trait]
impl CounterStore for DynamoCounterStore {
    async fn conditional_increment(
        &self,
        image_id: u64,
        kind: CounterKind,
        at: DateTime<Utc>,
    ) -> Result<UpdateOutcome, StoreError> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("id", key(image_id))
            .update_expression(increment_expression(kind))
            .condition_expression("attribute_exists(id)")
            .expression_attribute_values(":increment", AttributeValue::N("1".to_string()))
            .expression_attribute_values(":timestamp", timestamp(at))
            .expression_attribute_values(":updatedAt", timestamp(at))
            .send()
            .await;

        match result {
            Ok(_) => {
                debug!(image_id = image_id, kind = %kind, "dynamodb_counter_incremented");
                Ok(UpdateOutcome::Updated)
            }
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    Ok(UpdateOutcome::NotFound)
                } else {
                    Err(StoreError::Request(
                        DisplayErrorContext(&service_error).to_string(),
                    ))
                }
            }
        }
    }

    async fn put(&self, record: &CounterRecord) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(record)))
            .send()
            .await
            .map_err(|e| StoreError::Request(DisplayErrorContext(&e).to_string()))?;

        debug!(image_id = record.image_id, "dynamodb_counter_record_written");
        Ok(())
    }
}

//! In-memory stand-ins for SQS, SNS and DynamoDB used by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::analytics::{CounterKind, CounterRecord, CounterStore, StoreError, UpdateOutcome};
use crate::queue::{MessageQueue, NotificationPayload, Notifier, QueueError, QueueMessage};

pub fn upload_body(file_name: &str) -> String {
    serde_json::json!({
        "fileName": file_name,
        "size": 1024,
        "extension": "png",
        "downloadUrl": format!("https://cdn.example.com/{file_name}"),
    })
    .to_string()
}

/// Side effects observed across the queue and the notifier, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Published(String),
    Deleted(String),
}

#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    fn record(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn snapshot(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }
}

/// Queue with SQS-like visibility: received messages stay in flight until deleted.
#[derive(Default)]
pub struct MemoryQueue {
    visible: Mutex<VecDeque<(String, String)>>,
    in_flight: Mutex<HashMap<String, (String, String)>>,
    receives: AtomicU64,
    fail_receives: AtomicBool,
    fail_deletes: AtomicBool,
    events: EventLog,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> EventLog {
        self.events.clone()
    }

    pub fn push(&self, message_id: &str, body: &str) {
        self.visible
            .lock()
            .unwrap()
            .push_back((message_id.to_string(), body.to_string()));
    }

    /// Simulate visibility timeouts lapsing for every undeleted message.
    pub fn requeue_in_flight(&self) {
        let mut in_flight = self.in_flight.lock().unwrap();
        let mut visible = self.visible.lock().unwrap();
        for (_, message) in in_flight.drain() {
            visible.push_back(message);
        }
    }

    pub fn visible_len(&self) -> usize {
        self.visible.lock().unwrap().len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.lock().unwrap().len()
    }

    pub fn fail_receives(&self, fail: bool) {
        self.fail_receives.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl MessageQueue for MemoryQueue {
    async fn receive(
        &self,
        max_messages: i32,
        _wait_seconds: i32,
    ) -> Result<Vec<QueueMessage>, QueueError> {
        if self.fail_receives.load(Ordering::SeqCst) {
            return Err(QueueError::Receive("queue unavailable".to_string()));
        }

        let mut visible = self.visible.lock().unwrap();
        let mut in_flight = self.in_flight.lock().unwrap();
        let mut batch = Vec::new();

        while batch.len() < max_messages.max(0) as usize {
            let Some((message_id, body)) = visible.pop_front() else {
                break;
            };
            let n = self.receives.fetch_add(1, Ordering::SeqCst);
            let receipt_handle = format!("{message_id}#{n}");
            in_flight.insert(receipt_handle.clone(), (message_id.clone(), body.clone()));
            batch.push(QueueMessage {
                message_id,
                receipt_handle,
                body,
            });
        }

        Ok(batch)
    }

    async fn delete(&self, receipt_handle: &str) -> Result<(), QueueError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(QueueError::Delete("queue unavailable".to_string()));
        }

        self.in_flight.lock().unwrap().remove(receipt_handle);
        self.events.record(Event::Deleted(receipt_handle.to_string()));
        Ok(())
    }
}

pub struct RecordingNotifier {
    published: Mutex<Vec<NotificationPayload>>,
    fail: AtomicBool,
    events: EventLog,
}

impl RecordingNotifier {
    pub fn new(events: EventLog) -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
            events,
        }
    }

    pub fn fail_publishes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn published(&self) -> Vec<NotificationPayload> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, payload: &NotificationPayload) -> Result<(), QueueError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(QueueError::Publish("topic unavailable".to_string()));
        }

        self.published.lock().unwrap().push(payload.clone());
        self.events.record(Event::Published(payload.message.clone()));
        Ok(())
    }
}

/// Counter table with DynamoDB's conditional-update and blind-put semantics.
#[derive(Default)]
pub struct MemoryCounterStore {
    records: Mutex<HashMap<u64, CounterRecord>>,
    fail: AtomicBool,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, image_id: u64) -> Option<CounterRecord> {
        self.records.lock().unwrap().get(&image_id).cloned()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Request("table unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn conditional_increment(
        &self,
        image_id: u64,
        kind: CounterKind,
        at: DateTime<Utc>,
    ) -> Result<UpdateOutcome, StoreError> {
        self.check_available()?;

        let mut records = self.records.lock().unwrap();
        let Some(record) = records.get_mut(&image_id) else {
            return Ok(UpdateOutcome::NotFound);
        };
        match kind {
            CounterKind::View => {
                record.view_count += 1;
                record.last_view_timestamp = Some(at);
            }
            CounterKind::Download => {
                record.download_count += 1;
                record.last_download_timestamp = Some(at);
            }
        }
        record.updated_at = at;
        Ok(UpdateOutcome::Updated)
    }

    async fn put(&self, record: &CounterRecord) -> Result<(), StoreError> {
        self.check_available()?;

        self.records
            .lock()
            .unwrap()
            .insert(record.image_id, record.clone());
        Ok(())
    }
}

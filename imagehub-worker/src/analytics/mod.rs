//! Image analytics counters backed by a conditional-write key-value store.

pub mod counter;
pub mod dynamo;
pub mod record;
pub mod store;

pub use counter::{CounterError, CounterService};
pub use dynamo::DynamoCounterStore;
pub use record::{CounterKind, CounterRecord};
pub use store::{CounterStore, StoreError, UpdateOutcome};

//! Upload notification relay.
//!
//! ```text
//! RelayPoller ──receive──▶ SQS
//!      │
//!      └─submit─▶ WorkerPool (N workers) ──publish──▶ SNS
//!                                        └─delete───▶ SQS (only after publish)
//! ```
//!
//! Delivery is at-least-once: anything that fails stays in the queue and is
//! picked up again once its visibility timeout expires.

pub mod delivery;
pub mod poller;
pub mod pool;

pub use delivery::{deliver, RelayError};
pub use poller::RelayPoller;
pub use pool::{PoolError, WorkerPool};

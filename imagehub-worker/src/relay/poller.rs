//! Relay poller: fetches batches from the upload queue and feeds the worker pool.

use std::future::Future;
use std::sync::Arc;

use tokio::time::sleep;
use tracing::{error, info};

use crate::config::RelayConfig;
use crate::queue::{MessageQueue, Notifier};

use super::delivery::deliver_and_log;
use super::pool::{PoolError, WorkerPool};

pub struct RelayPoller {
    queue: Arc<dyn MessageQueue>,
    notifier: Arc<dyn Notifier>,
    pool: WorkerPool,
    config: RelayConfig,
}

impl RelayPoller {
    /// Create the poller and start its worker pool.
    pub fn new(
        queue: Arc<dyn MessageQueue>,
        notifier: Arc<dyn Notifier>,
        config: RelayConfig,
    ) -> Self {
        let pool = WorkerPool::new(config.worker_pool_size);
        Self {
            queue,
            notifier,
            pool,
            config,
        }
    }

    /// Delivery jobs submitted but not yet finished.
    pub fn pending(&self) -> usize {
        self.pool.pending()
    }

    /// Run a single poll cycle and return how many delivery jobs were submitted.
    ///
    /// Does not wait for the submitted jobs. A failed fetch is logged and
    /// yields zero; the next cycle simply tries again.
    pub async fn poll_once(&self) -> usize {
        let messages = match self
            .queue
            .receive(self.config.max_messages, self.config.wait_time_seconds)
            .await
        {
            Ok(messages) => messages,
            Err(e) => {
                error!(error = %e, "relay_receive_failed");
                return 0;
            }
        };

        if messages.is_empty() {
            return 0;
        }

        info!(message_count = messages.len(), "relay_batch_received");

        let mut submitted = 0;
        for message in messages {
            let message_id = message.message_id.clone();
            let queue = Arc::clone(&self.queue);
            let notifier = Arc::clone(&self.notifier);
            let subject = self.config.notification_subject.clone();

            let job = async move {
                deliver_and_log(queue.as_ref(), notifier.as_ref(), &subject, &message).await;
            };

            match self.pool.submit(job) {
                Ok(()) => submitted += 1,
                Err(e) => {
                    error!(message_id = %message_id, error = %e, "relay_submit_failed");
                }
            }
        }

        submitted
    }

    /// Poll until `shutdown` resolves, then drain the worker pool.
    ///
    /// Cycles run with a fixed delay: the next one starts `poll_interval`
    /// after the previous one finished submitting.
    ///
    /// A receive still pending when `shutdown` resolves is abandoned; any
    /// messages it had claimed reappear after their visibility timeout.
    pub async fn run<S>(self, shutdown: S) -> Result<(), PoolError>
    where
        S: Future<Output = ()>,
    {
        info!(
            pool_size = self.pool.size(),
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            max_messages = self.config.max_messages,
            wait_time_seconds = self.config.wait_time_seconds,
            "relay_started"
        );

        tokio::pin!(shutdown);

        loop {
            let cycle = async {
                self.poll_once().await;
                sleep(self.config.poll_interval).await;
            };

            tokio::select! {
                _ = &mut shutdown => {
                    info!("relay_stopping");
                    break;
                }
                _ = cycle => {}
            }
        }

        let result = self.pool.shutdown(self.config.shutdown_grace).await;
        info!("relay_shutdown_complete");
        result
    }
}

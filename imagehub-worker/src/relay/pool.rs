//! Fixed-size worker pool fed by an unbounded job queue.
//!
//! `size` tokio tasks share one receiver. Submitting never blocks: when every
//! worker is busy, jobs wait in the channel. Shutdown closes the channel and
//! lets the workers drain whatever is queued or in flight.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

type Job = BoxFuture<'static, ()>;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker pool is shut down")]
    Closed,
    #[error("worker pool shutdown timed out with {pending} unfinished jobs")]
    ShutdownTimedOut { pending: usize },
}

pub struct WorkerPool {
    sender: mpsc::UnboundedSender<Job>,
    workers: Vec<JoinHandle<()>>,
    pending: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// Start `size` workers. A size of zero is bumped to one.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let (sender, receiver) = mpsc::unbounded_channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));
        let pending = Arc::new(AtomicUsize::new(0));

        let workers = (0..size)
            .map(|worker_id| {
                let receiver = Arc::clone(&receiver);
                let pending = Arc::clone(&pending);
                tokio::spawn(worker_loop(worker_id, receiver, pending))
            })
            .collect();

        info!(pool_size = size, "worker_pool_started");

        Self {
            sender,
            workers,
            pending,
        }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Jobs submitted but not yet finished (queued plus running).
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Queue a job for execution.
    pub fn submit<F>(&self, job: F) -> Result<(), PoolError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.sender.send(job.boxed()).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            return Err(PoolError::Closed);
        }
        Ok(())
    }

    /// Stop accepting jobs and wait up to `grace` for queued and running jobs to finish.
    ///
    /// Jobs still running when the grace period expires are left to the
    /// runtime; their count is returned in the error.
    pub async fn shutdown(self, grace: Duration) -> Result<(), PoolError> {
        let WorkerPool {
            sender,
            workers,
            pending,
        } = self;

        // Workers exit once the channel is closed and empty.
        drop(sender);

        info!(
            pending = pending.load(Ordering::SeqCst),
            grace_ms = grace.as_millis() as u64,
            "worker_pool_draining"
        );

        match tokio::time::timeout(grace, join_all(workers)).await {
            Ok(_) => {
                info!("worker_pool_stopped");
                Ok(())
            }
            Err(_) => {
                let pending = pending.load(Ordering::SeqCst);
                warn!(pending = pending, "worker_pool_shutdown_timed_out");
                Err(PoolError::ShutdownTimedOut { pending })
            }
        }
    }
}

async fn worker_loop(
    worker_id: usize,
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<Job>>>,
    pending: Arc<AtomicUsize>,
) {
    loop {
        // Only the idle worker holding the lock waits on the channel.
        let job = receiver.lock().await.recv().await;
        let Some(job) = job else {
            break;
        };

        if AssertUnwindSafe(job).catch_unwind().await.is_err() {
            error!(worker_id = worker_id, "worker_job_panicked");
        }
        pending.fetch_sub(1, Ordering::SeqCst);
    }
}

//! Bounded worker pool.
//!
//! Each task is spawned behind a `Semaphore` of `concurrency` permits. At most
//! `concurrency + queue_capacity` tasks are spawned ahead of the oldest
//! unfinished one; past that, the producer waits on that task's handle.
//! Handles are awaited in input order, so outcomes come back in input order.

use crate::error::FetchError;
use crate::models::{FetchOutcome, PageTask};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::http_client::PageSource;
use super::identity::IdentityPool;

pub struct ConcurrentFetcher {
    source: Arc<dyn PageSource>,
    identities: IdentityPool,
    concurrency: usize,
    queue_capacity: usize,
}

impl ConcurrentFetcher {
    pub fn new(source: Arc<dyn PageSource>, identities: IdentityPool) -> Self {
        Self {
            source,
            identities,
            concurrency: 20,
            queue_capacity: 64,
        }
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn queue_capacity(mut self, n: usize) -> Self {
        self.queue_capacity = n.max(1);
        self
    }

    /// Fetch every task; the result has one outcome per task, in input order.
    pub async fn fetch_all(&self, tasks: Vec<PageTask>) -> Vec<FetchOutcome> {
        let sem = Arc::new(Semaphore::new(self.concurrency));
        let window = self.concurrency + self.queue_capacity;
        let mut handles: VecDeque<(PageTask, JoinHandle<FetchOutcome>)> = VecDeque::new();
        let mut outcomes = Vec::with_capacity(tasks.len());

        for task in tasks {
            if handles.len() >= window {
                if let Some(oldest) = handles.pop_front() {
                    outcomes.push(join(oldest).await);
                }
            }

            let sem = Arc::clone(&sem);
            let source = Arc::clone(&self.source);
            let identities = self.identities.clone();
            let spawned = task.clone();

            let handle = tokio::spawn(async move {
                let _permit = sem.acquire().await.ok();
                fetch_one(source.as_ref(), &identities, spawned).await
            });
            handles.push_back((task, handle));
        }

        for pending in handles {
            outcomes.push(join(pending).await);
        }
        outcomes
    }
}

async fn join((task, handle): (PageTask, JoinHandle<FetchOutcome>)) -> FetchOutcome {
    match handle.await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Fetch task panicked for {}: {}", task.url, e);
            FetchOutcome {
                id: task.id,
                url: task.url,
                body: Err(FetchError::Aborted(e.to_string())),
            }
        }
    }
}

async fn fetch_one(
    source: &dyn PageSource,
    identities: &IdentityPool,
    task: PageTask,
) -> FetchOutcome {
    let identity = identities.pick();
    let body = source.get(&task.url, identity).await;

    match &body {
        Ok(bytes) => info!("Successful request for {} ({} bytes)", task.url, bytes.len()),
        Err(e) => warn!("Request failed for {}: {}", task.url, e),
    }

    FetchOutcome {
        id: task.id,
        url: task.url,
        body,
    }
}

//! Bounded-concurrency task pool

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::error;

/// Runs admitted tasks with a fixed concurrency bound.
///
/// [`admit`](Self::admit) suspends the caller while all slots are taken;
/// that suspension is the pipeline's backpressure. [`drain`](Self::drain)
/// consumes the pool and resolves only once every admitted task has
/// finished, so dropping work silently is impossible by construction:
/// the only way to finish a run is through `drain`.
pub struct DispatchPool {
    limit: usize,
    semaphore: Arc<Semaphore>,
    tasks: JoinSet<()>,
}

impl DispatchPool {
    /// Create a pool running at most `limit` tasks concurrently
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            limit,
            semaphore: Arc::new(Semaphore::new(limit)),
            tasks: JoinSet::new(),
        }
    }

    /// Configured concurrency limit
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Admit one task, suspending until a slot is free.
    ///
    /// The permit is held for the task's whole lifetime and released when it
    /// finishes, successfully or not.
    pub async fn admit<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .expect("pool semaphore is never closed");

        self.tasks.spawn(async move {
            task.await;
            drop(permit);
        });

        // Reap already-finished tasks so the join set stays bounded on long
        // runs.
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(e) = result {
                error!("pool task panicked: {}", e);
            }
        }
    }

    /// Wait for every admitted task to finish.
    ///
    /// Consumes the pool: nothing can be admitted afterwards.
    pub async fn drain(mut self) {
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                error!("pool task panicked: {}", e);
            }
        }
    }
}

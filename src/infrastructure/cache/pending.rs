//! Shared handle for an in-flight fetch.

use super::error::{CacheError, CacheResult};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::future::Future;
use tracing::error;

type SharedOutcome<T> = Shared<BoxFuture<'static, CacheResult<T>>>;

/// A fetch in progress that any number of callers can wait on.
///
/// The fetch runs in its own tokio task, so it keeps making progress even if
/// the request that started it goes away. It resolves exactly once; every
/// clone of the handle observes that same outcome.
///
/// Each handle carries the generation of the attempt it belongs to, letting
/// the owner tell a stale outcome apart from the current attempt.
pub struct PendingFetch<T: Clone> {
    generation: u64,
    outcome: SharedOutcome<T>,
}

impl<T: Clone> Clone for PendingFetch<T> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            outcome: self.outcome.clone(),
        }
    }
}

impl<T> PendingFetch<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Spawns `fetch` on the runtime and returns the first handle to it.
    pub fn spawn<F>(generation: u64, fetch: F) -> Self
    where
        F: Future<Output = CacheResult<T>> + Send + 'static,
    {
        let task = tokio::spawn(fetch);

        let outcome = async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(generation, "Postcode fetch task failed: {}", e);
                    Err(CacheError::Aborted)
                }
            }
        }
        .boxed()
        .shared();

        Self {
            generation,
            outcome,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the outcome without waiting, if the fetch already finished.
    ///
    /// Polls the shared outcome once, so a fetch whose waiters all went away
    /// still reports its result here.
    pub fn peek(&self) -> Option<CacheResult<T>> {
        self.outcome.clone().now_or_never()
    }

    /// Waits for the fetch to finish.
    pub async fn wait(self) -> CacheResult<T> {
        self.outcome.await
    }
}

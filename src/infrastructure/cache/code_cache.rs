//! Lazily loaded, single-flight postal code cache.

use super::error::{CacheError, CacheResult};
use super::pending::PendingFetch;
use crate::domain::{CodeSource, Postcode};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashSet;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// The loaded postal codes, in source order.
///
/// Cloning is cheap and every clone shares one allocation, so all callers
/// served by the same fetch hold the very same list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeList(Arc<[String]>);

impl CodeList {
    /// Returns `true` if both lists come from the same fetch.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for CodeList {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<String>> for CodeList {
    fn from(codes: Vec<String>) -> Self {
        Self(codes.into())
    }
}

impl Serialize for CodeList {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

/// Lifecycle state of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheState {
    Empty,
    Fetching,
    Ready,
}

/// Point-in-time view of the cache, for health checks and the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub state: CacheState,
    pub code_count: Option<usize>,
    /// Number of distinct codes, once the membership index is built.
    pub index_size: Option<usize>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub fetch_attempts: u64,
    pub index_builds: u64,
}

/// Codes from a successful fetch plus the lazily built membership index.
struct ReadyEntry {
    codes: CodeList,
    index: OnceLock<HashSet<String>>,
    loaded_at: DateTime<Utc>,
}

impl ReadyEntry {
    fn new(codes: CodeList) -> Self {
        Self {
            codes,
            index: OnceLock::new(),
            loaded_at: Utc::now(),
        }
    }

    fn index(&self, builds: &AtomicU64) -> &HashSet<String> {
        self.index.get_or_init(|| {
            builds.fetch_add(1, Ordering::Relaxed);
            let index: HashSet<String> = self.codes.iter().cloned().collect();
            debug!(
                codes = self.codes.len(),
                distinct = index.len(),
                "Built postcode index"
            );
            index
        })
    }
}

enum Slot {
    Empty,
    Fetching(PendingFetch<CodeList>),
    Ready(Arc<ReadyEntry>),
}

/// Process-wide cache of the postal code list.
///
/// The list is fetched from the [`CodeSource`] on first use and kept for the
/// lifetime of the process. Concurrent callers arriving while a fetch is in
/// flight wait on that fetch instead of starting another one.
///
/// # State Machine
///
/// - `Empty` + request: start a fetch, move to `Fetching`
/// - `Fetching` + request: wait on the existing fetch
/// - `Fetching` + success: store the list, move to `Ready`
/// - `Fetching` + failure or timeout: report to every waiter, move back to `Empty`
/// - `Ready` + request: answer immediately; `Ready` is terminal
///
/// The slot lock is never held across an `.await`.
pub struct CodeCache {
    source: Arc<dyn CodeSource>,
    fetch_timeout: Option<Duration>,
    slot: Mutex<Slot>,
    fetch_attempts: AtomicU64,
    index_builds: AtomicU64,
}

impl CodeCache {
    /// Creates an empty cache over `source`, without a fetch timeout.
    pub fn new(source: Arc<dyn CodeSource>) -> Self {
        Self {
            source,
            fetch_timeout: None,
            slot: Mutex::new(Slot::Empty),
            fetch_attempts: AtomicU64::new(0),
            index_builds: AtomicU64::new(0),
        }
    }

    /// Bounds each fetch attempt; an attempt that overruns fails with
    /// [`CacheError::Timeout`] and the cache returns to `Empty`.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Returns every postal code, fetching them first if necessary.
    ///
    /// # Errors
    ///
    /// Returns the [`CacheError`] of the fetch attempt this call waited on.
    /// The next call after a failure starts a fresh attempt.
    pub async fn get_codes(&self) -> CacheResult<CodeList> {
        let entry = self.ensure_ready().await?;
        Ok(entry.codes.clone())
    }

    /// Reports whether `code` is a known postal code.
    ///
    /// Builds the membership index on first use; later calls are a single
    /// hash lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_codes`].
    pub async fn check_exists(&self, code: &Postcode) -> CacheResult<bool> {
        let entry = self.ensure_ready().await?;
        Ok(entry.index(&self.index_builds).contains(code.as_str()))
    }

    /// Loads the code list if needed and builds the membership index.
    ///
    /// Returns the number of distinct codes.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_codes`].
    pub async fn build_index(&self) -> CacheResult<usize> {
        let entry = self.ensure_ready().await?;
        Ok(entry.index(&self.index_builds).len())
    }

    /// Returns a snapshot of the cache state.
    pub fn status(&self) -> CacheStatus {
        let slot = self.slot.lock();

        let (state, entry) = match &*slot {
            Slot::Empty => (CacheState::Empty, None),
            Slot::Fetching(pending) if matches!(pending.peek(), Some(Err(_))) => {
                (CacheState::Empty, None)
            }
            Slot::Fetching(_) => (CacheState::Fetching, None),
            Slot::Ready(entry) => (CacheState::Ready, Some(entry)),
        };

        CacheStatus {
            state,
            code_count: entry.map(|e| e.codes.len()),
            index_size: entry.and_then(|e| e.index.get()).map(HashSet::len),
            loaded_at: entry.map(|e| e.loaded_at),
            fetch_attempts: self.fetch_attempts.load(Ordering::Relaxed),
            index_builds: self.index_builds.load(Ordering::Relaxed),
        }
    }

    async fn ensure_ready(&self) -> CacheResult<Arc<ReadyEntry>> {
        let pending = {
            let mut slot = self.slot.lock();
            match &*slot {
                Slot::Ready(entry) => return Ok(entry.clone()),
                Slot::Fetching(pending) => match pending.peek() {
                    None => {
                        debug!(
                            generation = pending.generation(),
                            "Joining in-flight postcode fetch"
                        );
                        pending.clone()
                    }
                    // Every waiter of this attempt went away before it finished.
                    Some(Ok(codes)) => {
                        let entry = Arc::new(ReadyEntry::new(codes));
                        *slot = Slot::Ready(entry.clone());
                        return Ok(entry);
                    }
                    Some(Err(e)) => {
                        warn!(
                            generation = pending.generation(),
                            "Unattended postcode fetch failed, retrying: {}", e
                        );
                        let pending = self.start_fetch();
                        *slot = Slot::Fetching(pending.clone());
                        pending
                    }
                },
                Slot::Empty => {
                    let pending = self.start_fetch();
                    *slot = Slot::Fetching(pending.clone());
                    pending
                }
            }
        };

        let generation = pending.generation();
        let outcome = pending.wait().await;

        let mut slot = self.slot.lock();
        match outcome {
            Ok(codes) => match &*slot {
                Slot::Ready(entry) => Ok(entry.clone()),
                _ => {
                    let entry = Arc::new(ReadyEntry::new(codes));
                    *slot = Slot::Ready(entry.clone());
                    Ok(entry)
                }
            },
            Err(e) => {
                if matches!(&*slot, Slot::Fetching(current) if current.generation() == generation)
                {
                    warn!(generation, "Postcode fetch failed, cache reset: {}", e);
                    *slot = Slot::Empty;
                }
                Err(e)
            }
        }
    }

    fn start_fetch(&self) -> PendingFetch<CodeList> {
        let generation = self.fetch_attempts.fetch_add(1, Ordering::Relaxed) + 1;

        info!(generation, "Fetching postcodes");

        PendingFetch::spawn(
            generation,
            load_codes(self.source.clone(), self.fetch_timeout, generation),
        )
    }
}

async fn load_codes(
    source: Arc<dyn CodeSource>,
    timeout: Option<Duration>,
    generation: u64,
) -> CacheResult<CodeList> {
    let started = Instant::now();

    let codes = match timeout {
        Some(limit) => tokio::time::timeout(limit, source.fetch_codes())
            .await
            .map_err(|_| CacheError::Timeout(limit))??,
        None => source.fetch_codes().await?,
    };

    info!(
        generation,
        count = codes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Postcodes loaded"
    );

    Ok(CodeList::from(codes))
}

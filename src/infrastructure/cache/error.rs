//! Cache error types.

use crate::domain::SourceError;
use std::sync::Arc;
use std::time::Duration;

/// Errors delivered to every caller waiting on a failed fetch attempt.
///
/// Cloneable so one outcome can be broadcast to all waiters of a
/// [`PendingFetch`](super::PendingFetch).
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    #[error("failed to fetch postcodes: {0}")]
    Fetch(Arc<SourceError>),

    #[error("postcode fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("postcode fetch was aborted")]
    Aborted,
}

impl From<SourceError> for CacheError {
    fn from(e: SourceError) -> Self {
        Self::Fetch(Arc::new(e))
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

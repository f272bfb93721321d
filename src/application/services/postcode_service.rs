//! Postal code listing and membership service.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::Postcode;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheStatus, CodeCache, CodeList};

/// Service answering postal code queries from the shared [`CodeCache`].
///
/// Normalises request input into a [`Postcode`] before it reaches the cache
/// and maps cache failures to [`AppError::Unavailable`].
pub struct PostcodeService {
    cache: Arc<CodeCache>,
    source_description: String,
}

impl PostcodeService {
    /// Creates a new postcode service.
    pub fn new(cache: Arc<CodeCache>, source_description: impl Into<String>) -> Self {
        Self {
            cache,
            source_description: source_description.into(),
        }
    }

    /// Returns every known postal code in source order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the code list cannot be loaded.
    pub async fn list_codes(&self) -> Result<CodeList, AppError> {
        Ok(self.cache.get_codes().await?)
    }

    /// Checks whether a raw request value names a known postal code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `raw` is missing or not a scalar.
    /// Returns [`AppError::Unavailable`] if the code list cannot be loaded.
    pub async fn code_exists(&self, raw: Option<&Value>) -> Result<bool, AppError> {
        let code = Postcode::try_from(raw)?;
        Ok(self.cache.check_exists(&code).await?)
    }

    /// Loads the code list and builds the membership index up front.
    ///
    /// Returns the number of distinct codes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the code list cannot be loaded.
    pub async fn build_index(&self) -> Result<usize, AppError> {
        Ok(self.cache.build_index().await?)
    }

    /// Loads the code list in the background so the first request is fast.
    ///
    /// Failures are logged; the next request retries the fetch.
    pub fn warm_up(&self) {
        let cache = self.cache.clone();
        tokio::spawn(async move {
            match cache.get_codes().await {
                Ok(codes) => tracing::info!(count = codes.len(), "Postcode cache warmed up"),
                Err(e) => tracing::warn!("Postcode cache warm-up failed: {}", e),
            }
        });
    }

    pub fn status(&self) -> CacheStatus {
        self.cache.status()
    }

    pub fn source_description(&self) -> &str {
        &self.source_description
    }
}

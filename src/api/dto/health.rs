//! DTOs for health check endpoint.

use serde::Serialize;

use crate::infrastructure::cache::CacheStatus;

/// Health check response with cache status.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub source: String,
    pub cache: CacheStatus,
}

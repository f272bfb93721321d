//! Handler for health check endpoint.

use axum::{Json, extract::State};

use crate::api::dto::health::HealthResponse;
use crate::infrastructure::cache::CacheState;
use crate::state::AppState;

/// Returns service health and cache status.
///
/// # Endpoint
///
/// `GET /health`
///
/// Never triggers a fetch. The service is `healthy` once the code list is
/// loaded and `starting` before that; a failed fetch leaves the cache empty
/// and the next request retries it, so neither state is an error.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "source": "https://example.com/AU.txt (column 1)",
///   "cache": {
///     "state": "ready",
///     "code_count": 16874,
///     "index_size": 3165,
///     "loaded_at": "2026-01-01T00:00:00Z",
///     "fetch_attempts": 1,
///     "index_builds": 1
///   }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = state.postcode_service.status();

    let status = match cache.state {
        CacheState::Ready => "healthy",
        CacheState::Empty | CacheState::Fetching => "starting",
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        source: state.postcode_service.source_description().to_string(),
        cache,
    })
}

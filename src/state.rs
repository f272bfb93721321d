//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::PostcodeService;

/// State shared by all HTTP handlers.
///
/// Holds the single [`PostcodeService`] built at startup; cloning only bumps
/// reference counts.
#[derive(Clone)]
pub struct AppState {
    pub postcode_service: Arc<PostcodeService>,
    /// Value of the `max-age` directive sent with postcode responses.
    pub cache_max_age: u64,
}

impl AppState {
    pub fn new(postcode_service: Arc<PostcodeService>, cache_max_age: u64) -> Self {
        Self {
            postcode_service,
            cache_max_age,
        }
    }

    /// `Cache-Control` header value for postcode responses.
    pub fn cache_control(&self) -> String {
        format!("max-age={}", self.cache_max_age)
    }
}

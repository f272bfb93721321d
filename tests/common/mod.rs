#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use postcode_cache::api::handlers::{check_code_handler, health_handler, list_codes_handler};
use postcode_cache::application::services::PostcodeService;
use postcode_cache::domain::{CodeSource, SourceError};
use postcode_cache::infrastructure::cache::CodeCache;
use postcode_cache::state::AppState;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory source that counts fetches and can fail a number of times first.
pub struct StaticSource {
    codes: Vec<String>,
    failures_left: AtomicUsize,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(codes: &[&str]) -> Self {
        Self::failing_first(codes, 0)
    }

    pub fn failing_first(codes: &[&str], failures: usize) -> Self {
        Self {
            codes: codes.iter().map(|c| c.to_string()).collect(),
            failures_left: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CodeSource for StaticSource {
    async fn fetch_codes(&self) -> Result<Vec<String>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(SourceError::Other("upstream unavailable".to_string()));
        }

        Ok(self.codes.clone())
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

pub const SAMPLE_CODES: [&str; 3] = ["2000", "3000", "4000"];

pub fn create_test_state(source: Arc<StaticSource>) -> AppState {
    let cache = Arc::new(CodeCache::new(source.clone()));
    let service = Arc::new(PostcodeService::new(cache, source.describe()));
    AppState::new(service, 86_400)
}

pub fn test_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/postcodes",
            get(list_codes_handler).post(check_code_handler),
        )
        .with_state(state)
}

//! HTTP server initialization and runtime setup.
//!
//! Builds the postcode source, the process-wide cache and the Axum server.

use crate::application::services::PostcodeService;
use crate::config::Config;
use crate::domain::CodeSource;
use crate::infrastructure::cache::CodeCache;
use crate::infrastructure::source::TsvCodeSource;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Builds the postcode service from configuration.
///
/// The returned service owns the one [`CodeCache`] of the process; every
/// request handler and the CLI go through it.
///
/// # Errors
///
/// Returns an error if the HTTP client for a URL source cannot be built.
pub fn build_postcode_service(config: &Config) -> Result<Arc<PostcodeService>> {
    let source = TsvCodeSource::new(
        config.source_location(),
        config.postcode_column,
        config.fetch_timeout(),
    )
    .context("Failed to create postcode source")?;
    let description = source.describe();

    let cache = CodeCache::new(Arc::new(source)).with_fetch_timeout(config.fetch_timeout());

    Ok(Arc::new(PostcodeService::new(Arc::new(cache), description)))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Postcode source and cache
/// - Optional background preload of the code list
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - The postcode source cannot be created
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let postcode_service = build_postcode_service(&config)?;
    tracing::info!(
        "Postcode source: {}",
        crate::config::mask_connection_string(postcode_service.source_description())
    );

    if config.preload {
        postcode_service.warm_up();
    }

    let state = AppState::new(postcode_service, config.cache_max_age_seconds);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

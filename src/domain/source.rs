//! Contract for the upstream postal code source.

use async_trait::async_trait;

/// Errors raised while retrieving the code list from its source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("source content is not valid UTF-8")]
    Encoding,

    #[error("source contained no postal codes")]
    Empty,

    #[error("{0}")]
    Other(String),
}

/// Retrieves the authoritative list of postal codes.
///
/// The cache treats implementations as opaque: a call may take arbitrarily
/// long and may fail. Repeated calls are expected to return equivalent data.
///
/// # Implementations
///
/// - [`crate::infrastructure::source::TsvCodeSource`] - GeoNames tab-separated text over HTTP or from disk
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeSource: Send + Sync {
    /// Fetches every postal code, in source order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport, I/O or content failures.
    async fn fetch_codes(&self) -> Result<Vec<String>, SourceError>;

    /// Human readable location of the source, used in logs and status output.
    fn describe(&self) -> String;
}

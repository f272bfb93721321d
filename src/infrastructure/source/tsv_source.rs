//! Tab-separated postal code source (GeoNames text layout).

use crate::domain::{CodeSource, SourceError};
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Where the source document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Url(String),
    File(PathBuf),
}

impl SourceLocation {
    /// Treats `http://` and `https://` values as URLs and anything else as a path.
    pub fn parse(value: &str) -> Self {
        let lower = value.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(value.to_string())
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Reads postal codes from a tab-separated document.
///
/// Each line is one place record; the postal code is taken from a fixed
/// column (GeoNames puts it in column 1, after the country code). Order and
/// duplicates are preserved.
pub struct TsvCodeSource {
    location: SourceLocation,
    column: usize,
    client: reqwest::Client,
}

impl TsvCodeSource {
    /// Creates a source reading `column` from the document at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Request`] if the HTTP client cannot be built.
    pub fn new(
        location: SourceLocation,
        column: usize,
        request_timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("postcode-cache/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| SourceError::Request {
                url: location.to_string(),
                source,
            })?;

        Ok(Self {
            location,
            column,
            client,
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|source| SourceError::Request {
                    url: url.to_string(),
                    source,
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| SourceError::Request {
                url: url.to_string(),
                source,
            })?;

        Ok(body.to_vec())
    }
}

#[async_trait]
impl CodeSource for TsvCodeSource {
    async fn fetch_codes(&self) -> Result<Vec<String>, SourceError> {
        let raw = match &self.location {
            SourceLocation::Url(url) => self.download(url).await?,
            SourceLocation::File(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| SourceError::Io {
                        path: path.display().to_string(),
                        source,
                    })?
            }
        };

        debug!(bytes = raw.len(), source = %self.location, "Postcode source read");

        let text = String::from_utf8(raw).map_err(|_| SourceError::Encoding)?;
        let codes = parse_codes(&text, self.column);

        if codes.is_empty() {
            return Err(SourceError::Empty);
        }

        Ok(codes)
    }

    fn describe(&self) -> String {
        format!("{} (column {})", self.location, self.column)
    }
}

/// Extracts the value of `column` from every tab-separated line.
///
/// Blank lines, lines too short to have the column and empty values are
/// skipped. A trailing `\r` is ignored.
pub fn parse_codes(text: &str, column: usize) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.trim_end_matches('\r').split('\t').nth(column))
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "AU\t2000\tBarangaroo\tNew South Wales\tNSW\n\
                          AU\t2000\tDawes Point\tNew South Wales\tNSW\n\
                          AU\t3000\tMelbourne\tVictoria\tVIC\n\
                          \n\
                          AU\t4000\tBrisbane\tQueensland\tQLD\n";

    #[test]
    fn test_parse_codes_keeps_order_and_duplicates() {
        assert_eq!(
            parse_codes(SAMPLE, 1),
            vec!["2000", "2000", "3000", "4000"]
        );
    }

    #[test]
    fn test_parse_codes_other_column() {
        assert_eq!(parse_codes(SAMPLE, 4), vec!["NSW", "NSW", "VIC", "QLD"]);
    }

    #[test]
    fn test_parse_codes_skips_short_and_empty_fields() {
        let text = "AU\r\nAU\t\tNowhere\r\nAU\t0800\tDarwin\r\n";
        assert_eq!(parse_codes(text, 1), vec!["0800"]);
    }

    #[test]
    fn test_source_location_parse() {
        assert_eq!(
            SourceLocation::parse("https://example.com/AU.txt"),
            SourceLocation::Url("https://example.com/AU.txt".to_string())
        );
        assert_eq!(
            SourceLocation::parse("HTTP://example.com/AU.txt"),
            SourceLocation::Url("HTTP://example.com/AU.txt".to_string())
        );
        assert_eq!(
            SourceLocation::parse("data/AU.txt"),
            SourceLocation::File(PathBuf::from("data/AU.txt"))
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = TsvCodeSource::new(
            SourceLocation::File(PathBuf::from("/nonexistent/AU.txt")),
            1,
            Duration::from_secs(5),
        )
        .unwrap();

        let result = source.fetch_codes().await;
        assert!(matches!(result, Err(SourceError::Io { .. })));
    }
}

//! Transport for the readings data file.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// How long a single HTTP fetch may take before it is abandoned.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from retrieving a document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP status {status}")]
    Status {
        /// The response status code.
        status: u16,
    },

    /// Reading a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Retrieves the raw body of a document by URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the full response body as text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches `http(s)://` URLs with `reqwest` and anything else from disk.
///
/// A `file://` prefix is stripped; bare paths are read as-is.
#[derive(Debug, Clone, Default)]
pub struct DefaultFetcher {
    client: reqwest::Client,
}

impl DefaultFetcher {
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn is_http(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[async_trait]
impl Fetcher for DefaultFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if !is_http(url) {
            let path = url.strip_prefix("file://").unwrap_or(url);
            log::debug!("Reading readings file {path}");
            return Ok(tokio::fs::read_to_string(path).await?);
        }

        log::debug!("Fetching {url}");
        let resp = self.client.get(url).timeout(FETCH_TIMEOUT).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        Ok(resp.text().await?)
    }
}

//! Remote GPU catalog sources.
//!
//! [`HttpCatalogSource`] downloads the community-maintained GPU catalog
//! published by `voidful/gpu-info-api`. The catalog is a JSON object keyed
//! by GPU product name.

use std::time::Duration;

/// Raw GPU catalog published by voidful/gpu-info-api.
pub const GPU_DATA_URL: &str =
    "https://raw.githubusercontent.com/voidful/gpu-info-api/gpu-data/gpu.json";

/// HTTP request timeout for a catalog download.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for catalog download failures.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Catalog source returned HTTP {0}")]
    HttpStatus(u16),

    /// The body was not valid JSON.
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Anything that can produce the raw GPU catalog.
pub trait GpuCatalogSource: Send + Sync {
    /// Short description for logs (usually the URL).
    fn describe(&self) -> &str;

    /// Fetch the catalog as raw JSON.
    fn fetch(
        &self,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, FetchError>> + Send;
}

/// Catalog source backed by an HTTP GET.
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogSource {
    /// Create a source for `url` with a pre-configured HTTP client.
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl GpuCatalogSource for HttpCatalogSource {
    fn describe(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<serde_json::Value, FetchError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

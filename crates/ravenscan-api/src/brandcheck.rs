use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::BrandCheckResult;

pub const DEFAULT_API_URL: &str = "https://ravenscan-api.etmunson91.replit.app";

/// The key travels in a header so it never ends up in URLs or access logs
const API_KEY_HEADER: &str = "x-api-key";

#[derive(Error, Debug)]
pub enum BrandCheckError {
    #[error("API key contains characters that can't be sent in a header")]
    InvalidApiKey,

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Service responded with HTTP {status}")]
    Service { status: u16 },

    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}

pub type Result<T> = std::result::Result<T, BrandCheckError>;

/// Thin client for `GET /check`
///
/// One request per call. No retries and no timeout beyond reqwest's
/// defaults: if the service is flaky, the user sees it and can re-run.
pub struct BrandCheckClient {
    client: reqwest::Client,
    base_url: String,
    tlds: Option<Vec<String>>,
}

impl BrandCheckClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_API_URL.to_string())
    }

    /// Point the client at another deployment (staging, a local mock, ...)
    pub fn with_base_url(base_url: String) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("RavenScan/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| BrandCheckError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tlds: None,
        })
    }

    /// Ask the service for specific TLDs instead of its default set
    pub fn with_tlds(mut self, tlds: Vec<String>) -> Self {
        self.tlds = if tlds.is_empty() { None } else { Some(tlds) };
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a brand check for `name`
    pub async fn check(&self, name: &str, api_key: &str) -> Result<BrandCheckResult> {
        let mut key = HeaderValue::from_str(api_key).map_err(|_| BrandCheckError::InvalidApiKey)?;
        key.set_sensitive(true);

        let url = format!("{}/check", self.base_url);
        let mut request = self
            .client
            .get(&url)
            .query(&[("name", name)])
            .header(API_KEY_HEADER, key);

        if let Some(tlds) = &self.tlds {
            request = request.query(&[("tlds", tlds.join(","))]);
        }

        debug!("Checking '{}' against {}", name, url);
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Brand check for '{}' failed with status {}", name, status);
            return Err(BrandCheckError::Service {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        parse_envelope(&body)
    }
}

/// Decode a `/check` response body
pub fn parse_envelope(body: &[u8]) -> Result<BrandCheckResult> {
    Ok(serde_json::from_slice(body)?)
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Feedback rejected with HTTP {status}")]
    Rejected { status: u16 },

    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}

pub type Result<T> = std::result::Result<T, FeedbackError>;

/// Coarse sentiment about the last search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Positive,
    Neutral,
    Negative,
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rating::Positive => write!(f, "positive"),
            Rating::Neutral => write!(f, "neutral"),
            Rating::Negative => write!(f, "negative"),
        }
    }
}

impl std::str::FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" | "good" | "+" => Ok(Rating::Positive),
            "neutral" | "meh" | "0" => Ok(Rating::Neutral),
            "negative" | "bad" | "-" => Ok(Rating::Negative),
            other => Err(format!(
                "unknown rating '{}' (expected positive, neutral or negative)",
                other
            )),
        }
    }
}

/// Body posted to the feedback endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackPayload {
    pub rating: Rating,
    pub query: String,
    pub timestamp: DateTime<Utc>,
}

/// Posts feedback as JSON to a configured URL
pub struct FeedbackClient {
    client: reqwest::Client,
    url: String,
}

impl FeedbackClient {
    pub fn new(url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("RavenScan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeedbackError::Setup(e.to_string()))?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn submit(&self, payload: &FeedbackPayload) -> Result<()> {
        debug!("Posting {} feedback to {}", payload.rating, self.url);
        let response = self.client.post(&self.url).json(payload).send().await?;

        if !response.status().is_success() {
            return Err(FeedbackError::Rejected {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}

use async_trait::async_trait;
use ravenscan_api::{FeedbackClient, FeedbackPayload};

use crate::{feedback::FeedbackSink, Result};

/// Sends feedback to an HTTP endpoint
pub struct HttpFeedbackSink {
    client: FeedbackClient,
}

impl HttpFeedbackSink {
    pub fn new(url: String) -> Result<Self> {
        Ok(Self {
            client: FeedbackClient::new(url)?,
        })
    }

    pub fn url(&self) -> &str {
        self.client.url()
    }
}

#[async_trait]
impl FeedbackSink for HttpFeedbackSink {
    async fn submit(&self, payload: &FeedbackPayload) -> Result<()> {
        Ok(self.client.submit(payload).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        feedback::FeedbackEmitter,
        models::{Query, Rating},
        Error,
    };
    use std::sync::Arc;

    #[tokio::test]
    async fn test_unreachable_sink_reports_feedback_error() {
        let sink = HttpFeedbackSink::new("http://127.0.0.1:1/api/feedback".to_string()).unwrap();
        let emitter = FeedbackEmitter::new(Arc::new(sink));

        let err = emitter
            .submit(Rating::Positive, &Query::parse("rav").unwrap())
            .outcome()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FeedbackError(_)));
    }
}

use crate::{
    models::{Query, Rating},
    Error, Result,
};
use chrono::Utc;
use ravenscan_api::FeedbackPayload;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{info, warn};

/// Destination for feedback submissions
#[async_trait::async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn submit(&self, payload: &FeedbackPayload) -> Result<()>;
}

/// Writes feedback to the log and accepts everything
pub struct LogFeedbackSink;

#[async_trait::async_trait]
impl FeedbackSink for LogFeedbackSink {
    async fn submit(&self, payload: &FeedbackPayload) -> Result<()> {
        info!(
            rating = %payload.rating,
            query = %payload.query,
            timestamp = %payload.timestamp.to_rfc3339(),
            "Feedback received"
        );
        Ok(())
    }
}

/// Fire-and-forget feedback submission
///
/// Each submission runs as its own task. Nothing here touches search
/// history, and a failed submission is not a failed search.
#[derive(Clone)]
pub struct FeedbackEmitter {
    sink: Arc<dyn FeedbackSink>,
}

impl FeedbackEmitter {
    pub fn new(sink: Arc<dyn FeedbackSink>) -> Self {
        Self { sink }
    }

    /// Dispatch a rating for `query` without waiting for it
    ///
    /// Must be called from within a tokio runtime. The returned handle
    /// yields the outcome exactly once; dropping it is fine.
    pub fn submit(&self, rating: Rating, query: &Query) -> FeedbackHandle {
        let payload = FeedbackPayload {
            rating,
            query: query.to_string(),
            timestamp: Utc::now(),
        };
        let sink = self.sink.clone();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let outcome = sink.submit(&payload).await;
            if let Err(e) = &outcome {
                warn!("Feedback for '{}' not delivered: {}", payload.query, e);
            }
            let _ = tx.send(outcome);
        });

        FeedbackHandle { rx }
    }
}

/// Receives the outcome of one feedback submission
pub struct FeedbackHandle {
    rx: oneshot::Receiver<Result<()>>,
}

impl FeedbackHandle {
    pub async fn outcome(self) -> Result<()> {
        self.rx
            .await
            .unwrap_or_else(|_| Err(Error::FeedbackError("submission task vanished".into())))
    }
}

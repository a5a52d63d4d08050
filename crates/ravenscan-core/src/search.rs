use crate::{
    credentials::CredentialStore,
    history::HistoryCache,
    models::{BrandCheckResult, HistoryEntry, Query},
    Error, Result,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Anything that can run a brand check - the HTTP client in production,
/// a mock in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BrandChecker: Send + Sync {
    async fn check(&self, query: &Query, api_key: &str) -> Result<BrandCheckResult>;
}

/// Where a single search currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Validating,
    InFlight,
    Succeeded,
    Failed,
}

impl std::fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchPhase::Idle => write!(f, "idle"),
            SearchPhase::Validating => write!(f, "validating"),
            SearchPhase::InFlight => write!(f, "in-flight"),
            SearchPhase::Succeeded => write!(f, "succeeded"),
            SearchPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Runs one search: validate, call the service once, record the result
///
/// Stateless between calls. History is only written after the remote call
/// has fully succeeded and parsed; any failure leaves it untouched. Keeping
/// a second search from starting while one is in flight is up to the
/// caller.
pub struct SearchOrchestrator {
    checker: Arc<dyn BrandChecker>,
    credentials: CredentialStore,
    history: Arc<HistoryCache>,
}

impl SearchOrchestrator {
    pub fn new(
        checker: Arc<dyn BrandChecker>,
        credentials: CredentialStore,
        history: Arc<HistoryCache>,
    ) -> Self {
        Self {
            checker,
            credentials,
            history,
        }
    }

    /// Check `raw_query` and store the outcome in history
    pub async fn search(&self, raw_query: &str) -> Result<BrandCheckResult> {
        let mut phase = SearchPhase::Idle;
        advance(&mut phase, SearchPhase::Validating);

        let (query, api_key) = match self.validate(raw_query) {
            Ok(validated) => validated,
            Err(e) => {
                advance(&mut phase, SearchPhase::Failed);
                return Err(e);
            }
        };

        advance(&mut phase, SearchPhase::InFlight);
        info!("Checking brand '{}'", query);

        let result = match self.checker.check(&query, &api_key).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Search for '{}' failed: {}", query, e);
                advance(&mut phase, SearchPhase::Failed);
                return Err(e);
            }
        };

        self.history
            .insert(HistoryEntry::new(query, result.clone()))?;
        advance(&mut phase, SearchPhase::Succeeded);

        Ok(result)
    }

    /// Run a fresh search for the query of history entry `id`
    pub async fn rerun(&self, id: u64) -> Result<BrandCheckResult> {
        let entry = self
            .history
            .get(id)?
            .ok_or_else(|| Error::ValidationError(format!("No history entry #{}", id)))?;

        debug!("Re-running '{}' from history entry #{}", entry.query, id);
        self.search(entry.query.as_str()).await
    }

    fn validate(&self, raw_query: &str) -> Result<(Query, String)> {
        let query = Query::parse(raw_query)?;
        let api_key = self
            .credentials
            .usable_key()?
            .ok_or_else(|| Error::ValidationError("Please enter your API key".into()))?;

        Ok((query, api_key))
    }
}

fn advance(phase: &mut SearchPhase, next: SearchPhase) {
    debug!("search {} -> {}", phase, next);
    *phase = next;
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use ravenscan_api::{
    BrandCheckResult, DomainStatus, Rating, SeoSummary, SocialStatus, WhoisRecord,
};

/// Shortest name worth sending to the service
pub const MIN_QUERY_LEN: usize = 3;

/// A validated brand name / username to check
///
/// Always trimmed and at least `MIN_QUERY_LEN` characters. Holding a
/// `Query` means validation already happened.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> crate::Result<Self> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            return Err(crate::Error::ValidationError(format!(
                "Please enter at least {} characters",
                MIN_QUERY_LEN
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Query {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Self::parse(&value)
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.0
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// One successful search, as kept in the history log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Assigned by the history cache on insert, never reused
    pub id: u64,
    pub query: Query,
    pub timestamp: DateTime<Utc>,
    pub result: BrandCheckResult,
}

impl HistoryEntry {
    /// Entry stamped with the current time; the cache fills in the id
    pub fn new(query: Query, result: BrandCheckResult) -> Self {
        Self {
            id: 0,
            query,
            timestamp: Utc::now(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_trimmed() {
        let query = Query::parse("  rav  ").unwrap();
        assert_eq!(query.as_str(), "rav");
    }

    #[test]
    fn test_short_queries_rejected() {
        for raw in ["", "  ", "ra", " ra ", "\tr\n"] {
            assert!(
                matches!(Query::parse(raw), Err(crate::Error::ValidationError(_))),
                "{:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // Two characters, six bytes
        assert!(Query::parse("日本").is_err());
        assert!(Query::parse("日本語").is_ok());
    }

    #[test]
    fn test_query_deserialization_validates() {
        assert!(serde_json::from_str::<Query>(r#""ra""#).is_err());
        assert_eq!(
            serde_json::from_str::<Query>(r#""raven""#).unwrap().as_str(),
            "raven"
        );
    }
}

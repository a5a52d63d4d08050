use crate::config::Config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Liveness report for the local client
///
/// Built from configuration only. It reads none of the stores, so it works
/// even when the database is unreachable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub environment: String,
    pub api: ApiEndpoint,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiEndpoint {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_url: Option<String>,
}

impl HealthReport {
    pub fn collect(config: &Config) -> Self {
        Self {
            status: HealthStatus::Healthy,
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: if cfg!(debug_assertions) {
                "development".to_string()
            } else {
                "production".to_string()
            },
            api: ApiEndpoint {
                url: config.api.base_url.clone(),
                feedback_url: config.feedback.url.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_reflects_config() {
        let mut config = Config::default();
        config.api.base_url = "http://localhost:8000".to_string();

        let report = HealthReport::collect(&config);
        assert_eq!(report.status, HealthStatus::Healthy);
        assert_eq!(report.api.url, "http://localhost:8000");
        assert_eq!(report.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_report_json_shape() {
        let json = serde_json::to_value(HealthReport::collect(&Config::default())).unwrap();
        assert_eq!(json["status"], "healthy");
        assert!(json["timestamp"].is_string());
        assert!(json["api"].get("feedback_url").is_none());
    }
}

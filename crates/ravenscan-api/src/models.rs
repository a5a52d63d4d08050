use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Response envelope of `GET /check`
///
/// Every section is optional. A missing section means the service didn't
/// compute it, not that something went wrong. Maps are ordered so a stored
/// result renders (and serializes) the same way every time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandCheckResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,

    /// Fully qualified domain ("rav.com") to availability
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains: Option<BTreeMap<String, DomainStatus>>,

    /// Registration data for taken domains
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whois: Option<BTreeMap<String, WhoisRecord>>,

    /// Platform name ("github", "x", ...) to handle availability
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socials: Option<BTreeMap<String, SocialStatus>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl BrandCheckResult {
    /// Domains reported as available, in name order
    pub fn available_domains(&self) -> Vec<&str> {
        self.domains
            .iter()
            .flatten()
            .filter(|(_, status)| **status == DomainStatus::Available)
            .map(|(domain, _)| domain.as_str())
            .collect()
    }
}

/// Registration state of one domain
///
/// Only an explicit "available" counts as free. Anything else the service
/// sends for a domain is treated as taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    Available,
    Taken,
}

impl<'de> Deserialize<'de> for DomainStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value.as_str() {
            Some("available") => DomainStatus::Available,
            _ => DomainStatus::Taken,
        })
    }
}

impl std::fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainStatus::Available => write!(f, "available"),
            DomainStatus::Taken => write!(f, "taken"),
        }
    }
}

/// Handle availability on a social platform
///
/// The service reports "error" when a platform couldn't be probed, and
/// passes through raw per-platform objects when its lookup tool is
/// installed. Anything but the strings "available" and "taken" collapses
/// into `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialStatus {
    Available,
    Taken,
    Unknown,
}

impl<'de> Deserialize<'de> for SocialStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value.as_str() {
            Some("available") => SocialStatus::Available,
            Some("taken") => SocialStatus::Taken,
            _ => SocialStatus::Unknown,
        })
    }
}

impl std::fmt::Display for SocialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SocialStatus::Available => write!(f, "available"),
            SocialStatus::Taken => write!(f, "taken"),
            SocialStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Search-engine footprint of the name
///
/// The service sends `{}` when SEO was skipped, hence the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoSummary {
    #[serde(default)]
    pub hits: u64,
    #[serde(default)]
    pub top_results: Vec<String>,
}

/// RDAP lookup for a taken domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoisRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// RavenScan provider - bridges the HTTP client with the BrandChecker trait
use async_trait::async_trait;
use ravenscan_api::BrandCheckClient;

use crate::{
    config::ApiConfig,
    models::{BrandCheckResult, Query},
    search::BrandChecker,
    Result,
};

/// Wrapper around BrandCheckClient that implements BrandChecker
pub struct RavenScanProvider {
    client: BrandCheckClient,
}

impl RavenScanProvider {
    pub fn new(client: BrandCheckClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let mut client = BrandCheckClient::with_base_url(config.base_url.clone())?;
        if let Some(tlds) = &config.tlds {
            client = client.with_tlds(tlds.clone());
        }
        Ok(Self::new(client))
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

#[async_trait]
impl BrandChecker for RavenScanProvider {
    async fn check(&self, query: &Query, api_key: &str) -> Result<BrandCheckResult> {
        Ok(self.client.check(query.as_str(), api_key).await?)
    }
}

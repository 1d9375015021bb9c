//! Financial Modeling Prep stock-screener client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::{ScreenerFilter, Settings};
use crate::domain::entities::screener_record::ScreenerRecord;
use crate::domain::errors::ScreenerError;
use crate::domain::repositories::screener_provider::ScreenerProvider;

/// FMP screener configuration: endpoint, credentials, and the fixed
/// filter applied on every run.
#[derive(Debug, Clone)]
pub struct FmpConfig {
    pub endpoint: String,
    pub api_key: String,
    pub filter: ScreenerFilter,
}

impl FmpConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        FmpConfig {
            endpoint: settings.fmp_endpoint.clone(),
            api_key: settings.fmp_api_key.clone(),
            filter: settings.screener_filter.clone(),
        }
    }
}

pub struct FmpScreenerClient {
    client: Client,
    config: FmpConfig,
}

impl FmpScreenerClient {
    pub fn new(config: FmpConfig, timeout_secs: u64) -> Result<Self, ScreenerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ScreenerError::RequestFailed {
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client, config })
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        let filter = &self.config.filter;
        vec![
            ("marketCapMoreThan", filter.market_cap_more_than.to_string()),
            ("priceMoreThan", filter.price_more_than.to_string()),
            ("priceLowerThan", filter.price_lower_than.to_string()),
            ("volumeMoreThan", filter.volume_more_than.to_string()),
            ("exchange", filter.exchanges.clone()),
            ("limit", filter.limit.to_string()),
            ("isActivelyTrading", filter.actively_trading.to_string()),
            ("apikey", self.config.api_key.clone()),
        ]
    }
}

#[async_trait]
impl ScreenerProvider for FmpScreenerClient {
    async fn screen(&self) -> Result<Vec<ScreenerRecord>, ScreenerError> {
        debug!("Requesting screener universe from {}", self.config.endpoint);

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&self.query_params())
            .send()
            .await
            .map_err(|e| ScreenerError::RequestFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScreenerError::BadStatus {
                status: status.as_u16(),
            });
        }

        let records: Vec<ScreenerRecord> =
            response
                .json()
                .await
                .map_err(|e| ScreenerError::DecodeFailed {
                    reason: e.to_string(),
                })?;

        info!("Screener returned {} records", records.len());
        Ok(records)
    }
}

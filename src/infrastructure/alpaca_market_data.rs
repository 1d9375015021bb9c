//! Alpaca historical market-data client (minute bars).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::domain::entities::bar::{Bar, BarBatch};
use crate::domain::entities::time_window::TimeWindow;
use crate::domain::errors::MarketDataError;
use crate::domain::repositories::market_data_client::MarketDataClient;

const ALPACA_DATA_BASE: &str = "https://data.alpaca.markets";

#[derive(Debug, Clone)]
pub struct AlpacaDataConfig {
    pub api_base: String,
    pub api_key: String,
    pub api_secret: String,
}

impl AlpacaDataConfig {
    pub fn new(api_key: &str, api_secret: &str) -> Self {
        AlpacaDataConfig {
            api_base: ALPACA_DATA_BASE.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        }
    }
}

/// Bar payload as Alpaca returns it; symbol lives on the enclosing map key.
#[derive(Debug, Deserialize)]
struct AlpacaBar {
    #[serde(rename = "t")]
    timestamp: DateTime<Utc>,
    #[serde(rename = "o")]
    open: f64,
    #[serde(rename = "h")]
    high: f64,
    #[serde(rename = "l")]
    low: f64,
    #[serde(rename = "c")]
    close: f64,
    #[serde(rename = "v")]
    volume: u64,
    #[serde(rename = "n", default)]
    trade_count: u64,
    #[serde(rename = "vw", default)]
    vwap: f64,
}

#[derive(Debug, Deserialize)]
struct AlpacaBarsResponse {
    #[serde(default)]
    bars: HashMap<String, Vec<AlpacaBar>>,
}

fn into_batch(response: AlpacaBarsResponse) -> BarBatch {
    let mut batch = BarBatch::new();
    for (symbol, bars) in response.bars {
        let bars = bars
            .into_iter()
            .map(|bar| Bar {
                symbol: symbol.clone(),
                timestamp: bar.timestamp,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                trade_count: bar.trade_count,
                vwap: bar.vwap,
            })
            .collect();
        batch.insert(symbol, bars);
    }
    batch
}

pub struct AlpacaMarketDataClient {
    client: Client,
    config: AlpacaDataConfig,
}

impl AlpacaMarketDataClient {
    pub fn new(config: AlpacaDataConfig, timeout_secs: u64) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| MarketDataError::RequestFailed {
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl MarketDataClient for AlpacaMarketDataClient {
    async fn get_stock_bars(
        &self,
        symbols: &[String],
        window: &TimeWindow,
    ) -> Result<BarBatch, MarketDataError> {
        let url = format!("{}/v2/stocks/bars", self.config.api_base);
        let start = window.start().to_rfc3339_opts(SecondsFormat::Secs, true);
        let end = window.end().to_rfc3339_opts(SecondsFormat::Secs, true);

        debug!(
            "Requesting minute bars from {} to {} for {} symbols",
            start,
            end,
            symbols.len()
        );

        let response = self
            .client
            .get(&url)
            .header("APCA-API-KEY-ID", &self.config.api_key)
            .header("APCA-API-SECRET-KEY", &self.config.api_secret)
            .query(&[
                ("symbols", symbols.join(",")),
                ("timeframe", "1Min".to_string()),
                ("start", start),
                ("end", end),
                ("limit", "10000".to_string()),
            ])
            .send()
            .await
            .map_err(|e| MarketDataError::RequestFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::BadStatus {
                status: status.as_u16(),
            });
        }

        let payload: AlpacaBarsResponse =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::DecodeFailed {
                    reason: e.to_string(),
                })?;

        Ok(into_batch(payload))
    }
}

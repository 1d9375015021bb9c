//! Alpaca brokerage client: order submission and account state.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::entities::order::OrderIntent;
use crate::domain::errors::TradingError;
use crate::domain::repositories::trading_client::{Account, TradingClient};

const ALPACA_PAPER_BASE: &str = "https://paper-api.alpaca.markets";
const ALPACA_LIVE_BASE: &str = "https://api.alpaca.markets";

#[derive(Debug, Clone)]
pub struct AlpacaTradingConfig {
    pub api_base: String,
    pub api_key: String,
    pub api_secret: String,
}

impl AlpacaTradingConfig {
    pub fn new(api_key: &str, api_secret: &str, paper: bool) -> Self {
        AlpacaTradingConfig {
            api_base: if paper {
                ALPACA_PAPER_BASE.to_string()
            } else {
                ALPACA_LIVE_BASE.to_string()
            },
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        }
    }
}

/// Order body in the brokerage's wire format.
#[derive(Debug, Serialize, Deserialize, Clone)]
struct AlpacaOrderRequest {
    symbol: String,
    qty: String,
    side: String,
    #[serde(rename = "type")]
    order_type: String,
    time_in_force: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit_price: Option<String>,
    extended_hours: bool,
}

impl AlpacaOrderRequest {
    fn from_intent(order: &OrderIntent) -> Self {
        AlpacaOrderRequest {
            symbol: order.symbol.clone(),
            qty: order.quantity.to_string(),
            side: order.side.to_string(),
            order_type: order.order_type.to_string(),
            time_in_force: order.time_in_force.to_string(),
            limit_price: order.limit_price.map(|price| price.to_string()),
            extended_hours: order.extended_hours,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AlpacaOrderResponse {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaAccount {
    portfolio_value: String,
    buying_power: String,
    cash: String,
}

pub struct AlpacaTradingClient {
    client: Client,
    config: AlpacaTradingConfig,
}

impl AlpacaTradingClient {
    pub fn new(config: AlpacaTradingConfig, timeout_secs: u64) -> Result<Self, TradingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TradingError::SubmissionFailed {
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl TradingClient for AlpacaTradingClient {
    async fn submit_order(&self, order: &OrderIntent) -> Result<String, TradingError> {
        let url = format!("{}/v2/orders", self.config.api_base);
        let body = AlpacaOrderRequest::from_intent(order);

        let response = self
            .client
            .post(&url)
            .header("APCA-API-KEY-ID", &self.config.api_key)
            .header("APCA-API-SECRET-KEY", &self.config.api_secret)
            .json(&body)
            .send()
            .await
            .map_err(|e| TradingError::SubmissionFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let reason = response
                .text()
                .await
                .unwrap_or_else(|_| format!("HTTP status {}", status));
            return Err(TradingError::OrderRejected {
                symbol: order.symbol.clone(),
                reason,
            });
        }

        let confirmation: AlpacaOrderResponse =
            response
                .json()
                .await
                .map_err(|e| TradingError::SubmissionFailed {
                    reason: e.to_string(),
                })?;

        info!(
            "Order placed for {}: id={} status={}",
            order.symbol, confirmation.id, confirmation.status
        );
        Ok(confirmation.id)
    }

    async fn get_account(&self) -> Result<Account, TradingError> {
        let url = format!("{}/v2/account", self.config.api_base);

        let response = self
            .client
            .get(&url)
            .header("APCA-API-KEY-ID", &self.config.api_key)
            .header("APCA-API-SECRET-KEY", &self.config.api_secret)
            .send()
            .await
            .map_err(|e| TradingError::AccountQueryFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TradingError::AccountQueryFailed {
                reason: format!("HTTP status {}", status),
            });
        }

        let account: AlpacaAccount =
            response
                .json()
                .await
                .map_err(|e| TradingError::AccountQueryFailed {
                    reason: e.to_string(),
                })?;

        Ok(Account {
            portfolio_value: parse_money(&account.portfolio_value, "portfolio_value")?,
            buying_power: parse_money(&account.buying_power, "buying_power")?,
            cash: parse_money(&account.cash, "cash")?,
        })
    }
}

/// Alpaca serializes account amounts as strings.
fn parse_money(raw: &str, field: &str) -> Result<f64, TradingError> {
    raw.parse::<f64>()
        .map_err(|e| TradingError::AccountQueryFailed {
            reason: format!("unparsable {} '{}': {}", field, raw, e),
        })
}

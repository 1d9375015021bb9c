use crate::domain::entities::order::OrderIntent;
use crate::domain::errors::TradingError;
use async_trait::async_trait;

/// Account snapshot used for the end-of-run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub portfolio_value: f64,
    pub buying_power: f64,
    pub cash: f64,
}

/// Brokerage client: order submission and account state.
#[async_trait]
pub trait TradingClient: Send + Sync {
    /// Submit one order and return the brokerage-assigned order id.
    /// No retry on failure; the caller decides how to isolate it.
    async fn submit_order(&self, order: &OrderIntent) -> Result<String, TradingError>;

    async fn get_account(&self) -> Result<Account, TradingError>;
}

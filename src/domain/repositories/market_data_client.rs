use crate::domain::entities::bar::BarBatch;
use crate::domain::entities::time_window::TimeWindow;
use crate::domain::errors::MarketDataError;
use async_trait::async_trait;

/// Historical market-data source for minute bars.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Fetch minute bars for all `symbols` over `window` in one batched
    /// request. The returned batch may cover only a subset of the
    /// requested symbols; absence is not an error.
    async fn get_stock_bars(
        &self,
        symbols: &[String],
        window: &TimeWindow,
    ) -> Result<BarBatch, MarketDataError>;
}

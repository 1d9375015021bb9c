use crate::domain::entities::screener_record::ScreenerRecord;
use crate::domain::errors::ScreenerError;
use async_trait::async_trait;

/// Market-data provider capable of screening the tradable universe by
/// fundamental criteria. One implementation talks to the real provider;
/// tests substitute an in-memory one.
#[async_trait]
pub trait ScreenerProvider: Send + Sync {
    /// Run the configured screen once and return the decoded records in
    /// provider order. Errors are fatal for the run: there is no fallback
    /// ticker universe.
    async fn screen(&self) -> Result<Vec<ScreenerRecord>, ScreenerError>;
}

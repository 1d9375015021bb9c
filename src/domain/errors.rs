//! Error taxonomy for one screening run.
//!
//! Failure handling differs by boundary: a screener failure is fatal (there
//! is no fallback ticker universe), a bar-fetch failure degrades the run to
//! zero valid tickers, a missing ticker in the batch is bookkeeping rather
//! than an error, and order failures are isolated per ticker.

use chrono::NaiveDate;
use thiserror::Error;

/// Screener (ticker universe) failures. Fatal for the run.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScreenerError {
    #[error("Screener request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("Screener returned HTTP status {status}")]
    BadStatus { status: u16 },

    #[error("Screener response decode failed: {reason}")]
    DecodeFailed { reason: String },

    #[error("Record for {symbol} is missing numeric sort field '{field}'")]
    MissingSortField { symbol: String, field: String },
}

/// Historical-bars failures. Recovered into an empty pass by the pipeline.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MarketDataError {
    #[error("Bar request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("Bar request returned HTTP status {status}")]
    BadStatus { status: u16 },

    #[error("Bar response decode failed: {reason}")]
    DecodeFailed { reason: String },
}

/// Brokerage failures: order submission and account queries.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TradingError {
    #[error("Order for {symbol} rejected: {reason}")]
    OrderRejected { symbol: String, reason: String },

    #[error("Order submission failed: {reason}")]
    SubmissionFailed { reason: String },

    #[error("Account query failed: {reason}")]
    AccountQueryFailed { reason: String },
}

/// The calendar adjuster exhausted its bounded lookback without finding a
/// trading day. Fatal: the calendar data is unusable.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CalendarError {
    #[error(
        "No trading day within {lookback_days} days before window ending {window_end}"
    )]
    NoTradingDays {
        window_end: NaiveDate,
        lookback_days: u32,
    },
}

/// Per-ticker sizing rejections. Recorded in the order report; never abort
/// the remaining batch.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderSizingError {
    #[error("No usable price for {symbol}: {reason}")]
    InvalidPrice { symbol: String, reason: String },

    #[error(
        "Budget {budget:.2} buys zero shares of {symbol} at {price:.2}; refusing zero-share order"
    )]
    ZeroShares {
        symbol: String,
        budget: f64,
        price: f64,
    },
}

/// Top-level error for a whole pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Screener(#[from] ScreenerError),

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error("Output persistence failed: {0}")]
    Persistence(#[from] std::io::Error),
}

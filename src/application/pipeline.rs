//! The screening-to-order pipeline.
//!
//! One run is strictly sequential: one screener call, one calendar
//! adjustment, one batched bar call, N file writes, N order submissions.
//! The only state crossing ticker iterations is the persister's bad-ticker
//! bookkeeping.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::domain::entities::bar::BarBatch;
use crate::domain::entities::order::OrderIntent;
use crate::domain::entities::screener_record::{self, ScreenerRecord};
use crate::domain::entities::time_window::TimeWindow;
use crate::domain::errors::{MarketDataError, OrderSizingError, PipelineError};
use crate::domain::repositories::market_data_client::MarketDataClient;
use crate::domain::repositories::screener_provider::ScreenerProvider;
use crate::domain::repositories::trading_client::TradingClient;
use crate::domain::services::calendar::{adjust_for_market_days, TradingCalendar};
use crate::domain::services::order_sizing::size_order;
use crate::domain::services::symbol_filter::filter_tickers;
use crate::persistence::output_store::OutputStore;

/// Typed outcome of the batched bar fetch, so "no data" stays
/// distinguishable from "request failed".
#[derive(Debug)]
pub enum BarFetchOutcome {
    Bars(BarBatch),
    Empty,
    Failed(MarketDataError),
}

/// Aggregated per-run order submission outcome. One rejected order never
/// aborts the remaining submissions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OrderReport {
    /// (symbol, brokerage order id)
    pub placed: Vec<(String, String)>,
    /// (symbol, failure description)
    pub failed: Vec<(String, String)>,
    /// Tickers whose price exceeded the per-ticker budget.
    pub skipped_zero_shares: Vec<String>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub tickers: Vec<String>,
    pub orders: Option<OrderReport>,
}

pub struct Pipeline {
    screener: Arc<dyn ScreenerProvider>,
    market_data: Arc<dyn MarketDataClient>,
    trading: Arc<dyn TradingClient>,
    calendar: Arc<dyn TradingCalendar>,
    store: OutputStore,
    settings: Settings,
}

impl Pipeline {
    pub fn new(
        screener: Arc<dyn ScreenerProvider>,
        market_data: Arc<dyn MarketDataClient>,
        trading: Arc<dyn TradingClient>,
        calendar: Arc<dyn TradingCalendar>,
        store: OutputStore,
        settings: Settings,
    ) -> Self {
        Pipeline {
            screener,
            market_data,
            trading,
            calendar,
            store,
            settings,
        }
    }

    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        if self.settings.clear_output {
            info!("Clearing output directory {}", self.store.root().display());
            self.store.clear()?;
        }

        let tickers = if self.settings.screen_stocks {
            self.screen_and_validate().await?
        } else {
            self.load_cached_universe()?
        };
        info!("Valid tickers for this run: {:?}", tickers);

        let orders = if self.settings.place_orders {
            let report = if self.settings.dollars_per_ticker > 0.0 {
                self.place_dollar_share_orders(&tickers).await
            } else {
                self.place_market_orders(&tickers).await
            };
            info!(
                "Order summary: {} placed, {} failed, {} skipped (zero shares)",
                report.placed.len(),
                report.failed.len(),
                report.skipped_zero_shares.len()
            );
            Some(report)
        } else {
            info!("Order placement skipped");
            None
        };

        self.log_account_summary().await;

        Ok(RunSummary { tickers, orders })
    }

    /// Screener → sort → persist universe → symbol filter → calendar-aware
    /// window → batched bar fetch → per-ticker persistence.
    async fn screen_and_validate(&self) -> Result<Vec<String>, PipelineError> {
        let mut records = self.screener.screen().await?;
        screener_record::sort_by_field_desc(&mut records, &self.settings.screener_sort_field)?;
        self.store.write_universe(&records)?;

        let universe = screener_record::symbols(&records);
        let tickers = filter_tickers(&universe);
        if tickers.len() < universe.len() {
            info!(
                "Symbol filter removed {} of {} tickers",
                universe.len() - tickers.len(),
                universe.len()
            );
        }

        let window = TimeWindow::trailing_minutes(Utc::now(), self.settings.window_minutes);
        let window = adjust_for_market_days(
            self.calendar.as_ref(),
            window,
            self.settings.max_calendar_lookback_days,
        )?;
        info!(
            "Requesting stock bars from {} to {} for {} tickers",
            window.start(),
            window.end(),
            tickers.len()
        );

        let outcome = match self.fetch_bars(&tickers, &window).await {
            BarFetchOutcome::Bars(batch) => self.store.persist_bar_batch(Some(&batch), &tickers)?,
            BarFetchOutcome::Empty => {
                warn!("Bar request succeeded but returned no data");
                self.store
                    .persist_bar_batch(Some(&BarBatch::new()), &tickers)?
            }
            BarFetchOutcome::Failed(e) => {
                error!("Error fetching stock bars: {}", e);
                self.store.persist_bar_batch(None, &tickers)?
            }
        };

        Ok(outcome.valid)
    }

    /// Re-use the universe persisted by a previous screening run.
    fn load_cached_universe(&self) -> Result<Vec<String>, PipelineError> {
        let records: Vec<ScreenerRecord> = self.store.load_universe()?;
        let universe: Vec<String> = screener_record::symbols(&records)
            .into_iter()
            .take(self.settings.max_tickers)
            .collect();
        Ok(filter_tickers(&universe))
    }

    async fn fetch_bars(&self, tickers: &[String], window: &TimeWindow) -> BarFetchOutcome {
        match self.market_data.get_stock_bars(tickers, window).await {
            Ok(batch) if batch.is_empty() => BarFetchOutcome::Empty,
            Ok(batch) => BarFetchOutcome::Bars(batch),
            Err(e) => BarFetchOutcome::Failed(e),
        }
    }

    /// Budgeted limit orders: trailing-day close, floor division, one
    /// submission per ticker.
    async fn place_dollar_share_orders(&self, tickers: &[String]) -> OrderReport {
        let budget = self.settings.dollars_per_ticker;
        let mut report = OrderReport::default();

        for ticker in tickers {
            let window = TimeWindow::trailing_days(Utc::now(), 1);
            let last_close = match self.market_data.get_stock_bars(&[ticker.clone()], &window).await
            {
                Ok(batch) => batch.last_close(ticker),
                Err(e) => {
                    warn!("Price lookup failed for {}: {}", ticker, e);
                    report.failed.push((ticker.clone(), e.to_string()));
                    continue;
                }
            };

            let sized = match size_order(ticker, budget, last_close) {
                Ok(sized) => sized,
                Err(OrderSizingError::ZeroShares { symbol, price, .. }) => {
                    warn!(
                        "Skipping {}: price {:.2} exceeds budget {:.2}",
                        symbol, price, budget
                    );
                    report.skipped_zero_shares.push(symbol);
                    continue;
                }
                Err(e) => {
                    warn!("Order sizing failed: {}", e);
                    report.failed.push((ticker.clone(), e.to_string()));
                    continue;
                }
            };

            let order =
                match OrderIntent::limit_buy(ticker.clone(), sized.shares, sized.limit_price) {
                    Ok(order) => order,
                    Err(reason) => {
                        report.failed.push((ticker.clone(), reason));
                        continue;
                    }
                };

            self.submit(order, &mut report).await;
        }

        report
    }

    /// Simple variant: one-share market buys, no price lookup.
    async fn place_market_orders(&self, tickers: &[String]) -> OrderReport {
        let mut report = OrderReport::default();
        for ticker in tickers {
            let order = OrderIntent::one_share_market_buy(ticker.clone());
            self.submit(order, &mut report).await;
        }
        report
    }

    async fn submit(&self, order: OrderIntent, report: &mut OrderReport) {
        let symbol = order.symbol.clone();
        match self.trading.submit_order(&order).await {
            Ok(order_id) => {
                info!("Order placed for {} (id {})", symbol, order_id);
                report.placed.push((symbol, order_id));
            }
            Err(e) => {
                error!("Order for {} failed: {}", symbol, e);
                report.failed.push((symbol, e.to_string()));
            }
        }
    }

    async fn log_account_summary(&self) {
        match self.trading.get_account().await {
            Ok(account) => {
                info!("Portfolio Value: ${:.2}", account.portfolio_value);
                info!("Buying Power:    ${:.2}", account.buying_power);
                info!("Cash:            ${:.2}", account.cash);
            }
            Err(e) => warn!("Account summary unavailable: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::bar::Bar;
    use crate::domain::errors::{ScreenerError, TradingError};
    use crate::domain::repositories::trading_client::Account;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct StubScreener {
        records: Vec<ScreenerRecord>,
    }

    #[async_trait]
    impl ScreenerProvider for StubScreener {
        async fn screen(&self) -> Result<Vec<ScreenerRecord>, ScreenerError> {
            Ok(self.records.clone())
        }
    }

    struct StubMarketData {
        closes: HashMap<String, f64>,
    }

    #[async_trait]
    impl MarketDataClient for StubMarketData {
        async fn get_stock_bars(
            &self,
            symbols: &[String],
            _window: &TimeWindow,
        ) -> Result<BarBatch, MarketDataError> {
            let mut batch = BarBatch::new();
            for symbol in symbols {
                if let Some(&close) = self.closes.get(symbol) {
                    batch.insert(
                        symbol.clone(),
                        vec![Bar {
                            symbol: symbol.clone(),
                            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 15, 30, 0).unwrap(),
                            open: close,
                            high: close,
                            low: close,
                            close,
                            volume: 1000,
                            trade_count: 10,
                            vwap: close,
                        }],
                    );
                }
            }
            Ok(batch)
        }
    }

    /// Records submissions; rejects symbols in `reject`.
    struct RecordingTrader {
        reject: Vec<String>,
        submitted: Mutex<Vec<OrderIntent>>,
    }

    impl RecordingTrader {
        fn new(reject: &[&str]) -> Self {
            RecordingTrader {
                reject: reject.iter().map(|s| s.to_string()).collect(),
                submitted: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TradingClient for RecordingTrader {
        async fn submit_order(&self, order: &OrderIntent) -> Result<String, TradingError> {
            if self.reject.contains(&order.symbol) {
                return Err(TradingError::OrderRejected {
                    symbol: order.symbol.clone(),
                    reason: "insufficient buying power".to_string(),
                });
            }
            self.submitted.lock().unwrap().push(order.clone());
            Ok(format!("order-{}", order.symbol.to_lowercase()))
        }

        async fn get_account(&self) -> Result<Account, TradingError> {
            Ok(Account {
                portfolio_value: 100_000.0,
                buying_power: 50_000.0,
                cash: 25_000.0,
            })
        }
    }

    struct AlwaysOpen;

    impl TradingCalendar for AlwaysOpen {
        fn is_trading_day(&self, _date: chrono::NaiveDate) -> bool {
            true
        }
    }

    fn pipeline_with(
        closes: &[(&str, f64)],
        reject: &[&str],
        settings: Settings,
        dir: &TempDir,
    ) -> (Pipeline, Arc<RecordingTrader>) {
        let trader = Arc::new(RecordingTrader::new(reject));
        let pipeline = Pipeline::new(
            Arc::new(StubScreener {
                records: Vec::new(),
            }),
            Arc::new(StubMarketData {
                closes: closes
                    .iter()
                    .map(|(symbol, close)| (symbol.to_string(), *close))
                    .collect(),
            }),
            trader.clone(),
            Arc::new(AlwaysOpen),
            OutputStore::new(dir.path()),
            settings,
        );
        (pipeline, trader)
    }

    #[tokio::test]
    async fn test_dollar_orders_use_floor_division() {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.dollars_per_ticker = 1000.0;
        let (pipeline, trader) = pipeline_with(&[("AAPL", 333.33)], &[], settings, &dir);

        let report = pipeline
            .place_dollar_share_orders(&["AAPL".to_string()])
            .await;

        assert_eq!(report.placed.len(), 1);
        let submitted = trader.submitted.lock().unwrap();
        assert_eq!(submitted[0].quantity, 3);
        assert_eq!(submitted[0].limit_price.unwrap().value(), 333.33);
    }

    #[tokio::test]
    async fn test_zero_share_ticker_is_skipped_not_submitted() {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.dollars_per_ticker = 50.0;
        let (pipeline, trader) = pipeline_with(&[("AAPL", 60.0)], &[], settings, &dir);

        let report = pipeline
            .place_dollar_share_orders(&["AAPL".to_string()])
            .await;

        assert_eq!(report.skipped_zero_shares, vec!["AAPL"]);
        assert!(report.placed.is_empty());
        assert!(trader.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_order_does_not_abort_batch() {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.dollars_per_ticker = 1000.0;
        let (pipeline, trader) = pipeline_with(
            &[("AAPL", 100.0), ("BADX", 100.0), ("NVDA", 100.0)],
            &["BADX"],
            settings,
            &dir,
        );

        let tickers = vec![
            "AAPL".to_string(),
            "BADX".to_string(),
            "NVDA".to_string(),
        ];
        let report = pipeline.place_dollar_share_orders(&tickers).await;

        assert_eq!(report.placed.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "BADX");
        assert_eq!(trader.submitted.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_market_orders_are_one_share_gtc() {
        let dir = TempDir::new().unwrap();
        let (pipeline, trader) = pipeline_with(&[], &[], Settings::default(), &dir);

        let report = pipeline
            .place_market_orders(&["AAPL".to_string(), "MSFT".to_string()])
            .await;

        assert_eq!(report.placed.len(), 2);
        let submitted = trader.submitted.lock().unwrap();
        for order in submitted.iter() {
            assert_eq!(order.quantity, 1);
            assert!(order.limit_price.is_none());
        }
    }

    #[tokio::test]
    async fn test_missing_price_data_is_reported_not_divided() {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.dollars_per_ticker = 100.0;
        // No closes registered: the lookup yields an empty batch.
        let (pipeline, trader) = pipeline_with(&[], &[], settings, &dir);

        let report = pipeline
            .place_dollar_share_orders(&["AAPL".to_string()])
            .await;

        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].1.contains("No usable price"));
        assert!(trader.submitted.lock().unwrap().is_empty());
    }
}

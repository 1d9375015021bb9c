use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paperscreen::application::pipeline::Pipeline;
use paperscreen::config::Settings;
use paperscreen::domain::services::calendar::NyseCalendar;
use paperscreen::infrastructure::alpaca_market_data::{AlpacaDataConfig, AlpacaMarketDataClient};
use paperscreen::infrastructure::alpaca_trading::{AlpacaTradingClient, AlpacaTradingConfig};
use paperscreen::infrastructure::fmp_screener::{FmpConfig, FmpScreenerClient};
use paperscreen::persistence::output_store::OutputStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paperscreen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Credentials come from the environment, optionally via a .env file.
    dotenvy::dotenv().ok();
    let settings = Settings::from_env();
    info!(
        "Starting screening run (paper={}, screen={}, place_orders={})",
        settings.paper, settings.screen_stocks, settings.place_orders
    );

    let (api_key, api_secret) = settings.trading_credentials();
    let timeout = settings.http_timeout_secs;

    let screener = Arc::new(FmpScreenerClient::new(
        FmpConfig::from_settings(&settings),
        timeout,
    )?);
    let market_data = Arc::new(AlpacaMarketDataClient::new(
        AlpacaDataConfig::new(api_key, api_secret),
        timeout,
    )?);
    let trading = Arc::new(AlpacaTradingClient::new(
        AlpacaTradingConfig::new(api_key, api_secret, settings.paper),
        timeout,
    )?);
    let store = OutputStore::new(settings.output_dir.clone());

    let pipeline = Pipeline::new(
        screener,
        market_data,
        trading,
        Arc::new(NyseCalendar::new()),
        store,
        settings,
    );

    match pipeline.run().await {
        Ok(summary) => {
            info!("Run complete: {} valid tickers", summary.tickers.len());
            Ok(())
        }
        Err(e) => {
            error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}

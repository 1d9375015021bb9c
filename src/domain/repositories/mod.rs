pub mod market_data_client;
pub mod screener_provider;
pub mod trading_client;

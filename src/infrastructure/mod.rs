pub mod alpaca_market_data;
pub mod alpaca_trading;
pub mod fmp_screener;

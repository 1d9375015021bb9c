//! Run configuration, collected once from the environment and passed by
//! reference into every component. No module-level globals.

/// Screener filter parameters sent to the market-data provider.
#[derive(Debug, Clone)]
pub struct ScreenerFilter {
    pub market_cap_more_than: u64,
    pub price_more_than: f64,
    pub price_lower_than: f64,
    pub volume_more_than: u64,
    /// Comma-separated exchange allow-list, provider spelling.
    pub exchanges: String,
    pub limit: u32,
    pub actively_trading: bool,
}

impl Default for ScreenerFilter {
    fn default() -> Self {
        ScreenerFilter {
            market_cap_more_than: 1_000_000_000,
            price_more_than: 5.0,
            price_lower_than: 1_000.0,
            volume_more_than: 100_000,
            exchanges: "NYSE,NASDAQ,AMEX".to_string(),
            limit: 100,
            actively_trading: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    // Provider credentials.
    pub fmp_endpoint: String,
    pub fmp_api_key: String,
    pub alpaca_paper_token: String,
    pub alpaca_paper_secret: String,
    pub alpaca_live_token: String,
    pub alpaca_live_secret: String,
    /// Trade against the paper endpoint (default) or live.
    pub paper: bool,

    // Run-mode flags.
    pub place_orders: bool,
    pub clear_output: bool,
    pub screen_stocks: bool,

    // Pipeline parameters.
    pub screener_filter: ScreenerFilter,
    pub screener_sort_field: String,
    /// Dollar budget per ticker; 0 selects the one-share market-order mode.
    pub dollars_per_ticker: f64,
    /// Cap when re-using a previously screened universe file.
    pub max_tickers: usize,
    pub window_minutes: i64,
    pub max_calendar_lookback_days: u32,
    pub output_dir: String,
    pub http_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            fmp_endpoint: "https://financialmodelingprep.com/api/v3/stock-screener".to_string(),
            fmp_api_key: String::new(),
            alpaca_paper_token: String::new(),
            alpaca_paper_secret: String::new(),
            alpaca_live_token: String::new(),
            alpaca_live_secret: String::new(),
            paper: true,
            place_orders: false,
            clear_output: false,
            screen_stocks: true,
            screener_filter: ScreenerFilter::default(),
            screener_sort_field: "volume".to_string(),
            dollars_per_ticker: 100.0,
            max_tickers: 5,
            window_minutes: 100,
            max_calendar_lookback_days: 30,
            output_dir: "output".to_string(),
            http_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Load settings from environment variables; anything unset or
    /// unparsable keeps its default (with a warning for bad values).
    pub fn from_env() -> Settings {
        let mut settings = Settings::default();

        if let Ok(endpoint) = std::env::var("FMP_API_ENDPOINT") {
            settings.fmp_endpoint = endpoint;
        }
        if let Ok(key) = std::env::var("FMP_API_KEY") {
            settings.fmp_api_key = key;
        }
        if let Ok(token) = std::env::var("ALPACA_PAPER_TOKEN") {
            settings.alpaca_paper_token = token;
        }
        if let Ok(secret) = std::env::var("ALPACA_PAPER_SECRET") {
            settings.alpaca_paper_secret = secret;
        }
        if let Ok(token) = std::env::var("ALPACA_LIVE_TOKEN") {
            settings.alpaca_live_token = token;
        }
        if let Ok(secret) = std::env::var("ALPACA_LIVE_SECRET") {
            settings.alpaca_live_secret = secret;
        }

        if let Ok(paper) = std::env::var("ALPACA_PAPER") {
            settings.paper = parse_flag(&paper);
        }
        if let Ok(place) = std::env::var("PLACE_ORDERS") {
            settings.place_orders = parse_flag(&place);
        }
        if let Ok(clear) = std::env::var("CLEAR_OUTPUT") {
            settings.clear_output = parse_flag(&clear);
        }
        if let Ok(screen) = std::env::var("SCREEN_STOCKS") {
            settings.screen_stocks = parse_flag(&screen);
        }

        if let Ok(field) = std::env::var("SCREENER_SORT_FIELD") {
            if !field.trim().is_empty() {
                settings.screener_sort_field = field;
            }
        }

        if let Ok(dollars) = std::env::var("DOLLARS_PER_TICKER") {
            match dollars.parse::<f64>() {
                Ok(value) if value >= 0.0 => settings.dollars_per_ticker = value,
                Ok(value) => {
                    tracing::warn!(
                        "Invalid DOLLARS_PER_TICKER value: {} (must be >= 0), using default: {}",
                        value,
                        settings.dollars_per_ticker
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse DOLLARS_PER_TICKER '{}': {}, using default: {}",
                        dollars,
                        e,
                        settings.dollars_per_ticker
                    );
                }
            }
        }

        if let Ok(max) = std::env::var("MAX_TICKERS") {
            if let Ok(value) = max.parse::<usize>() {
                if value > 0 {
                    settings.max_tickers = value;
                }
            }
        }

        if let Ok(minutes) = std::env::var("WINDOW_MINUTES") {
            if let Ok(value) = minutes.parse::<i64>() {
                if value > 0 {
                    settings.window_minutes = value;
                }
            }
        }

        if let Ok(lookback) = std::env::var("MAX_CALENDAR_LOOKBACK_DAYS") {
            if let Ok(value) = lookback.parse::<u32>() {
                if value > 0 {
                    settings.max_calendar_lookback_days = value;
                }
            }
        }

        if let Ok(dir) = std::env::var("OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                settings.output_dir = dir;
            }
        }

        if let Ok(timeout) = std::env::var("HTTP_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(value) if value > 0 => settings.http_timeout_secs = value,
                _ => {
                    tracing::warn!(
                        "Invalid HTTP_TIMEOUT_SECS '{}', using default: {}",
                        timeout,
                        settings.http_timeout_secs
                    );
                }
            }
        }

        settings
    }

    /// Brokerage credentials for the selected trading mode.
    pub fn trading_credentials(&self) -> (&str, &str) {
        if self.paper {
            (&self.alpaca_paper_token, &self.alpaca_paper_secret)
        } else {
            (&self.alpaca_live_token, &self.alpaca_live_secret)
        }
    }
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.paper);
        assert!(!settings.place_orders);
        assert!(settings.screen_stocks);
        assert_eq!(settings.screener_sort_field, "volume");
        assert_eq!(settings.dollars_per_ticker, 100.0);
        assert_eq!(settings.max_calendar_lookback_days, 30);
        assert_eq!(settings.screener_filter.exchanges, "NYSE,NASDAQ,AMEX");
    }

    #[test]
    fn test_parse_flag_spellings() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("no"));
    }

    #[test]
    fn test_trading_credentials_follow_mode() {
        let mut settings = Settings::default();
        settings.alpaca_paper_token = "paper-key".to_string();
        settings.alpaca_paper_secret = "paper-secret".to_string();
        settings.alpaca_live_token = "live-key".to_string();
        settings.alpaca_live_secret = "live-secret".to_string();

        settings.paper = true;
        assert_eq!(settings.trading_credentials(), ("paper-key", "paper-secret"));

        settings.paper = false;
        assert_eq!(settings.trading_credentials(), ("live-key", "live-secret"));
    }
}

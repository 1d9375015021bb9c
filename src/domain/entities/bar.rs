use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One aggregated minute of trading for a single symbol.
///
/// Bars are created only by decoding a historical-data response and are
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub trade_count: u64,
    pub vwap: f64,
}

/// Bars keyed by symbol, as returned by a single batched historical request.
///
/// A requested symbol can be absent from the batch; that absence is the
/// "bad ticker" signal downstream, not an error.
#[derive(Debug, Clone, Default)]
pub struct BarBatch {
    data: HashMap<String, Vec<Bar>>,
}

impl BarBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, bars: Vec<Bar>) {
        self.data.insert(symbol.into(), bars);
    }

    pub fn get(&self, symbol: &str) -> Option<&[Bar]> {
        self.data.get(symbol).map(Vec::as_slice)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.data.contains_key(symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Last close observed for a symbol, in provider-returned order.
    pub fn last_close(&self, symbol: &str) -> Option<f64> {
        self.data.get(symbol).and_then(|bars| bars.last()).map(|bar| bar.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_bar(symbol: &str, close: f64) -> Bar {
        Bar {
            symbol: symbol.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 15, 30, 0).unwrap(),
            open: 100.0,
            high: 101.5,
            low: 99.5,
            close,
            volume: 12_345,
            trade_count: 87,
            vwap: 100.42,
        }
    }

    #[test]
    fn test_batch_tracks_requested_symbols() {
        let mut batch = BarBatch::new();
        batch.insert("AAPL", vec![sample_bar("AAPL", 101.0)]);

        assert!(batch.contains("AAPL"));
        assert!(!batch.contains("MSFT"));
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_last_close_uses_provider_order() {
        let mut batch = BarBatch::new();
        batch.insert(
            "AAPL",
            vec![sample_bar("AAPL", 101.0), sample_bar("AAPL", 102.5)],
        );

        assert_eq!(batch.last_close("AAPL"), Some(102.5));
        assert_eq!(batch.last_close("MSFT"), None);
    }

    #[test]
    fn test_bar_json_round_trip_preserves_values() {
        let bar = sample_bar("AAPL", 187.33);
        let encoded = serde_json::to_string(&bar).unwrap();
        let decoded: Bar = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, bar);
    }

    #[test]
    fn test_bar_serializes_iso8601_timestamp() {
        let bar = sample_bar("AAPL", 101.0);
        let encoded = serde_json::to_value(&bar).unwrap();
        assert_eq!(
            encoded["timestamp"].as_str().unwrap(),
            "2024-03-01T15:30:00Z"
        );
    }
}

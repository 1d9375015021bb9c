use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::errors::ScreenerError;

/// One row of the screener response, decoded at the provider boundary.
///
/// Only `symbol` is structurally required; the remaining provider fields
/// (market cap, volume, price, ...) are kept as-is so the run can be
/// sorted by any numeric field named in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenerRecord {
    pub symbol: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

impl ScreenerRecord {
    pub fn numeric_field(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(Value::as_f64)
    }
}

/// Sort records descending by the named numeric field.
///
/// The sort is stable: ties keep the provider's original relative order.
/// Any record missing the field (or carrying a non-numeric value) fails
/// the whole run.
pub fn sort_by_field_desc(
    records: &mut [ScreenerRecord],
    field: &str,
) -> Result<(), ScreenerError> {
    for record in records.iter() {
        if record.numeric_field(field).is_none() {
            return Err(ScreenerError::MissingSortField {
                symbol: record.symbol.clone(),
                field: field.to_string(),
            });
        }
    }
    records.sort_by(|a, b| {
        let a_value = a.numeric_field(field).unwrap_or(f64::NEG_INFINITY);
        let b_value = b.numeric_field(field).unwrap_or(f64::NEG_INFINITY);
        b_value
            .partial_cmp(&a_value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(())
}

/// Project a record list down to its ticker symbols, preserving order.
pub fn symbols(records: &[ScreenerRecord]) -> Vec<String> {
    records.iter().map(|record| record.symbol.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(symbol: &str, volume: Option<f64>) -> ScreenerRecord {
        let mut fields = serde_json::Map::new();
        if let Some(volume) = volume {
            fields.insert("volume".to_string(), serde_json::json!(volume));
        }
        ScreenerRecord {
            symbol: symbol.to_string(),
            fields,
        }
    }

    #[test]
    fn test_sort_descending_by_named_field() {
        let mut records = vec![
            record("LOW", Some(10.0)),
            record("HIGH", Some(1000.0)),
            record("MID", Some(500.0)),
        ];
        sort_by_field_desc(&mut records, "volume").unwrap();
        assert_eq!(symbols(&records), vec!["HIGH", "MID", "LOW"]);
    }

    #[test]
    fn test_sort_ties_preserve_provider_order() {
        let mut records = vec![
            record("FIRST", Some(500.0)),
            record("SECOND", Some(500.0)),
            record("THIRD", Some(500.0)),
        ];
        sort_by_field_desc(&mut records, "volume").unwrap();
        assert_eq!(symbols(&records), vec!["FIRST", "SECOND", "THIRD"]);
    }

    #[test]
    fn test_sort_missing_field_is_an_error() {
        let mut records = vec![record("AAPL", Some(500.0)), record("MYST", None)];
        let err = sort_by_field_desc(&mut records, "volume").unwrap_err();
        match err {
            ScreenerError::MissingSortField { symbol, field } => {
                assert_eq!(symbol, "MYST");
                assert_eq!(field, "volume");
            }
            other => panic!("expected MissingSortField, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_keeps_extra_fields() {
        let raw = r#"{"symbol":"AAPL","volume":123456,"exchangeShortName":"NASDAQ"}"#;
        let record: ScreenerRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.symbol, "AAPL");
        assert_eq!(record.numeric_field("volume"), Some(123456.0));
        assert_eq!(record.numeric_field("exchangeShortName"), None);
    }
}

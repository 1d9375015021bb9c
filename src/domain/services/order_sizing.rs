//! Fixed-dollar order sizing.
//!
//! `shares = floor(budget / price)` with the price rounded to cents first.
//! A non-positive or absent price is rejected outright instead of feeding
//! a division, and a zero-share result is rejected instead of submitted.

use crate::domain::errors::OrderSizingError;
use crate::domain::value_objects::price::Price;

/// A sized order: whole shares at a cents-rounded limit price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizedOrder {
    pub shares: u32,
    pub limit_price: Price,
}

pub fn size_order(
    symbol: &str,
    budget: f64,
    last_close: Option<f64>,
) -> Result<SizedOrder, OrderSizingError> {
    let raw_price = last_close.ok_or_else(|| OrderSizingError::InvalidPrice {
        symbol: symbol.to_string(),
        reason: "no bars returned for the trailing day".to_string(),
    })?;

    let price = Price::new(raw_price)
        .map_err(|reason| OrderSizingError::InvalidPrice {
            symbol: symbol.to_string(),
            reason,
        })?
        .rounded_to_cents();

    if !price.is_positive() {
        return Err(OrderSizingError::InvalidPrice {
            symbol: symbol.to_string(),
            reason: format!("non-positive price {}", price.value()),
        });
    }

    let shares = (budget / price.value()).floor();
    if shares < 1.0 {
        return Err(OrderSizingError::ZeroShares {
            symbol: symbol.to_string(),
            budget,
            price: price.value(),
        });
    }

    Ok(SizedOrder {
        shares: shares as u32,
        limit_price: price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_division() {
        let sized = size_order("AAPL", 1000.0, Some(333.33)).unwrap();
        assert_eq!(sized.shares, 3);
        assert_eq!(sized.limit_price.value(), 333.33);
    }

    #[test]
    fn test_exact_multiple() {
        let sized = size_order("AAPL", 200.0, Some(50.0)).unwrap();
        assert_eq!(sized.shares, 4);
        assert_eq!(sized.limit_price.value(), 50.0);
    }

    #[test]
    fn test_price_rounded_to_cents_before_division() {
        // 99.999 rounds to 100.00, so 100 dollars buys exactly one share.
        let sized = size_order("AAPL", 100.0, Some(99.999)).unwrap();
        assert_eq!(sized.limit_price.value(), 100.0);
        assert_eq!(sized.shares, 1);
    }

    #[test]
    fn test_budget_below_price_is_rejected() {
        let err = size_order("AAPL", 50.0, Some(60.0)).unwrap_err();
        assert_eq!(
            err,
            OrderSizingError::ZeroShares {
                symbol: "AAPL".to_string(),
                budget: 50.0,
                price: 60.0,
            }
        );
    }

    #[test]
    fn test_zero_price_is_rejected_not_divided() {
        let err = size_order("AAPL", 100.0, Some(0.0)).unwrap_err();
        assert!(matches!(err, OrderSizingError::InvalidPrice { .. }));
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let err = size_order("AAPL", 100.0, Some(-5.0)).unwrap_err();
        assert!(matches!(err, OrderSizingError::InvalidPrice { .. }));
    }

    #[test]
    fn test_missing_price_is_rejected() {
        let err = size_order("AAPL", 100.0, None).unwrap_err();
        assert!(matches!(err, OrderSizingError::InvalidPrice { .. }));
    }
}

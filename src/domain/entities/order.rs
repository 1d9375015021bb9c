use crate::domain::value_objects::price::Price;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Market => write!(f, "market"),
            OrderType::Limit => write!(f, "limit"),
        }
    }
}

/// Order lifetime policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInForce {
    /// Valid for the trading day only.
    Day,
    /// Good till cancelled.
    Gtc,
}

impl std::fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeInForce::Day => write!(f, "day"),
            TimeInForce::Gtc => write!(f, "gtc"),
        }
    }
}

/// A single order to be submitted exactly once. Built by the sizing or
/// submission path, never mutated or retried.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderIntent {
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: u32,
    pub order_type: OrderType,
    pub limit_price: Option<Price>,
    pub time_in_force: TimeInForce,
    pub extended_hours: bool,
}

impl OrderIntent {
    pub fn new(
        symbol: String,
        side: OrderSide,
        quantity: u32,
        order_type: OrderType,
        limit_price: Option<Price>,
        time_in_force: TimeInForce,
        extended_hours: bool,
    ) -> Result<Self, String> {
        if quantity == 0 {
            return Err("Order quantity must be positive".to_string());
        }
        if matches!(order_type, OrderType::Limit) && limit_price.is_none() {
            return Err("Limit orders must have a price".to_string());
        }
        Ok(OrderIntent {
            symbol,
            side,
            quantity,
            order_type,
            limit_price,
            time_in_force,
            extended_hours,
        })
    }

    /// One-share market buy, good till cancelled.
    pub fn one_share_market_buy(symbol: String) -> Self {
        OrderIntent {
            symbol,
            side: OrderSide::Buy,
            quantity: 1,
            order_type: OrderType::Market,
            limit_price: None,
            time_in_force: TimeInForce::Gtc,
            extended_hours: false,
        }
    }

    /// Limit buy at `limit_price`, day time-in-force, eligible for
    /// extended-hours execution.
    pub fn limit_buy(symbol: String, quantity: u32, limit_price: Price) -> Result<Self, String> {
        OrderIntent::new(
            symbol,
            OrderSide::Buy,
            quantity,
            OrderType::Limit,
            Some(limit_price),
            TimeInForce::Day,
            true,
        )
    }
}

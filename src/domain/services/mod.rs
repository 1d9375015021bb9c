pub mod calendar;
pub mod order_sizing;
pub mod symbol_filter;

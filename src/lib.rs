//! paperscreen
//!
//! Turns a screened universe of candidate equities into a bounded set of
//! budgeted paper buy orders: ticker screening, symbol filtering,
//! calendar-aware time-window adjustment, tolerant minute-bar retrieval,
//! per-ticker JSON persistence, and fixed-dollar order sizing.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod persistence;

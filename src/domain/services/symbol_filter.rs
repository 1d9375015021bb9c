/// Separator characters used by screener providers for alternate share
/// classes (e.g. "BRK-B", "BF.B"). Symbols carrying one are not tradable
/// through the brokerage symbology and are dropped from the run.
const SHARE_CLASS_SEPARATORS: [char; 3] = ['-', '.', '/'];

/// Keep only plainly tradable symbols. Pure, deterministic, and
/// order-preserving: the output is always a subset of the input in the
/// input's order.
pub fn filter_tickers(tickers: &[String]) -> Vec<String> {
    tickers
        .iter()
        .filter(|ticker| !ticker.contains(SHARE_CLASS_SEPARATORS))
        .cloned()
        .collect()
}

//! Price-to-probability conversions shared by the platform adapters.

/// Rescale raw outcome prices so they sum to 1.
///
/// Upstream prices need not sum to 1 (arbitrage, rounding); each outcome's
/// probability is its share of the total. A zero total yields all zeros
/// rather than dividing by zero.
pub fn normalize(prices: &[f64]) -> Vec<f64> {
    let total: f64 = prices.iter().sum();
    if total > 0.0 {
        prices.iter().map(|p| p / total).collect()
    } else {
        vec![0.0; prices.len()]
    }
}

/// Average of best bid and best ask.
pub fn midpoint(bid: f64, ask: f64) -> f64 {
    (bid + ask) / 2.0
}

/// Best available probability estimate for one side of a quoted market.
///
/// Preference order: bid/ask midpoint when both sides are quoted, then the
/// last trade, then whichever single side exists. `None` when the side has
/// no usable pricing at all.
pub fn quote_estimate(bid: Option<f64>, ask: Option<f64>, last: Option<f64>) -> Option<f64> {
    match (bid, ask) {
        (Some(b), Some(a)) => Some(midpoint(b, a)),
        _ => last.or(bid).or(ask),
    }
}

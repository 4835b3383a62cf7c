use serde::{Deserialize, Serialize};

/// One market mover: a listed symbol joined with its live quote and
/// company profile. Recomputed from scratch on every polling tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingStock {
    pub symbol: String,
    pub name: String,
    /// Current price (the quote's `c`).
    pub price: f64,
    /// Percent change on the day (the quote's `dp`).
    pub percent_change: f64,
    /// Market capitalization from the company profile.
    pub market_cap: f64,
}

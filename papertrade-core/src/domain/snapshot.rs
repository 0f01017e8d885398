//! DailySnapshot — account state recorded once per visited day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Account state at a given day's price.
///
/// `daily_return_pct` compares this snapshot's *price* with the previous
/// snapshot's price, not portfolio values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub price: f64,
    pub cash: f64,
    pub shares: u64,
    pub portfolio_value: f64,
    pub daily_return_pct: f64,
    pub cumulative_return_pct: f64,
}

/// The two percentages returned by `Ledger::record_daily_state`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyReturns {
    pub daily_pct: f64,
    pub cumulative_pct: f64,
}

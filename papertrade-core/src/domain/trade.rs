//! Trade — an executed buy or sell, recorded once and never mutated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn label(self) -> &'static str {
        match self {
            TradeSide::Buy => "Buy",
            TradeSide::Sell => "Sell",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An executed trade.
///
/// `cash_delta` is the signed change to cash including commission:
/// negative for buys (total cost), positive for sells (total income).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub side: TradeSide,
    pub stock_id: String,
    pub price: f64,
    pub quantity: u64,
    pub cash_delta: f64,
    pub commission: f64,
}

impl Trade {
    /// Gross traded value before commission.
    pub fn notional(&self) -> f64 {
        self.price * self.quantity as f64
    }

    pub fn is_buy(&self) -> bool {
        self.side == TradeSide::Buy
    }
}

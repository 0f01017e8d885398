//! Domain types for PaperTrade

pub mod bar;
pub mod snapshot;
pub mod trade;

pub use bar::PriceBar;
pub use snapshot::{DailyReturns, DailySnapshot};
pub use trade::{Trade, TradeSide};

/// Stock identifier (file stem of the data file, e.g. "600519").
pub type StockId = String;

//! PaperTrade Core — account ledger, day-window cursor, trading session.
//!
//! This crate contains everything a front end needs to run a day-stepping
//! paper-trading simulation on one stock:
//! - Domain types (price bars, trades, daily snapshots)
//! - Account ledger with commission, cost basis and an append-only audit trail
//! - Day cursor with a fixed lookback window
//! - Session tying a price series to a ledger and cursor
//! - Price CSV loading and the on-disk stock library
//! - TOML configuration and CSV/JSON export

pub mod config;
pub mod cursor;
pub mod data;
pub mod domain;
pub mod export;
pub mod ledger;
pub mod session;

pub use config::{ConfigError, SimConfig};
pub use cursor::{CursorError, DayCursor, StepOutcome, StepSize, DEFAULT_WINDOW_SIZE};
pub use domain::{DailyReturns, DailySnapshot, PriceBar, StockId, Trade, TradeSide};
pub use ledger::{Ledger, LedgerError, TradeReceipt, MAX_ORDER_QUANTITY};
pub use session::{Session, SessionError, SessionSummary, TradeAction};

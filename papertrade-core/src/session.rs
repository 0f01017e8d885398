//! Trading session — one stock's price series driven through a ledger and a
//! day cursor.
//!
//! A session is an explicit value owned by whichever front end runs it; there
//! is no ambient or global session state. Every visited day gets one daily
//! snapshot: the starting day on construction and each landing day after a
//! successful step. All trades execute at the current bar's close.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{validate_account, ConfigError, SimConfig};
use crate::cursor::{CursorError, DayCursor, StepOutcome, StepSize};
use crate::domain::{DailyReturns, PriceBar, StockId};
use crate::ledger::{Ledger, LedgerError, TradeReceipt};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cursor: {0}")]
    Cursor(#[from] CursorError),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("initial capital is locked once a buy has been executed; reset the session to change it")]
    CapitalLocked,
}

/// A user decision for the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    Buy(u64),
    Sell(u64),
    Hold,
}

/// End-of-run summary, serializable for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub stock_id: StockId,
    pub start_date: String,
    pub current_date: String,
    pub days_visited: usize,
    pub initial_capital: f64,
    pub commission_rate: f64,
    pub cash: f64,
    pub shares: u64,
    pub last_price: f64,
    pub portfolio_value: f64,
    pub cumulative_return_pct: f64,
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub total_commission: f64,
    pub trade_count: usize,
    pub exhausted: bool,
}

#[derive(Debug)]
pub struct Session {
    stock_id: StockId,
    bars: Vec<PriceBar>,
    initial_capital: f64,
    commission_rate: f64,
    ledger: Ledger,
    cursor: DayCursor,
    last_returns: DailyReturns,
}

impl Session {
    /// Start a session on `bars` (ascending by date) with the given settings.
    pub fn new(
        stock_id: impl Into<StockId>,
        bars: Vec<PriceBar>,
        config: &SimConfig,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let cursor = DayCursor::new(bars.len(), config.view.window_size)?;
        let mut ledger = Ledger::new(
            config.account.initial_capital,
            config.account.commission_rate,
        );
        let start = &bars[cursor.current_index()];
        let last_returns = ledger.record_daily_state(start.date, start.close);

        let stock_id = stock_id.into();
        tracing::info!(
            stock_id = %stock_id,
            bars = bars.len(),
            start = %start.date,
            "session started"
        );

        Ok(Self {
            stock_id,
            bars,
            initial_capital: config.account.initial_capital,
            commission_rate: config.account.commission_rate,
            ledger,
            cursor,
            last_returns,
        })
    }

    pub fn stock_id(&self) -> &str {
        &self.stock_id
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn cursor(&self) -> &DayCursor {
        &self.cursor
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    pub fn commission_rate(&self) -> f64 {
        self.commission_rate
    }

    pub fn current_bar(&self) -> &PriceBar {
        &self.bars[self.cursor.current_index()]
    }

    /// Trading price for today: the current bar's close.
    pub fn current_price(&self) -> f64 {
        self.current_bar().close
    }

    /// Bars inside the visible window; the last one is the current bar.
    pub fn visible_bars(&self) -> &[PriceBar] {
        &self.bars[self.cursor.visible_window()]
    }

    /// Returns from the most recent snapshot.
    pub fn last_returns(&self) -> DailyReturns {
        self.last_returns
    }

    pub fn portfolio_value(&self) -> f64 {
        self.ledger.current_portfolio_value(self.current_price())
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_exhausted()
    }

    /// Move forward and snapshot the landing day.
    pub fn advance(&mut self, size: StepSize) -> StepOutcome {
        let outcome = self.cursor.step(size);
        match outcome {
            StepOutcome::Moved { from, to, .. } if to > from => {
                let bar = &self.bars[to];
                self.last_returns = self.ledger.record_daily_state(bar.date, bar.close);
                tracing::debug!(step = size.label(), from, to, date = %bar.date, "advanced");
            }
            StepOutcome::Moved { .. } => {}
            StepOutcome::Exhausted => {
                tracing::debug!(step = size.label(), "series exhausted, step ignored");
            }
        }
        outcome
    }

    /// Apply a decision at the current price. `Hold` does nothing.
    pub fn execute(&mut self, action: TradeAction) -> Result<Option<TradeReceipt>, LedgerError> {
        let bar = &self.bars[self.cursor.current_index()];
        let (date, price) = (bar.date, bar.close);
        match action {
            TradeAction::Buy(qty) => self.ledger.buy(date, price, qty, &self.stock_id).map(Some),
            TradeAction::Sell(qty) => self.ledger.sell(date, price, qty, &self.stock_id).map(Some),
            TradeAction::Hold => Ok(None),
        }
    }

    pub fn max_buyable(&self) -> u64 {
        self.ledger.max_buyable(self.current_price())
    }

    pub fn max_sellable(&self) -> u64 {
        self.ledger.shares()
    }

    /// Whether the capital setting is frozen (any buy executed).
    pub fn capital_locked(&self) -> bool {
        self.ledger.has_executed_any_buy()
    }

    /// Replace the account settings, discarding the ledger and its history.
    ///
    /// Refused once a buy has been executed. The cursor stays where it is and
    /// the new ledger's first snapshot is taken at the current bar.
    pub fn reconfigure(
        &mut self,
        initial_capital: f64,
        commission_rate: f64,
    ) -> Result<(), SessionError> {
        if self.capital_locked() {
            return Err(SessionError::CapitalLocked);
        }
        validate_account(initial_capital, commission_rate)?;
        self.initial_capital = initial_capital;
        self.commission_rate = commission_rate;
        self.rebuild_ledger();
        tracing::info!(initial_capital, commission_rate, "session reconfigured");
        Ok(())
    }

    /// Start over: fresh ledger, cursor back at the first full window.
    pub fn reset(&mut self) {
        self.cursor.rewind();
        self.rebuild_ledger();
        tracing::info!(stock_id = %self.stock_id, "session reset");
    }

    fn rebuild_ledger(&mut self) {
        self.ledger = Ledger::new(self.initial_capital, self.commission_rate);
        let bar = &self.bars[self.cursor.current_index()];
        self.last_returns = self.ledger.record_daily_state(bar.date, bar.close);
    }

    pub fn summary(&self) -> SessionSummary {
        let price = self.current_price();
        let start_date = self
            .ledger
            .snapshots()
            .first()
            .map(|s| s.date)
            .unwrap_or(self.current_bar().date);
        SessionSummary {
            stock_id: self.stock_id.clone(),
            start_date: start_date.to_string(),
            current_date: self.current_bar().date.to_string(),
            days_visited: self.ledger.snapshots().len(),
            initial_capital: self.initial_capital,
            commission_rate: self.commission_rate,
            cash: self.ledger.cash(),
            shares: self.ledger.shares(),
            last_price: price,
            portfolio_value: self.portfolio_value(),
            cumulative_return_pct: (self.portfolio_value() / self.initial_capital - 1.0) * 100.0,
            realized_pnl: self.ledger.realized_pnl(),
            unrealized_pnl: self.ledger.unrealized_pnl(price),
            total_commission: self.ledger.total_commission(),
            trade_count: self.ledger.trades().len(),
            exhausted: self.is_exhausted(),
        }
    }
}

//! Account ledger — cash, shares, commission, and the append-only audit trail.
//!
//! The ledger is the only place account state changes. `buy` and `sell`
//! validate everything before mutating, so a rejected request leaves cash,
//! shares, and history untouched. Configuration (initial capital, commission
//! rate) is fixed at construction; changing it means discarding the ledger
//! and building a new one. Whether the caller is allowed to do that is the
//! caller's policy, queried through [`Ledger::has_executed_any_buy`].

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{DailyReturns, DailySnapshot, Trade, TradeSide};

/// Upper bound on the quantity `max_buyable` reports.
///
/// Share counts above 2^53 are no longer exact as `f64`, so cost checks past
/// this point would compare rounded values.
pub const MAX_ORDER_QUANTITY: u64 = 1 << 53;

/// Reasons a trade request is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("insufficient funds: need {required:.2}, have {available:.2}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("insufficient shares: requested {requested}, holding {held}")]
    InsufficientShares { requested: u64, held: u64 },

    #[error("invalid price {0}: must be positive and finite")]
    InvalidPrice(f64),

    #[error("quantity must be at least 1 share")]
    InvalidQuantity,
}

/// Successful execution of a trade.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeReceipt {
    pub trade: Trade,
    pub cash_after: f64,
    pub shares_after: u64,
}

impl TradeReceipt {
    /// Human-readable confirmation for display.
    pub fn message(&self) -> String {
        let t = &self.trade;
        match t.side {
            TradeSide::Buy => format!(
                "Bought {} shares at {:.2}, total cost {:.2}",
                t.quantity, t.price, -t.cash_delta
            ),
            TradeSide::Sell => format!(
                "Sold {} shares at {:.2}, total income {:.2}",
                t.quantity, t.price, t.cash_delta
            ),
        }
    }
}

/// Simulated brokerage account for a single stock.
#[derive(Debug, Clone)]
pub struct Ledger {
    initial_capital: f64,
    commission_rate: f64,
    cash: f64,
    shares: u64,
    /// Total cost (commission included) of the shares currently held.
    cost_basis: f64,
    realized_pnl: f64,
    total_commission: f64,
    trades: Vec<Trade>,
    snapshots: Vec<DailySnapshot>,
}

impl Ledger {
    /// Create a ledger holding `initial_capital` in cash and no shares.
    ///
    /// Range checks on the arguments belong to the configuration layer
    /// (`SimConfig::validate`); the ledger accepts what it is given.
    pub fn new(initial_capital: f64, commission_rate: f64) -> Self {
        Self {
            initial_capital,
            commission_rate,
            cash: initial_capital,
            shares: 0,
            cost_basis: 0.0,
            realized_pnl: 0.0,
            total_commission: 0.0,
            trades: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    pub fn commission_rate(&self) -> f64 {
        self.commission_rate
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn shares(&self) -> u64 {
        self.shares
    }

    pub fn realized_pnl(&self) -> f64 {
        self.realized_pnl
    }

    pub fn total_commission(&self) -> f64 {
        self.total_commission
    }

    /// Trade history in execution order.
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Daily snapshots in recording order.
    pub fn snapshots(&self) -> &[DailySnapshot] {
        &self.snapshots
    }

    /// Average cost per held share, commission included. Zero when flat.
    pub fn average_cost(&self) -> f64 {
        if self.shares == 0 {
            0.0
        } else {
            self.cost_basis / self.shares as f64
        }
    }

    /// Mark-to-market gain on the shares currently held.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.shares as f64 * price - self.cost_basis
    }

    /// `cash + shares * price`. No side effects.
    pub fn current_portfolio_value(&self, price: f64) -> f64 {
        self.cash + self.shares as f64 * price
    }

    /// Whether any buy has ever been executed on this ledger.
    pub fn has_executed_any_buy(&self) -> bool {
        self.trades.iter().any(Trade::is_buy)
    }

    /// Largest whole-share quantity whose cost (commission included) fits in cash.
    pub fn max_buyable(&self, price: f64) -> u64 {
        if !(price.is_finite() && price > 0.0) {
            return 0;
        }
        let unit = price * (1.0 + self.commission_rate);
        let estimate = (self.cash / unit).floor();
        let mut qty = if estimate.is_nan() || estimate <= 0.0 {
            0
        } else if estimate >= MAX_ORDER_QUANTITY as f64 {
            MAX_ORDER_QUANTITY
        } else {
            estimate as u64
        };
        // Float division can land one share either side of the true limit.
        while qty > 0 && self.buy_cost(price, qty) > self.cash {
            qty -= 1;
        }
        while let Some(next) = qty.checked_add(1) {
            if next > MAX_ORDER_QUANTITY || self.buy_cost(price, next) > self.cash {
                break;
            }
            qty = next;
        }
        qty
    }

    fn buy_cost(&self, price: f64, quantity: u64) -> f64 {
        price * quantity as f64 * (1.0 + self.commission_rate)
    }

    fn sell_income(&self, price: f64, quantity: u64) -> f64 {
        price * quantity as f64 * (1.0 - self.commission_rate)
    }

    /// Buy `quantity` shares at `price`. All-or-nothing.
    pub fn buy(
        &mut self,
        date: NaiveDate,
        price: f64,
        quantity: u64,
        stock_id: &str,
    ) -> Result<TradeReceipt, LedgerError> {
        check_order(price, quantity)?;

        let total_cost = self.buy_cost(price, quantity);
        if total_cost > self.cash {
            tracing::warn!(
                stock_id,
                quantity,
                price,
                required = total_cost,
                available = self.cash,
                "buy rejected"
            );
            return Err(LedgerError::InsufficientFunds {
                required: total_cost,
                available: self.cash,
            });
        }

        let commission = price * quantity as f64 * self.commission_rate;
        self.cash -= total_cost;
        self.shares += quantity;
        self.cost_basis += total_cost;
        self.total_commission += commission;

        let trade = Trade {
            date,
            side: TradeSide::Buy,
            stock_id: stock_id.to_string(),
            price,
            quantity,
            cash_delta: -total_cost,
            commission,
        };
        tracing::info!(stock_id, %date, quantity, price, total_cost, "buy executed");
        Ok(self.append(trade))
    }

    /// Sell `quantity` held shares at `price`. All-or-nothing.
    pub fn sell(
        &mut self,
        date: NaiveDate,
        price: f64,
        quantity: u64,
        stock_id: &str,
    ) -> Result<TradeReceipt, LedgerError> {
        check_order(price, quantity)?;

        if quantity > self.shares {
            tracing::warn!(stock_id, quantity, held = self.shares, "sell rejected");
            return Err(LedgerError::InsufficientShares {
                requested: quantity,
                held: self.shares,
            });
        }

        let total_income = self.sell_income(price, quantity);
        let commission = price * quantity as f64 * self.commission_rate;
        let released_basis = self.cost_basis * quantity as f64 / self.shares as f64;

        self.cash += total_income;
        self.shares -= quantity;
        self.realized_pnl += total_income - released_basis;
        self.cost_basis = if self.shares == 0 {
            0.0
        } else {
            self.cost_basis - released_basis
        };
        self.total_commission += commission;

        let trade = Trade {
            date,
            side: TradeSide::Sell,
            stock_id: stock_id.to_string(),
            price,
            quantity,
            cash_delta: total_income,
            commission,
        };
        tracing::info!(stock_id, %date, quantity, price, total_income, "sell executed");
        Ok(self.append(trade))
    }

    fn append(&mut self, trade: Trade) -> TradeReceipt {
        self.trades.push(trade.clone());
        TradeReceipt {
            trade,
            cash_after: self.cash,
            shares_after: self.shares,
        }
    }

    /// Append a snapshot of the account at `price` and return its returns.
    ///
    /// The daily return is measured from the previous snapshot's price, not
    /// from the previous portfolio value.
    pub fn record_daily_state(&mut self, date: NaiveDate, price: f64) -> DailyReturns {
        let portfolio_value = self.current_portfolio_value(price);
        let daily_return_pct = match self.snapshots.last() {
            Some(prev) => (price / prev.price - 1.0) * 100.0,
            None => 0.0,
        };
        let cumulative_return_pct = (portfolio_value / self.initial_capital - 1.0) * 100.0;

        self.snapshots.push(DailySnapshot {
            date,
            price,
            cash: self.cash,
            shares: self.shares,
            portfolio_value,
            daily_return_pct,
            cumulative_return_pct,
        });
        tracing::debug!(%date, price, portfolio_value, cumulative_return_pct, "daily state recorded");

        DailyReturns {
            daily_pct: daily_return_pct,
            cumulative_pct: cumulative_return_pct,
        }
    }
}

fn check_order(price: f64, quantity: u64) -> Result<(), LedgerError> {
    if !(price.is_finite() && price > 0.0) {
        return Err(LedgerError::InvalidPrice(price));
    }
    if quantity == 0 {
        return Err(LedgerError::InvalidQuantity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn new_ledger_is_all_cash() {
        let ledger = Ledger::new(100_000.0, 0.0003);
        assert_eq!(ledger.cash(), 100_000.0);
        assert_eq!(ledger.shares(), 0);
        assert!(ledger.trades().is_empty());
        assert!(!ledger.has_executed_any_buy());
    }

    #[test]
    fn buy_then_sell_scenario() {
        let mut ledger = Ledger::new(100_000.0, 0.0003);

        let receipt = ledger.buy(day(2), 10.0, 1000, "600000").unwrap();
        assert!((receipt.trade.cash_delta + 10_003.0).abs() < EPS);
        assert!((ledger.cash() - 89_997.0).abs() < EPS);
        assert_eq!(ledger.shares(), 1000);

        let receipt = ledger.sell(day(3), 12.0, 500, "600000").unwrap();
        assert!((receipt.trade.cash_delta - 5_999.8).abs() < EPS);
        assert!((ledger.cash() - 95_996.8).abs() < EPS);
        assert_eq!(ledger.shares(), 500);
        assert_eq!(ledger.trades().len(), 2);
    }

    #[test]
    fn buy_rejected_when_cost_exceeds_cash() {
        let mut ledger = Ledger::new(10_000.0, 0.0003);
        let err = ledger.buy(day(2), 10.0, 1000, "600000").unwrap_err();
        match err {
            LedgerError::InsufficientFunds {
                required,
                available,
            } => {
                assert!((required - 10_003.0).abs() < EPS);
                assert_eq!(available, 10_000.0);
            }
            other => panic!("expected InsufficientFunds, got {other:?}"),
        }
        assert_eq!(ledger.cash(), 10_000.0);
        assert_eq!(ledger.shares(), 0);
        assert!(ledger.trades().is_empty());
    }

    #[test]
    fn sell_rejected_when_quantity_exceeds_holdings() {
        let mut ledger = Ledger::new(100_000.0, 0.0);
        ledger.buy(day(2), 10.0, 100, "600000").unwrap();
        let err = ledger.sell(day(3), 10.0, 101, "600000").unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientShares {
                requested: 101,
                held: 100
            }
        );
        assert_eq!(ledger.shares(), 100);
        assert_eq!(ledger.trades().len(), 1);
    }

    #[test]
    fn zero_quantity_and_bad_price_rejected() {
        let mut ledger = Ledger::new(100_000.0, 0.0);
        assert_eq!(
            ledger.buy(day(2), 10.0, 0, "x").unwrap_err(),
            LedgerError::InvalidQuantity
        );
        assert!(matches!(
            ledger.buy(day(2), 0.0, 10, "x").unwrap_err(),
            LedgerError::InvalidPrice(_)
        ));
        assert!(matches!(
            ledger.sell(day(2), f64::NAN, 10, "x").unwrap_err(),
            LedgerError::InvalidPrice(_)
        ));
        assert!(ledger.trades().is_empty());
    }

    #[test]
    fn error_messages_derive_from_kind() {
        let err = LedgerError::InsufficientShares {
            requested: 10,
            held: 3,
        };
        assert_eq!(err.to_string(), "insufficient shares: requested 10, holding 3");
        let err = LedgerError::InsufficientFunds {
            required: 10_003.0,
            available: 500.0,
        };
        assert!(err.to_string().contains("10003.00"));
    }

    #[test]
    fn receipt_message_reports_totals() {
        let mut ledger = Ledger::new(100_000.0, 0.0003);
        let receipt = ledger.buy(day(2), 10.0, 1000, "600000").unwrap();
        assert_eq!(
            receipt.message(),
            "Bought 1000 shares at 10.00, total cost 10003.00"
        );
    }

    #[test]
    fn daily_return_uses_price_change() {
        let mut ledger = Ledger::new(100_000.0, 0.0);
        let first = ledger.record_daily_state(day(2), 10.0);
        assert_eq!(first.daily_pct, 0.0);
        assert_eq!(first.cumulative_pct, 0.0);

        // All cash: portfolio value is flat, but the daily return follows price.
        let second = ledger.record_daily_state(day(3), 11.0);
        assert!((second.daily_pct - 10.0).abs() < EPS);
        assert_eq!(second.cumulative_pct, 0.0);
        assert_eq!(ledger.snapshots().len(), 2);
    }

    #[test]
    fn cumulative_return_tracks_portfolio_value() {
        let mut ledger = Ledger::new(100_000.0, 0.0);
        ledger.buy(day(2), 10.0, 5_000, "600000").unwrap();
        let r = ledger.record_daily_state(day(3), 12.0);
        // 50_000 cash + 5_000 * 12 = 110_000
        assert!((r.cumulative_pct - 10.0).abs() < EPS);
        let snap = ledger.snapshots().last().unwrap();
        assert!((snap.portfolio_value - 110_000.0).abs() < EPS);
        assert_eq!(snap.shares, 5_000);
    }

    #[test]
    fn portfolio_value_is_pure() {
        let mut ledger = Ledger::new(100_000.0, 0.0003);
        ledger.buy(day(2), 10.0, 1000, "600000").unwrap();
        let a = ledger.current_portfolio_value(11.0);
        let b = ledger.current_portfolio_value(11.0);
        assert_eq!(a, b);
        assert!(ledger.snapshots().is_empty());
    }

    #[test]
    fn has_executed_any_buy_ignores_sells() {
        let mut ledger = Ledger::new(100_000.0, 0.0);
        assert!(ledger.sell(day(2), 10.0, 1, "x").is_err());
        assert!(!ledger.has_executed_any_buy());
        ledger.buy(day(2), 10.0, 1, "x").unwrap();
        assert!(ledger.has_executed_any_buy());
    }

    #[test]
    fn max_buyable_fits_in_cash() {
        let ledger = Ledger::new(100_000.0, 0.0003);
        let qty = ledger.max_buyable(10.0);
        assert_eq!(qty, 9_997);
        assert!(10.0 * qty as f64 * 1.0003 <= 100_000.0);
        assert!(10.0 * (qty + 1) as f64 * 1.0003 > 100_000.0);
        assert_eq!(ledger.max_buyable(0.0), 0);
    }

    #[test]
    fn max_buyable_tiny_price_is_bounded() {
        let ledger = Ledger::new(100_000.0, 0.0003);
        let qty = ledger.max_buyable(1e-15);
        assert_eq!(qty, MAX_ORDER_QUANTITY);
        assert!(1e-15 * qty as f64 * 1.0003 <= 100_000.0);

        let ledger = Ledger::new(100_000.0, 0.0);
        assert_eq!(ledger.max_buyable(f64::MIN_POSITIVE), MAX_ORDER_QUANTITY);
    }

    #[test]
    fn max_buyable_on_broke_account_is_zero() {
        let mut ledger = Ledger::new(1_000.0, 0.0);
        ledger.buy(day(2), 10.0, 100, "x").unwrap();
        assert_eq!(ledger.cash(), 0.0);
        assert_eq!(ledger.max_buyable(10.0), 0);
    }

    #[test]
    fn realized_pnl_uses_average_cost() {
        let mut ledger = Ledger::new(100_000.0, 0.0);
        ledger.buy(day(2), 10.0, 100, "x").unwrap();
        ledger.buy(day(3), 20.0, 100, "x").unwrap();
        assert!((ledger.average_cost() - 15.0).abs() < EPS);

        ledger.sell(day(4), 18.0, 100, "x").unwrap();
        assert!((ledger.realized_pnl() - 300.0).abs() < EPS);
        assert!((ledger.average_cost() - 15.0).abs() < EPS);
        assert!((ledger.unrealized_pnl(16.0) - 100.0).abs() < EPS);

        ledger.sell(day(5), 15.0, 100, "x").unwrap();
        assert_eq!(ledger.shares(), 0);
        assert_eq!(ledger.average_cost(), 0.0);
        assert!((ledger.realized_pnl() - 300.0).abs() < EPS);
    }

    #[test]
    fn commission_accumulates() {
        let mut ledger = Ledger::new(100_000.0, 0.0003);
        ledger.buy(day(2), 10.0, 1000, "x").unwrap();
        ledger.sell(day(3), 12.0, 500, "x").unwrap();
        // 3.00 on the buy, 1.80 on the sell
        assert!((ledger.total_commission() - 4.8).abs() < EPS);
    }
}

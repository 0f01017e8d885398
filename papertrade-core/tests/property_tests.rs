//! Property tests for ledger and cursor invariants.
//!
//! Uses proptest to verify:
//! 1. Buy accounting — affordable buys move cash and shares exactly; unaffordable ones change nothing
//! 2. Sell accounting — covered sells move cash and shares exactly; uncovered ones change nothing
//! 3. Cash never goes negative under any sequence of requests
//! 4. Cursor bounds — never past the last bar, window never wider than its size

use chrono::NaiveDate;
use papertrade_core::{DayCursor, Ledger, LedgerError};
use proptest::prelude::*;

const EPS: f64 = 1e-6;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_rate() -> impl Strategy<Value = f64> {
    0.0..0.003_f64
}

fn arb_capital() -> impl Strategy<Value = f64> {
    (1_000.0..1_000_000.0_f64).prop_map(|c| c.round())
}

#[derive(Debug, Clone)]
enum Request {
    Buy(f64, u64),
    Sell(f64, u64),
}

fn arb_request() -> impl Strategy<Value = Request> {
    prop_oneof![
        (arb_price(), 1..5_000u64).prop_map(|(p, q)| Request::Buy(p, q)),
        (arb_price(), 1..5_000u64).prop_map(|(p, q)| Request::Sell(p, q)),
    ]
}

// ── 1. Buy accounting ────────────────────────────────────────────────

proptest! {
    #[test]
    fn buy_moves_cash_and_shares_exactly(
        capital in arb_capital(),
        rate in arb_rate(),
        price in arb_price(),
        qty in 1..10_000u64,
    ) {
        let mut ledger = Ledger::new(capital, rate);
        let cost = price * qty as f64 * (1.0 + rate);
        let result = ledger.buy(day(), price, qty, "X");

        if cost <= capital {
            prop_assert!(result.is_ok());
            prop_assert!((ledger.cash() - (capital - cost)).abs() < EPS);
            prop_assert_eq!(ledger.shares(), qty);
            prop_assert_eq!(ledger.trades().len(), 1);
            prop_assert!(ledger.cash() >= 0.0);
        } else {
            let is_funds_error = matches!(result, Err(LedgerError::InsufficientFunds { .. }));
            prop_assert!(is_funds_error);
            prop_assert_eq!(ledger.cash(), capital);
            prop_assert_eq!(ledger.shares(), 0);
            prop_assert!(ledger.trades().is_empty());
        }
    }

    #[test]
    fn max_buyable_is_affordable_and_maximal(
        capital in arb_capital(),
        rate in arb_rate(),
        price in arb_price(),
    ) {
        let mut ledger = Ledger::new(capital, rate);
        let max = ledger.max_buyable(price);
        if max > 0 {
            prop_assert!(ledger.clone().buy(day(), price, max, "X").is_ok());
        }
        let over = ledger.buy(day(), price, max + 1, "X");
        prop_assert!(over.is_err());
    }
}

// ── 2. Sell accounting ───────────────────────────────────────────────

proptest! {
    #[test]
    fn sell_moves_cash_and_shares_exactly(
        rate in arb_rate(),
        buy_price in arb_price(),
        sell_price in arb_price(),
        held in 1..2_000u64,
        sell_qty in 1..4_000u64,
    ) {
        let mut ledger = Ledger::new(1_000_000_000.0, rate);
        ledger.buy(day(), buy_price, held, "X").unwrap();
        let cash_before = ledger.cash();

        let result = ledger.sell(day(), sell_price, sell_qty, "X");
        if sell_qty <= held {
            prop_assert!(result.is_ok());
            let income = sell_price * sell_qty as f64 * (1.0 - rate);
            prop_assert!((ledger.cash() - (cash_before + income)).abs() < EPS);
            prop_assert_eq!(ledger.shares(), held - sell_qty);
        } else {
            prop_assert_eq!(
                result.unwrap_err(),
                LedgerError::InsufficientShares { requested: sell_qty, held }
            );
            prop_assert_eq!(ledger.cash(), cash_before);
            prop_assert_eq!(ledger.shares(), held);
        }
    }
}

// ── 3. Cash never negative ───────────────────────────────────────────

proptest! {
    #[test]
    fn cash_never_negative(
        capital in arb_capital(),
        rate in arb_rate(),
        requests in prop::collection::vec(arb_request(), 1..40),
    ) {
        let mut ledger = Ledger::new(capital, rate);
        for req in requests {
            let trades_before = ledger.trades().len();
            let ok = match req {
                Request::Buy(p, q) => ledger.buy(day(), p, q, "X").is_ok(),
                Request::Sell(p, q) => ledger.sell(day(), p, q, "X").is_ok(),
            };
            prop_assert!(ledger.cash() >= 0.0);
            prop_assert_eq!(ledger.trades().len(), trades_before + usize::from(ok));
        }
    }

    #[test]
    fn portfolio_value_is_idempotent(
        capital in arb_capital(),
        price in arb_price(),
        qty in 1..100u64,
    ) {
        let mut ledger = Ledger::new(capital, 0.0003);
        let _ = ledger.buy(day(), price, qty, "X");
        let a = ledger.current_portfolio_value(price);
        let b = ledger.current_portfolio_value(price);
        prop_assert_eq!(a, b);
    }
}

// ── 4. Cursor bounds ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn cursor_never_passes_last_bar(
        total in 1..3_000usize,
        window in 1..800usize,
        steps in prop::collection::vec(0..60usize, 0..100),
    ) {
        let mut cursor = DayCursor::new(total, window).unwrap();
        prop_assert_eq!(cursor.current_index(), (window - 1).min(total - 1));
        for s in steps {
            cursor.advance(s);
            prop_assert!(cursor.current_index() <= total - 1);
            prop_assert!(cursor.current_index() >= (window - 1).min(total - 1));

            let w = cursor.visible_window();
            prop_assert!(w.end - w.start <= window);
            prop_assert_eq!(w.end, cursor.current_index() + 1);
            if total < window {
                prop_assert_eq!(w.end - w.start, total);
            }
        }
    }

    #[test]
    fn advance_after_exhaustion_is_noop(
        total in 1..1_000usize,
        window in 1..500usize,
        extra in 1..100usize,
    ) {
        let mut cursor = DayCursor::new(total, window).unwrap();
        cursor.advance(total);
        prop_assert!(cursor.is_exhausted());
        let idx = cursor.current_index();
        cursor.advance(extra);
        prop_assert_eq!(cursor.current_index(), idx);
    }
}

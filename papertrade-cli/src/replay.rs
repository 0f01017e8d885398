//! Drives a session through a parsed script.
//!
//! Rejected trades and refused settings changes are reported and the replay
//! carries on, the same way the interactive screen treats them.

use papertrade_core::{Session, SessionError, StepOutcome, TradeAction};

use crate::script::{Command, Line, Quantity};

/// What happened on one script line.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Stepped { date: String, price: f64, daily_pct: f64 },
    AtEnd,
    Traded(String),
    Held,
    Rejected(String),
    Reconfigured,
}

impl Outcome {
    pub fn render(&self) -> String {
        match self {
            Outcome::Stepped {
                date,
                price,
                daily_pct,
            } => format!("{date}  close {price:.2}  ({daily_pct:+.2}%)"),
            Outcome::AtEnd => "already at the last bar, step ignored".into(),
            Outcome::Traded(msg) => msg.clone(),
            Outcome::Held => "hold".into(),
            Outcome::Rejected(reason) => format!("rejected: {reason}"),
            Outcome::Reconfigured => "account settings updated".into(),
        }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }
}

pub fn apply(session: &mut Session, command: Command) -> Outcome {
    match command {
        Command::Step(size) => match session.advance(size) {
            StepOutcome::Exhausted => Outcome::AtEnd,
            StepOutcome::Moved { .. } => Outcome::Stepped {
                date: session.current_bar().date.to_string(),
                price: session.current_price(),
                daily_pct: session.last_returns().daily_pct,
            },
        },
        Command::Hold => execute(session, TradeAction::Hold),
        Command::Buy(q) => {
            let qty = match q {
                Quantity::Shares(n) => n,
                Quantity::Everything => session.max_buyable(),
            };
            execute(session, TradeAction::Buy(qty))
        }
        Command::Sell(q) => {
            let qty = match q {
                Quantity::Shares(n) => n,
                Quantity::Everything => session.max_sellable(),
            };
            execute(session, TradeAction::Sell(qty))
        }
        Command::Capital(amount) => {
            let rate = session.commission_rate();
            reconfigure(session, amount, rate)
        }
        Command::Commission(rate) => {
            let capital = session.initial_capital();
            reconfigure(session, capital, rate)
        }
    }
}

fn execute(session: &mut Session, action: TradeAction) -> Outcome {
    match session.execute(action) {
        Ok(Some(receipt)) => Outcome::Traded(receipt.message()),
        Ok(None) => Outcome::Held,
        Err(e) => Outcome::Rejected(e.to_string()),
    }
}

fn reconfigure(session: &mut Session, capital: f64, rate: f64) -> Outcome {
    match session.reconfigure(capital, rate) {
        Ok(()) => Outcome::Reconfigured,
        Err(SessionError::CapitalLocked) => {
            Outcome::Rejected("capital is locked after the first buy".into())
        }
        Err(e) => Outcome::Rejected(e.to_string()),
    }
}

/// Run every line, returning `(line number, outcome)` pairs in order.
pub fn run(session: &mut Session, lines: &[Line]) -> Vec<(usize, Outcome)> {
    lines
        .iter()
        .map(|line| (line.number, apply(session, line.command)))
        .collect()
}

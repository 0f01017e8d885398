//! Session export — CSV trade tape, CSV daily snapshots, JSON summary.
//!
//! `save_artifacts` bundles all three into a `{stock}_{timestamp}/` directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::{DailySnapshot, Trade};
use crate::session::{Session, SessionSummary};

// ─── CSV export ─────────────────────────────────────────────────────

/// Columns: date, side, stock_id, price, quantity, cash_delta, commission
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "side",
        "stock_id",
        "price",
        "quantity",
        "cash_delta",
        "commission",
    ])?;

    for t in trades {
        wtr.write_record([
            t.date.format("%Y-%m-%d").to_string(),
            t.side.label().to_string(),
            t.stock_id.clone(),
            format!("{:.4}", t.price),
            t.quantity.to_string(),
            format!("{:.2}", t.cash_delta),
            format!("{:.2}", t.commission),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Columns: date, price, cash, shares, portfolio_value, daily_return_pct,
/// cumulative_return_pct
pub fn export_snapshots_csv(snapshots: &[DailySnapshot]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "price",
        "cash",
        "shares",
        "portfolio_value",
        "daily_return_pct",
        "cumulative_return_pct",
    ])?;

    for s in snapshots {
        wtr.write_record([
            s.date.format("%Y-%m-%d").to_string(),
            format!("{:.4}", s.price),
            format!("{:.2}", s.cash),
            s.shares.to_string(),
            format!("{:.2}", s.portfolio_value),
            format!("{:.4}", s.daily_return_pct),
            format!("{:.4}", s.cumulative_return_pct),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_summary_json(summary: &SessionSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).context("failed to serialize SessionSummary to JSON")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write `trades.csv`, `snapshots.csv` and `summary.json` for a session.
///
/// Returns the path to the created directory.
pub fn save_artifacts(session: &Session, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        session.stock_id(),
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let ledger = session.ledger();
    std::fs::write(run_dir.join("trades.csv"), export_trades_csv(ledger.trades())?)?;
    std::fs::write(
        run_dir.join("snapshots.csv"),
        export_snapshots_csv(ledger.snapshots())?,
    )?;
    std::fs::write(
        run_dir.join("summary.json"),
        export_summary_json(&session.summary())?,
    )?;

    tracing::info!(dir = %run_dir.display(), "session artifacts saved");
    Ok(run_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::domain::{PriceBar, TradeSide};
    use crate::session::TradeAction;
    use chrono::NaiveDate;

    fn session() -> Session {
        let base = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let bars = (0..10)
            .map(|i| {
                let close = 10.0 + i as f64;
                PriceBar::new(
                    base + chrono::Duration::days(i),
                    close,
                    close + 0.5,
                    close - 0.5,
                    close,
                )
            })
            .collect();
        let mut config = SimConfig::default();
        config.view.window_size = 5;
        Session::new("000001", bars, &config).unwrap()
    }

    #[test]
    fn trades_csv_has_header_and_rows() {
        let trades = vec![Trade {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            side: TradeSide::Buy,
            stock_id: "600000".into(),
            price: 10.0,
            quantity: 1000,
            cash_delta: -10_003.0,
            commission: 3.0,
        }];
        let csv = export_trades_csv(&trades).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("date,side,stock_id"));
        assert_eq!(lines[1], "2024-01-02,Buy,600000,10.0000,1000,-10003.00,3.00");
    }

    #[test]
    fn snapshots_csv_one_row_per_snapshot() {
        let mut s = session();
        s.advance(crate::cursor::StepSize::Day);
        let csv = export_snapshots_csv(s.ledger().snapshots()).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn save_artifacts_writes_bundle() {
        let mut s = session();
        s.execute(TradeAction::Buy(100)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let run_dir = save_artifacts(&s, dir.path()).unwrap();

        assert!(run_dir.join("trades.csv").is_file());
        assert!(run_dir.join("snapshots.csv").is_file());
        let json = std::fs::read_to_string(run_dir.join("summary.json")).unwrap();
        let summary: SessionSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary.trade_count, 1);
        assert_eq!(summary.stock_id, "000001");
    }
}

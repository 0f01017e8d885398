//! Daily price CSV parsing.
//!
//! Expected header columns: `trade_date` (YYYYMMDD), `open`, `high`, `low`,
//! `close`. Extra columns (ts_code, vol, amount, ...) are ignored, and column
//! order does not matter. Every price must be a finite positive number.
//! Rows are returned sorted ascending by date.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use super::LoadError;
use crate::domain::PriceBar;

pub const REQUIRED_COLUMNS: [&str; 5] = ["trade_date", "open", "high", "low", "close"];

const DATE_FORMAT: &str = "%Y%m%d";

/// Load and parse a price CSV file.
pub fn load_price_csv(path: &Path) -> Result<Vec<PriceBar>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bars = parse_price_csv(file)?;
    tracing::debug!(path = %path.display(), bars = bars.len(), "price series loaded");
    Ok(bars)
}

/// Parse price rows from any reader.
pub fn parse_price_csv<R: Read>(reader: R) -> Result<Vec<PriceBar>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut positions = [0usize; 5];
    for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingRequiredColumn(name.to_string()))?;
    }
    let [date_col, open_col, high_col, low_col, close_col] = positions;

    let mut bars = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let field = |col: usize| record.get(col).unwrap_or("");

        let date = parse_date(field(date_col)).ok_or_else(|| LoadError::InvalidRow {
            line,
            reason: format!("bad trade_date '{}'", field(date_col)),
        })?;
        let price = |col: usize, name: &str| -> Result<f64, LoadError> {
            let bad = || LoadError::InvalidRow {
                line,
                reason: format!("bad {name} '{}'", field(col)),
            };
            let value = field(col).parse::<f64>().map_err(|_| bad())?;
            if value.is_finite() && value > 0.0 {
                Ok(value)
            } else {
                Err(bad())
            }
        };

        bars.push(PriceBar {
            date,
            open: price(open_col, "open")?,
            high: price(high_col, "high")?,
            low: price(low_col, "low")?,
            close: price(close_col, "close")?,
        });
    }

    if bars.is_empty() {
        return Err(LoadError::Empty);
    }

    bars.sort_by_key(|b| b.date);
    let duplicates = bars.windows(2).filter(|w| w[0].date == w[1].date).count();
    if duplicates > 0 {
        tracing::warn!(duplicates, "price series contains duplicate trade dates");
    }

    Ok(bars)
}

/// Accepts `20240102`, and also `20240102.0` as written by some spreadsheet exports.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.strip_suffix(".0").unwrap_or(raw);
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

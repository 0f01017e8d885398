//! Price data loading: CSV parsing and the on-disk stock library.

pub mod csv_loader;
pub mod library;

use std::path::PathBuf;

use thiserror::Error;

pub use csv_loader::{load_price_csv, parse_price_csv, REQUIRED_COLUMNS};
pub use library::{StockEntry, StockLibrary};

/// Errors from reading price data.
///
/// These are designed to be displayable in both CLI and TUI contexts.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column '{0}' not found")]
    MissingRequiredColumn(String),

    #[error("line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    #[error("file contains no price rows")]
    Empty,

    #[error("stock '{0}' not found in library")]
    UnknownStock(String),
}

//! Stock library — a directory of `<stock_id>.csv` price files.
//!
//! Supports picking a file by id or drawing one at random.

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::Rng;

use super::{load_price_csv, LoadError};
use crate::domain::{PriceBar, StockId};

/// One CSV file in the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockEntry {
    pub stock_id: StockId,
    pub path: PathBuf,
}

/// Handle on a stock data directory.
#[derive(Debug, Clone)]
pub struct StockLibrary {
    dir: PathBuf,
}

impl StockLibrary {
    /// Open `dir`, creating it if it does not exist yet.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let dir = dir.into();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|source| LoadError::Io {
                path: dir.clone(),
                source,
            })?;
            tracing::info!(dir = %dir.display(), "created stock data directory");
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All `.csv` files, sorted by stock id.
    pub fn list(&self) -> Result<Vec<StockEntry>, LoadError> {
        let io_err = |source| LoadError::Io {
            path: self.dir.clone(),
            source,
        };
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !is_csv || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                entries.push(StockEntry {
                    stock_id: stem.to_string(),
                    path,
                });
            }
        }
        entries.sort_by(|a, b| a.stock_id.cmp(&b.stock_id));
        Ok(entries)
    }

    /// Find a stock by id.
    pub fn find(&self, stock_id: &str) -> Result<StockEntry, LoadError> {
        self.list()?
            .into_iter()
            .find(|e| e.stock_id == stock_id)
            .ok_or_else(|| LoadError::UnknownStock(stock_id.to_string()))
    }

    /// Load the bars of one stock.
    pub fn load(&self, stock_id: &str) -> Result<Vec<PriceBar>, LoadError> {
        let entry = self.find(stock_id)?;
        load_price_csv(&entry.path)
    }

    /// Draw one stock uniformly at random. `None` if the library is empty.
    pub fn pick_random<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Option<StockEntry>, LoadError> {
        let entries = self.list()?;
        let picked = entries.choose(rng).cloned();
        if let Some(entry) = &picked {
            tracing::info!(stock_id = %entry.stock_id, "randomly selected stock");
        }
        Ok(picked)
    }
}

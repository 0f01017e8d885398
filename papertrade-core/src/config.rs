//! Simulation configuration loaded from TOML.
//!
//! ```toml
//! [account]
//! initial_capital = 100000.0
//! commission_rate = 0.0003
//!
//! [view]
//! window_size = 500
//!
//! [data]
//! dir = "stockdata"
//! ```
//!
//! Every field has a default, so an empty file is a valid config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cursor::DEFAULT_WINDOW_SIZE;

/// Smallest starting capital the simulator accepts.
pub const MIN_INITIAL_CAPITAL: f64 = 1_000.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    pub initial_capital: f64,
    /// Fraction of traded value charged on each side, e.g. 0.0003 = 0.03%.
    pub commission_rate: f64,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            commission_rate: 0.0003,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub window_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("stockdata"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub account: AccountConfig,
    pub view: ViewConfig,
    pub data: DataConfig,
}

impl SimConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_account(self.account.initial_capital, self.account.commission_rate)?;
        if self.view.window_size == 0 {
            return Err(ConfigError::Invalid("window_size must be at least 1".into()));
        }
        Ok(())
    }
}

/// Range checks shared by config loading and live reconfiguration.
pub fn validate_account(initial_capital: f64, commission_rate: f64) -> Result<(), ConfigError> {
    if !initial_capital.is_finite() || initial_capital < MIN_INITIAL_CAPITAL {
        return Err(ConfigError::Invalid(format!(
            "initial_capital must be at least {MIN_INITIAL_CAPITAL}, got {initial_capital}"
        )));
    }
    if !(0.0..1.0).contains(&commission_rate) {
        return Err(ConfigError::Invalid(format!(
            "commission_rate must be in [0, 1), got {commission_rate}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = SimConfig::from_toml("").unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.account.initial_capital, 100_000.0);
        assert_eq!(config.account.commission_rate, 0.0003);
        assert_eq!(config.view.window_size, 500);
        assert_eq!(config.data.dir, PathBuf::from("stockdata"));
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let config = SimConfig::from_toml(
            r#"
            [account]
            initial_capital = 50000.0

            [view]
            window_size = 120
            "#,
        )
        .unwrap();
        assert_eq!(config.account.initial_capital, 50_000.0);
        assert_eq!(config.account.commission_rate, 0.0003);
        assert_eq!(config.view.window_size, 120);
    }

    #[test]
    fn rejects_small_capital() {
        let err = SimConfig::from_toml("[account]\ninitial_capital = 500.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_commission_out_of_range() {
        assert!(SimConfig::from_toml("[account]\ncommission_rate = 1.0\n").is_err());
        assert!(SimConfig::from_toml("[account]\ncommission_rate = -0.1\n").is_err());
    }

    #[test]
    fn rejects_zero_window() {
        assert!(SimConfig::from_toml("[view]\nwindow_size = 0\n").is_err());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = SimConfig::from_toml("[account\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = SimConfig::from_file(Path::new("/nonexistent/papertrade.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

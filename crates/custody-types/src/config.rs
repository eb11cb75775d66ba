//! Configuration for a ledger instance.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{constants, Account, LedgerError, Result};

/// Configuration for one ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// The administrative principal: authorizes owner-only operations and
    /// holds the deposit balance withdrawals are drawn from.
    pub owner: Account,
    /// Longest accepted checkpoint commitment, in bytes.
    #[serde(default = "default_max_root_bytes")]
    pub max_root_bytes: usize,
    /// Record the hash-chained audit trail.
    #[serde(default = "default_true")]
    pub event_log: bool,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tracing subscriber settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: constants::DEFAULT_LOG_FILTER.to_string(),
            json: false,
        }
    }
}

fn default_max_root_bytes() -> usize {
    constants::DEFAULT_MAX_ROOT_BYTES
}

fn default_true() -> bool {
    true
}

impl LedgerConfig {
    /// Config with defaults for everything but the owner.
    #[must_use]
    pub fn new(owner: Account) -> Self {
        Self {
            owner,
            max_root_bytes: constants::DEFAULT_MAX_ROOT_BYTES,
            event_log: true,
            logging: LoggingConfig::default(),
        }
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| LedgerError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse, and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.owner.is_empty() {
            return Err(LedgerError::Configuration("owner must not be empty".into()));
        }
        if self.max_root_bytes == 0 {
            return Err(LedgerError::Configuration(
                "max_root_bytes must be > 0".into(),
            ));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(LedgerError::Configuration(
                "logging.filter must not be empty".into(),
            ));
        }
        Ok(())
    }
}

//! Application configuration
//!
//! Settings come from an optional `~/.fundledger/config.toml`, overridden by
//! the `FUNDLEDGER_DB` environment variable and finally by CLI flags.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DB_ENV_VAR: &str = "FUNDLEDGER_DB";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Load `config.toml` from the data directory, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> Result<Self> {
        let path = data_dir()?.join("config.toml");
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::parse(&raw).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Resolve the ledger database path: CLI flag, then env var, then
    /// config file, then `~/.fundledger/ledger.db`.
    pub fn resolve_db_path(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_override {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = std::env::var_os(DB_ENV_VAR).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }
        Ok(data_dir()?.join("ledger.db"))
    }

    /// Filter directive for tracing-subscriber when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

/// `~/.fundledger`, created on first use.
pub fn data_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let dir = PathBuf::from(home).join(".fundledger");
    std::fs::create_dir_all(&dir).context("Failed to create .fundledger directory")?;
    Ok(dir)
}

use crate::error::{AddrResult, MatchError};
use crate::matcher::{MatchKind, MatchSettings, Threshold, DEFAULT_PAIR_WARNING_LEVEL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that points at an alternate config file
pub const CONFIG_ENV: &str = "ADDRMATCH_CONFIG";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Matching
    /// Minimum similarity (0-100) for a fuzzy match. `null` disables fuzzy
    /// matching until a threshold is supplied.
    pub fuzzy_match_threshold: Option<f64>,
    pub default_match_type: MatchKind,
    pub parallel: bool,
    pub max_pairs: Option<u64>,
    pub pair_warning_level: u64,

    // Meta
    pub log_level: String,
    pub audit_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fuzzy_match_threshold: Some(80.0),
            default_match_type: MatchKind::Exact,
            parallel: true,
            max_pairs: None,
            pair_warning_level: DEFAULT_PAIR_WARNING_LEVEL,
            log_level: "INFO".to_string(),
            audit_enabled: true,
        }
    }
}

impl Config {
    /// Load config from the default location, or defaults if there is none
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from a file.
    ///
    /// A missing file yields defaults. A corrupt file is moved aside to
    /// `*.json.corrupt` and defaults are used.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = path.with_extension("json.corrupt");
                let _ = std::fs::rename(path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write config {}", path.display()))?;
        Ok(())
    }

    /// The configured threshold, validated
    pub fn fuzzy_threshold(&self) -> AddrResult<Threshold> {
        Threshold::from_option(self.fuzzy_match_threshold)
    }

    /// Set and validate a new threshold
    pub fn set_fuzzy_threshold(&mut self, threshold: f64) -> AddrResult<()> {
        let threshold = Threshold::new(threshold)?;
        self.fuzzy_match_threshold = Some(threshold.value());
        Ok(())
    }

    /// Engine settings, with an optional threshold override from the caller
    pub fn match_settings(&self, threshold_override: Option<f64>) -> MatchSettings {
        MatchSettings {
            threshold: threshold_override.or(self.fuzzy_match_threshold),
            parallel: self.parallel,
            max_pairs: self.max_pairs,
            pair_warning_level: self.pair_warning_level,
            cancel: None,
        }
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> AddrResult<()> {
        if let Some(threshold) = self.fuzzy_match_threshold {
            Threshold::new(threshold)?;
        }
        if self.max_pairs == Some(0) {
            return Err(MatchError::Config("max_pairs must be greater than zero".into()));
        }
        Ok(())
    }
}

/// `$ADDRMATCH_CONFIG`, else `<config dir>/addrmatch/config.json`
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    config_dir().join("config.json")
}

/// Directory holding the config file and audit log
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("addrmatch")
}

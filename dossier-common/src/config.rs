//! Configuration loading and resolution
//!
//! Resolution priority for the config file:
//! 1. Command-line argument (highest priority)
//! 2. `DOSSIER_CONFIG` environment variable
//! 3. Platform config file (`<config_dir>/dossier/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! Individual values can additionally be overridden through the environment
//! (`DOSSIER_MAX_UPLOAD_BYTES`). A missing or unreadable file never aborts
//! startup; it is logged and the compiled defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "DOSSIER_CONFIG";

/// Environment variable overriding `intake.max_upload_bytes`
pub const MAX_UPLOAD_BYTES_ENV: &str = "DOSSIER_MAX_UPLOAD_BYTES";

/// Default upload size limit (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Complete TOML configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub logging: LoggingConfig,
    pub intake: IntakeSettings,
    pub review: ReviewSettings,
}

/// Logging section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. "info" or "dossier_intake=debug"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Upload intake section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeSettings {
    /// Largest accepted upload in bytes
    pub max_upload_bytes: u64,
    /// Lowest valid attachment number
    pub min_slot: u8,
    /// Highest valid attachment number
    pub max_slot: u8,
    /// Attachment numbers that must be covered before submission
    pub required_slots: Vec<u8>,
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            min_slot: 1,
            max_slot: 6,
            required_slots: Vec::new(),
        }
    }
}

/// Review section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSettings {
    /// Fields without parser/AI signal; only manual vs. document is compared
    pub manual_only_fields: Vec<String>,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            manual_only_fields: vec![
                "einsatz_bei_telefonica".to_string(),
                "zur_lv_kontrolle".to_string(),
            ],
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Reject values the intake and review code cannot work with
    pub fn validate(&self) -> Result<()> {
        let intake = &self.intake;
        if intake.max_upload_bytes == 0 {
            return Err(Error::Config(
                "intake.max_upload_bytes must be greater than 0".to_string(),
            ));
        }
        // Filenames carry a single digit, so 9 is the hard ceiling
        if intake.min_slot == 0 || intake.max_slot > 9 || intake.min_slot > intake.max_slot {
            return Err(Error::Config(format!(
                "invalid slot range {}-{} (must lie within 1-9)",
                intake.min_slot, intake.max_slot
            )));
        }
        if let Some(bad) = intake
            .required_slots
            .iter()
            .find(|s| **s < intake.min_slot || **s > intake.max_slot)
        {
            return Err(Error::Config(format!(
                "required slot {} outside range {}-{}",
                bad, intake.min_slot, intake.max_slot
            )));
        }
        Ok(())
    }

    /// Apply environment overrides on top of file values
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var(MAX_UPLOAD_BYTES_ENV) {
            let bytes: u64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be an integer, got {:?}", MAX_UPLOAD_BYTES_ENV, raw))
            })?;
            debug!("max_upload_bytes overridden from environment: {}", bytes);
            self.intake.max_upload_bytes = bytes;
        }
        self.validate()
    }
}

/// Resolves which config file to load and produces the effective configuration
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Config file location after applying the priority order, if any exists
    pub fn config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.cli_path {
            return Some(path.clone());
        }

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        default_config_file().filter(|p| p.exists())
    }

    /// Load the effective configuration
    ///
    /// An explicitly named file (CLI or ENV) that cannot be parsed is an
    /// error. Anything else falls back to defaults with a warning.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let explicit = self.cli_path.is_some()
            || std::env::var(CONFIG_PATH_ENV).is_ok_and(|p| !p.trim().is_empty());

        let mut config = match self.config_path() {
            Some(path) => match TomlConfig::load(&path) {
                Ok(config) => {
                    info!("Configuration loaded from {}", path.display());
                    config
                }
                Err(e) if explicit => return Err(e),
                Err(e) => {
                    warn!("{} - using compiled defaults", e);
                    TomlConfig::default()
                }
            },
            None => {
                debug!("No config file found, using compiled defaults");
                TomlConfig::default()
            }
        };

        config.apply_env_overrides()?;
        Ok(config)
    }
}

/// Platform config file path (`~/.config/dossier/config.toml` on Linux)
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dossier").join("config.toml"))
}

//! Configuration resolution for dossier-intake
//!
//! Priority: CLI → ENV → TOML → compiled defaults. The file-level part is
//! handled by [`ConfigResolver`]; command-line value overrides are applied
//! here on top.

use crate::review::ReviewEngine;
use crate::services::IntakeValidator;
use dossier_common::config::ConfigResolver;
use dossier_common::{Error, Result, TomlConfig};
use std::path::PathBuf;
use tracing::info;

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub max_upload_bytes: Option<u64>,
}

/// Resolve the effective configuration
pub fn resolve_config(overrides: &CliOverrides) -> Result<TomlConfig> {
    let mut config = ConfigResolver::new(overrides.config_path.clone()).resolve()?;

    if let Some(bytes) = overrides.max_upload_bytes {
        if bytes == 0 {
            return Err(Error::Config("--max-upload-bytes must be greater than 0".to_string()));
        }
        info!("max_upload_bytes set from command line: {}", bytes);
        config.intake.max_upload_bytes = bytes;
    }

    Ok(config)
}

/// Intake validator configured from `[intake]`
pub fn build_validator(config: &TomlConfig) -> IntakeValidator {
    IntakeValidator::from_settings(&config.intake)
}

/// Review engine configured from `[review]`
pub fn build_review_engine(config: &TomlConfig) -> ReviewEngine {
    ReviewEngine::from_settings(&config.review)
}

//! # Dossier Common Library
//!
//! Shared code for the Dossier crates:
//! - Error type and result alias
//! - TOML configuration model and resolution

pub mod config;
pub mod error;

pub use config::{IntakeSettings, LoggingConfig, ReviewSettings, TomlConfig};
pub use error::{Error, Result};

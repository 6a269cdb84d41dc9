//! Error type shared by the dossier crates

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file unreadable, malformed or out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// Path or value supplied by the caller is unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

//! Error types for SlotReel

use thiserror::Error;

/// Core error type
///
/// Only configuration loading and trace (de)serialization can fail.
/// The spin core recovers every anomaly locally.
#[derive(Error, Debug)]
pub enum SrError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias
pub type SrResult<T> = Result<T, SrError>;

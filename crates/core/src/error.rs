//! Error types for the omniscience system.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that can leave a library call.
///
/// Feed and splits parsing never produce these: a bad block stays local to
/// the parse report that skipped it.
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value outside its allowed range.
    #[error("invalid config: {0}")]
    Config(String),

    /// An analysis request the recorded history cannot answer.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration document.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub fn insufficient_data(msg: impl Into<String>) -> Self {
        Error::InsufficientData(msg.into())
    }
}

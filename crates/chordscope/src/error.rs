use std::path::PathBuf;
use thiserror::Error;

/// Errors at the edges of the engine.
///
/// Musical input never produces one of these: unknown notes and malformed
/// keys degrade to `"?"` labels instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read analysis result {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid analysis result JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid key '{0}': expected \"<Root> <Major|Minor>\"")]
    InvalidKey(String),

    #[error("Invalid selection '{0}': expected CHORD=KEY")]
    InvalidSelection(String),
}

pub type Result<T> = std::result::Result<T, Error>;

use std::result::Result as StdResult;

use thiserror::Error;

use crate::core::services::ServiceError;

/// Unified error type for the domain, storage and configuration layers.
#[derive(Error, Debug)]
pub enum WishError {
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Invalid document: {0}")]
    Document(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Export error: {0}")]
    ExportError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub type Result<T> = StdResult<T, WishError>;

impl WishError {
    /// Structural document error located at `path` (for example `wishlist[2].items[0].cost`).
    pub fn document(path: impl AsRef<str>, message: impl AsRef<str>) -> Self {
        WishError::Document(format!("{}: {}", path.as_ref(), message.as_ref()))
    }
}

impl From<std::io::Error> for WishError {
    fn from(err: std::io::Error) -> Self {
        WishError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for WishError {
    fn from(err: serde_json::Error) -> Self {
        WishError::Document(err.to_string())
    }
}

impl From<csv::Error> for WishError {
    fn from(err: csv::Error) -> Self {
        WishError::ExportError(err.to_string())
    }
}

//! Error types for the document model

use thiserror::Error;

/// Errors raised by the document model when a caller passes an argument
/// it should never have produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A media location code other than Local (0) or Internet (1)
    #[error("media source location {0} is neither LOCAL (0) nor INTERNET (1)")]
    InvalidLocation(i32),
}

/// Errors raised by the post store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid post filename: {0:?}")]
    InvalidFilename(String),
}

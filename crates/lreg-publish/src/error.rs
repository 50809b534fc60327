//! Error types for publication.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from a key-value cache backend.
#[derive(Debug, Error)]
pub enum KvError {
    /// The cache could not be reached at all.
    #[error("cache unreachable: {0}")]
    Unreachable(String),

    /// I/O error in a file-backed cache.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// No cache backend was configured.
    #[error("no cache configured")]
    NotConfigured,
}

impl KvError {
    /// Whether another attempt could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unreachable(_) | Self::Io(_))
    }
}

/// Errors from loading publication settings.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("cannot read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(String),
}

/// Convenience type alias for cache operations.
pub type Result<T> = std::result::Result<T, KvError>;

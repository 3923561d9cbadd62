//! Error types for the persistence crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during persistence operations.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Failed to write a file.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The path being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a file.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The path being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to create a directory.
    #[error("failed to create directory {path}: {source}")]
    Directory {
        /// The directory path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Serialization or deserialization failure.
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// Result type for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

//! Error types for pakprune

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pakprune operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Manifest not found: {}", path.display())]
    ManifestNotFound { path: PathBuf },

    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    #[error("Failed to replace {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Entry escapes the extraction directory: {0}")]
    UnsafeEntryPath(String),
}

/// Result type alias for pakprune operations
pub type Result<T> = std::result::Result<T, Error>;

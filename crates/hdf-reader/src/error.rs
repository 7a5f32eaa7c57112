//! Error types for container access.

use thiserror::Error;

/// Errors that can occur while reading a container.
#[derive(Error, Debug)]
pub enum HdfReaderError {
    /// Failed to open the container file.
    #[error("failed to open container: {0}")]
    OpenFailed(String),

    /// No dataset at the given path.
    #[error("dataset not found: {0}")]
    DatasetNotFound(String),

    /// The dataset exists but has no attribute with that name.
    #[error("attribute {name:?} not found on dataset {path:?}")]
    AttributeNotFound { path: String, name: String },

    /// The dataset is not of the requested kind (numeric vs text).
    #[error("dataset {path:?} is not {expected}")]
    WrongKind { path: String, expected: &'static str },

    /// Underlying read failure.
    #[error("failed to read {0}: {1}")]
    ReadFailed(String, String),
}

/// Result type for container operations.
pub type Result<T> = std::result::Result<T, HdfReaderError>;

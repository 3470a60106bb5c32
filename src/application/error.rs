//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add file-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("{dir} must contain a {file} file")]
    MetaNotFound { dir: PathBuf, file: String },

    #[error("invalid metadata in {path}")]
    InvalidMeta {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("test file not found: {0}")]
    TestFileNotFound(PathBuf),

    #[error("cannot create output file: {path}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

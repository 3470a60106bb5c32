//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::exitcode;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Errors that should be reported through the argument parser.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            CliError::Usage(_)
                | CliError::Application(ApplicationError::NotADirectory(_))
                | CliError::Application(ApplicationError::MetaNotFound { .. })
        )
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::NotADirectory(_) | ApplicationError::MetaNotFound { .. } => {
                    exitcode::USAGE
                }
                ApplicationError::Domain(_) | ApplicationError::InvalidMeta { .. } => {
                    exitcode::DATAERR
                }
                ApplicationError::TestFileNotFound(_) => exitcode::NOINPUT,
                ApplicationError::CreateOutput { .. } => exitcode::CANTCREAT,
                ApplicationError::Config { .. } => exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => exitcode::IOERR,
            },
        }
    }
}

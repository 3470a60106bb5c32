//! Error conversion helpers for file I/O with path context.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// write_structure(&mut out, &structure)
    ///     .with_path_context("write structure", &input_path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;

    /// Opening a referenced test file: a missing file gets its own error.
    fn for_test_file(self, path: &Path) -> ApplicationResult<T>;

    /// Creating one of the output files.
    fn for_output_file(self, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }

    fn for_test_file(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ApplicationError::TestFileNotFound(path.to_path_buf()),
            _ => ApplicationError::OperationFailed {
                context: format!("read test file: {}", path.display()),
                source: Box::new(e),
            },
        })
    }

    fn for_output_file(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::CreateOutput {
            path: path.to_path_buf(),
            source,
        })
    }
}

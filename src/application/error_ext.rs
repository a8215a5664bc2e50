//! Error conversion helpers for report export
//!
//! Attaches the target path to I/O and serialization failures.

use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting fallible export steps to `ApplicationResult`.
pub trait ExportResultExt<T> {
    /// Wrap the error as `OperationFailed` naming the action and path.
    ///
    /// # Example
    /// ```ignore
    /// fs.write(&path, &content)
    ///     .with_path_context("write report", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T, E> ExportResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{} {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

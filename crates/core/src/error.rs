//! Error types for textfeat core functionality.

use thiserror::Error;

/// Main error type for textfeat core.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("File system error: {0}")]
    FileSystem(String),
    #[error("Data parsing error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
    /// Two featurizers emitted the same key under the `error` collision policy.
    #[error("Feature collision on key '{key}': '{incoming}' would overwrite '{kept}'")]
    Collision {
        /// Colliding feature name.
        key: String,
        /// Featurizer that produced the value already present.
        kept: String,
        /// Featurizer whose value was rejected.
        incoming: String,
    },
    #[error("External dependency error: {0}")]
    External(String),
}

/// Result type for textfeat core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Convenience trait for converting errors to core Error type
pub trait IntoCoreError<T> {
    /// Convert to core error with context
    fn with_context(self, context: &str) -> Result<T>;
}

impl<T, E> IntoCoreError<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context(self, context: &str) -> Result<T> {
        self.map_err(|e| Error::External(format!("{}: {}", context, e)))
    }
}

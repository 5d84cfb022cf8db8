//! Error types for CLI operations.

use textfeat_analysis::AnalysisError;
use thiserror::Error;

/// Main error type for CLI operations.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Feature extraction error.
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Core library error.
    #[error(transparent)]
    Core(#[from] textfeat_core::Error),

    /// Some input texts could not be featurized.
    #[error("{failed} of {total} texts failed to featurize")]
    Featurize {
        /// Texts that failed.
        failed: usize,
        /// Texts processed.
        total: usize,
    },

    /// Invalid argument error.
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

use thiserror::Error;

/// Errors that can occur during feature extraction.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Input a featurizer cannot work with (no root, cyclic parse, ...).
    #[error("Malformed input for '{featurizer}': {reason}")]
    MalformedInput {
        /// Featurizer that rejected the input.
        featurizer: String,
        /// Precondition that failed.
        reason: String,
    },
    /// Input that makes a formula divide by zero.
    #[error("Degenerate input for '{featurizer}': {reason}")]
    Degenerate {
        /// Featurizer that rejected the input.
        featurizer: String,
        /// Quantity that was zero.
        reason: String,
    },
    /// Failure inside a linguistic toolkit collaborator.
    #[error("Toolkit error: {0}")]
    Toolkit(String),
    /// A selected featurizer name is not registered.
    #[error("Unknown featurizer: {0}")]
    UnknownFeaturizer(String),
    /// A bundled or configured resource could not be read.
    #[error("Resource error in {resource}: {reason}")]
    Resource {
        /// Resource name or path.
        resource: String,
        /// What was wrong with it.
        reason: String,
    },
    /// I/O operation error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Core error (configuration, validation, collision).
    #[error(transparent)]
    Core(#[from] textfeat_core::Error),
}

impl AnalysisError {
    /// Create a malformed-input error.
    pub fn malformed(featurizer: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            featurizer: featurizer.into(),
            reason: reason.into(),
        }
    }

    /// Create a degenerate-input error.
    pub fn degenerate(featurizer: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Degenerate {
            featurizer: featurizer.into(),
            reason: reason.into(),
        }
    }

    /// Create a resource error.
    pub fn resource(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resource {
            resource: resource.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

//! Core types, errors, and configuration for textfeat.
//!
//! This crate holds the feature value and mapping types shared by every
//! featurizer, the merge operation used to combine them, and the
//! configuration that selects which featurizers run.

pub mod config;
pub mod constants;
pub mod error;
pub mod merge;
pub mod types;

// Re-exports for convenience
pub use config::TextfeatConfig;
pub use error::{Error, Result};
pub use merge::{Collision, CollisionPolicy, MergeReport};
pub use types::*;

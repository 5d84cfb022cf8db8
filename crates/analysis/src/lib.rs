//! Featurizers and feature combination for textfeat.
//!
//! This crate provides the linguistic toolkit the featurizers consume,
//! the featurizers themselves, and the combiner that merges their
//! outputs into one flat feature mapping per text.

#![deny(missing_docs, unsafe_code)]

/// Runs featurizers and merges their outputs.
pub mod combiner;

/// Text plus lazily computed annotations.
pub mod document;

/// Error types for analysis operations.
pub mod error;

/// Featurizers and the featurizer registry.
pub mod features;

/// Tokenizer, tagger, parser, and lexicon traits with built-in implementations.
pub mod nlp;

pub use combiner::{CombinedFeatures, Combiner};
pub use document::{Annotations, Document};
pub use error::{AnalysisError, AnalysisResult};
pub use features::{Featurizer, FeaturizerOptions, FeaturizerRegistry};
pub use nlp::Toolkit;

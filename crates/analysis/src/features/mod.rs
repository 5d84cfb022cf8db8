//! Featurizers and the registry that selects them by name.

mod lexical;
mod psycholinguistic;
mod readability;
mod sentiment;
mod syntax;

pub use lexical::{
    BigramFeaturizer, BinaryBowFeaturizer, ContentWordFeaturizer, CountBowFeaturizer,
    LengthFeaturizer, QuestionWordFeaturizer, QUESTION_WORDS,
};
pub use psycholinguistic::PsycholinguisticFeaturizer;
pub use readability::{count_syllables, ReadabilityFeaturizer};
pub use sentiment::{PolaritySentimentFeaturizer, SentenceSentimentFeaturizer};
pub use syntax::{PosCountFeaturizer, SyntacticDepthFeaturizer, TRACKED_TAGS};

use std::sync::Arc;
use textfeat_core::config::SentenceKeyStyle;
use textfeat_core::FeatureMapping;
use tracing::info;

use crate::document::Document;
use crate::error::{AnalysisError, AnalysisResult};
use crate::nlp::Toolkit;

/// Maps one text to a set of named features.
///
/// Implementations keep no state between calls and never look at another
/// featurizer's output.
pub trait Featurizer: Send + Sync {
    /// Registered name, used in configuration.
    fn name(&self) -> &str;

    /// One-line human readable summary.
    fn description(&self) -> &str;

    /// Compute features for `doc`.
    fn featurize(&self, doc: &Document<'_>) -> AnalysisResult<FeatureMapping>;

    /// Compute features for a bare text.
    fn featurize_text(&self, text: &str, toolkit: &Toolkit) -> AnalysisResult<FeatureMapping> {
        self.featurize(&Document::new(text, toolkit))
    }
}

/// Settings that change how built-in featurizers name their keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeaturizerOptions {
    /// Key style of per-sentence sentiment features.
    pub sentence_keys: SentenceKeyStyle,
}

/// Registry of available featurizers.
pub struct FeaturizerRegistry {
    featurizers: Vec<Arc<dyn Featurizer>>,
}

impl FeaturizerRegistry {
    /// Creates a new registry with the built-in featurizers.
    pub fn new() -> Self {
        Self::with_options(FeaturizerOptions::default())
    }

    /// Creates a registry whose built-ins use `options`.
    pub fn with_options(options: FeaturizerOptions) -> Self {
        let mut registry = Self {
            featurizers: Vec::new(),
        };
        registry.register_default_featurizers(options);
        registry
    }

    /// Creates a registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            featurizers: Vec::new(),
        }
    }

    fn register_default_featurizers(&mut self, options: FeaturizerOptions) {
        self.featurizers.push(Arc::new(BinaryBowFeaturizer::new()));
        self.featurizers.push(Arc::new(CountBowFeaturizer::new()));
        self.featurizers.push(Arc::new(LengthFeaturizer::new()));
        self.featurizers.push(Arc::new(ReadabilityFeaturizer::new()));
        self.featurizers.push(Arc::new(QuestionWordFeaturizer::new()));
        self.featurizers.push(Arc::new(PosCountFeaturizer::new()));
        self.featurizers.push(Arc::new(SyntacticDepthFeaturizer::new()));
        self.featurizers
            .push(Arc::new(SentenceSentimentFeaturizer::new(options.sentence_keys)));
        self.featurizers.push(Arc::new(PolaritySentimentFeaturizer::new()));
        self.featurizers.push(Arc::new(PsycholinguisticFeaturizer::new()));
        self.featurizers.push(Arc::new(ContentWordFeaturizer::new()));
        self.featurizers.push(Arc::new(BigramFeaturizer::new()));
    }

    /// Register a featurizer.
    ///
    /// A featurizer with the same name is replaced in place.
    pub fn register(&mut self, featurizer: Arc<dyn Featurizer>) {
        match self
            .featurizers
            .iter_mut()
            .find(|existing| existing.name() == featurizer.name())
        {
            Some(slot) => *slot = featurizer,
            None => self.featurizers.push(featurizer),
        }
    }

    /// Look up a featurizer by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Featurizer>> {
        self.featurizers
            .iter()
            .find(|featurizer| featurizer.name() == name)
            .cloned()
    }

    /// Resolve `names` in order.
    ///
    /// Fails on the first name that is not registered.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> AnalysisResult<Vec<Arc<dyn Featurizer>>> {
        let selected = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name)
                    .ok_or_else(|| AnalysisError::UnknownFeaturizer(name.to_string()))
            })
            .collect::<AnalysisResult<Vec<_>>>()?;

        info!(
            "Selected featurizers: {}",
            names
                .iter()
                .map(|n| n.as_ref())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(selected)
    }

    /// Returns all registered featurizers in registration order.
    pub fn featurizers(&self) -> &[Arc<dyn Featurizer>] {
        &self.featurizers
    }

    /// Returns all registered featurizer names.
    pub fn names(&self) -> Vec<String> {
        self.featurizers
            .iter()
            .map(|featurizer| featurizer.name().to_string())
            .collect()
    }

    /// Returns number of registered featurizers.
    pub fn count(&self) -> usize {
        self.featurizers.len()
    }
}

impl Default for FeaturizerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

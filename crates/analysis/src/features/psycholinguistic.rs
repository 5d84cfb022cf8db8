use textfeat_core::FeatureMapping;

use super::Featurizer;
use crate::document::Document;
use crate::error::AnalysisResult;

/// Per-category word counts from the toolkit's category dictionary.
#[derive(Debug, Clone, Default)]
pub struct PsycholinguisticFeaturizer;

impl PsycholinguisticFeaturizer {
    /// Create a new PsycholinguisticFeaturizer.
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for PsycholinguisticFeaturizer {
    fn name(&self) -> &str {
        "psycholinguistic"
    }

    fn description(&self) -> &str {
        "Counts of words per psycholinguistic category"
    }

    fn featurize(&self, doc: &Document<'_>) -> AnalysisResult<FeatureMapping> {
        let dictionary = doc.toolkit().categories();
        let mut features = FeatureMapping::new();
        for token in doc.lowercase_tokens()? {
            for category in dictionary.categories(&token) {
                features.increment(category);
            }
        }
        Ok(features)
    }
}

use textfeat_core::constants::SENT_LENGTH_KEY;
use textfeat_core::{FeatureMapping, FeatureValue};
use tracing::debug;

use super::syntax::TRACKED_TAGS;
use super::Featurizer;
use crate::document::Document;
use crate::error::AnalysisResult;

/// Interrogative words and auxiliaries counted by [`QuestionWordFeaturizer`].
pub const QUESTION_WORDS: [&str; 33] = [
    "what", "where", "when", "how", "why", "did", "do", "does", "have", "has", "am", "is", "are",
    "can", "could", "may", "would", "will", "should", "didn't", "don't", "doesn't", "haven't",
    "hasn't", "aren't", "isn't", "can't", "couldn't", "mayn't", "wouldn't", "won't", "shouldn't",
    "?",
];

const NEGATION_CLITIC: &str = "n't";

/// Presence of each lowercase token.
#[derive(Debug, Clone, Default)]
pub struct BinaryBowFeaturizer;

impl BinaryBowFeaturizer {
    /// Create a new BinaryBowFeaturizer.
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for BinaryBowFeaturizer {
    fn name(&self) -> &str {
        "bow_binary"
    }

    fn description(&self) -> &str {
        "1 for every distinct lowercase token"
    }

    fn featurize(&self, doc: &Document<'_>) -> AnalysisResult<FeatureMapping> {
        Ok(doc
            .lowercase_tokens()?
            .into_iter()
            .map(|token| (token, FeatureValue::Flag(true)))
            .collect())
    }
}

/// Occurrence count of each lowercase token.
#[derive(Debug, Clone, Default)]
pub struct CountBowFeaturizer;

impl CountBowFeaturizer {
    /// Create a new CountBowFeaturizer.
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for CountBowFeaturizer {
    fn name(&self) -> &str {
        "bow_count"
    }

    fn description(&self) -> &str {
        "Occurrence count of every lowercase token"
    }

    fn featurize(&self, doc: &Document<'_>) -> AnalysisResult<FeatureMapping> {
        let mut features = FeatureMapping::new();
        for token in doc.lowercase_tokens()? {
            features.increment(token);
        }
        Ok(features)
    }
}

/// Token count under `sent_length`.
#[derive(Debug, Clone, Default)]
pub struct LengthFeaturizer;

impl LengthFeaturizer {
    /// Create a new LengthFeaturizer.
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for LengthFeaturizer {
    fn name(&self) -> &str {
        "length"
    }

    fn description(&self) -> &str {
        "Number of tokens"
    }

    fn featurize(&self, doc: &Document<'_>) -> AnalysisResult<FeatureMapping> {
        let mut features = FeatureMapping::new();
        features.insert(SENT_LENGTH_KEY, doc.tokens()?.len() as u64);
        Ok(features)
    }
}

/// Counts of the fixed question words among the tokens.
///
/// A negation clitic split off by the tokenizer is glued back onto the
/// preceding token, so `did n't` counts as `didn't`.
#[derive(Debug, Clone, Default)]
pub struct QuestionWordFeaturizer;

impl QuestionWordFeaturizer {
    /// Create a new QuestionWordFeaturizer.
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for QuestionWordFeaturizer {
    fn name(&self) -> &str {
        "question_words"
    }

    fn description(&self) -> &str {
        "Counts of interrogative words, auxiliaries and '?'"
    }

    fn featurize(&self, doc: &Document<'_>) -> AnalysisResult<FeatureMapping> {
        let tokens = doc.lowercase_tokens()?;
        let mut features = FeatureMapping::new();
        let mut idx = 0;

        while idx < tokens.len() {
            let word = match tokens.get(idx + 1) {
                Some(next) if next == NEGATION_CLITIC => {
                    idx += 1;
                    format!("{}{}", tokens[idx - 1], NEGATION_CLITIC)
                }
                _ => tokens[idx].clone(),
            };
            idx += 1;

            if QUESTION_WORDS.contains(&word.as_str()) {
                features.increment(word);
            }
        }

        Ok(features)
    }
}

/// Lowercase counts of verbs and adjectives only.
#[derive(Debug, Clone, Default)]
pub struct ContentWordFeaturizer;

impl ContentWordFeaturizer {
    /// Create a new ContentWordFeaturizer.
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for ContentWordFeaturizer {
    fn name(&self) -> &str {
        "content_words"
    }

    fn description(&self) -> &str {
        "Bag of words restricted to verbs and adjectives"
    }

    fn featurize(&self, doc: &Document<'_>) -> AnalysisResult<FeatureMapping> {
        let mut features = FeatureMapping::new();
        for tagged in doc.tagged()? {
            if TRACKED_TAGS.contains(&tagged.tag.as_str()) {
                features.increment(tagged.token.to_lowercase());
            }
        }
        debug!("{} content words", features.len());
        Ok(features)
    }
}

/// Counts of adjacent token pairs.
#[derive(Debug, Clone, Default)]
pub struct BigramFeaturizer;

impl BigramFeaturizer {
    /// Create a new BigramFeaturizer.
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for BigramFeaturizer {
    fn name(&self) -> &str {
        "bigrams"
    }

    fn description(&self) -> &str {
        "Counts of adjacent token pairs joined by a space"
    }

    fn featurize(&self, doc: &Document<'_>) -> AnalysisResult<FeatureMapping> {
        let mut features = FeatureMapping::new();
        for pair in doc.tokens()?.windows(2) {
            features.increment(format!("{} {}", pair[0], pair[1]));
        }
        Ok(features)
    }
}

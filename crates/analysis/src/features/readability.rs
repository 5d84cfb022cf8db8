use once_cell::sync::Lazy;
use regex::Regex;
use textfeat_core::constants::FK_GRADE_KEY;
use textfeat_core::FeatureMapping;

use super::Featurizer;
use crate::document::Document;
use crate::error::{AnalysisError, AnalysisResult};

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("word regex"));
static VOWEL_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[aeiouyAEIOUY]+").expect("vowel regex"));

/// Number of maximal vowel runs in `word`.
pub fn count_syllables(word: &str) -> usize {
    VOWEL_RUN_RE.find_iter(word).count()
}

/// Flesch-Kincaid grade level under `fk_grade`.
///
/// Works on the raw text rather than the toolkit's tokens: words are
/// `\b\w+\b` matches and sentences are the non-blank pieces between
/// `.`, `!` and `?`.
#[derive(Debug, Clone, Default)]
pub struct ReadabilityFeaturizer;

impl ReadabilityFeaturizer {
    /// Create a new ReadabilityFeaturizer.
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for ReadabilityFeaturizer {
    fn name(&self) -> &str {
        "readability"
    }

    fn description(&self) -> &str {
        "Flesch-Kincaid grade level"
    }

    fn featurize(&self, doc: &Document<'_>) -> AnalysisResult<FeatureMapping> {
        let text = doc.text();

        let sentences = text
            .split(['.', '!', '?'])
            .filter(|s| !s.trim().is_empty())
            .count();
        if sentences == 0 {
            return Err(AnalysisError::degenerate(self.name(), "text has no sentences"));
        }

        let words: Vec<&str> = WORD_RE.find_iter(text).map(|m| m.as_str()).collect();
        if words.is_empty() {
            return Err(AnalysisError::degenerate(self.name(), "text has no words"));
        }

        let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();
        let words = words.len() as f64;
        let grade =
            0.39 * (words / sentences as f64) + 11.8 * (syllables as f64 / words) - 15.59;

        let mut features = FeatureMapping::new();
        features.insert(FK_GRADE_KEY, grade);
        Ok(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::Toolkit;

    fn grade(text: &str) -> AnalysisResult<f64> {
        let toolkit = Toolkit::with_defaults().expect("toolkit");
        let features = ReadabilityFeaturizer::new().featurize_text(text, &toolkit)?;
        Ok(features.get(FK_GRADE_KEY).map(|v| v.as_f64()).unwrap_or(f64::NAN))
    }

    #[test]
    fn syllables_are_vowel_runs() {
        assert_eq!(count_syllables("Cats"), 1);
        assert_eq!(count_syllables("beautiful"), 3);
        assert_eq!(count_syllables("rhythm"), 1);
        assert_eq!(count_syllables("nth"), 0);
        assert_eq!(count_syllables("AEIOU"), 1);
    }

    #[test]
    fn short_sentence_grade() {
        let value = grade("Cats sleep.").expect("grade");
        assert!((value - -3.01).abs() < 1e-9);
    }

    #[test]
    fn text_without_terminator_is_one_sentence() {
        let value = grade("Cats sleep").expect("grade");
        assert!((value - -3.01).abs() < 1e-9);
    }

    #[test]
    fn multiple_sentences_lower_grade() {
        let one = grade("The cat sat on the mat and the dog ran off").expect("grade");
        let two = grade("The cat sat on the mat. And the dog ran off.").expect("grade");
        assert!(two < one);
    }

    #[test]
    fn empty_or_wordless_text_is_degenerate() {
        for text in ["", "   ", "...?!"] {
            let err = grade(text).expect_err("no sentences");
            assert!(matches!(err, AnalysisError::Degenerate { .. }), "{}", text);
        }
        let err = grade("-- ;").expect_err("no words");
        assert!(err.to_string().contains("no words"));
    }
}

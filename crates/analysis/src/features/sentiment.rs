use textfeat_core::config::SentenceKeyStyle;
use textfeat_core::constants::SENTENCE_SENTIMENT_PREFIX;
use textfeat_core::FeatureMapping;

use super::Featurizer;
use crate::document::Document;
use crate::error::AnalysisResult;
use crate::nlp::PolarityScores;

/// Lexicon sentiment of every sentence, keyed by sentence index.
#[derive(Debug, Clone, Default)]
pub struct SentenceSentimentFeaturizer {
    keys: SentenceKeyStyle,
}

impl SentenceSentimentFeaturizer {
    /// Create a featurizer that names keys in `keys` style.
    pub fn new(keys: SentenceKeyStyle) -> Self {
        Self { keys }
    }

    fn key(&self, idx: usize) -> String {
        match self.keys {
            SentenceKeyStyle::Positional => idx.to_string(),
            SentenceKeyStyle::Namespaced => format!("{}{}", SENTENCE_SENTIMENT_PREFIX, idx),
        }
    }
}

impl Featurizer for SentenceSentimentFeaturizer {
    fn name(&self) -> &str {
        "sentiment_sentences"
    }

    fn description(&self) -> &str {
        "Lexicon sentiment score of each sentence"
    }

    fn featurize(&self, doc: &Document<'_>) -> AnalysisResult<FeatureMapping> {
        let scorer = doc.toolkit().sentiment();
        let mut features = FeatureMapping::new();
        for (idx, sentence) in doc.sentences()?.iter().enumerate() {
            features.insert(self.key(idx), scorer.score(sentence)?);
        }
        Ok(features)
    }
}

/// `pos`, `neg`, `neu` and `compound` summed over sentences.
#[derive(Debug, Clone, Default)]
pub struct PolaritySentimentFeaturizer;

impl PolaritySentimentFeaturizer {
    /// Create a new PolaritySentimentFeaturizer.
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for PolaritySentimentFeaturizer {
    fn name(&self) -> &str {
        "sentiment_polarity"
    }

    fn description(&self) -> &str {
        "Positive, negative, neutral and compound polarity summed over sentences"
    }

    fn featurize(&self, doc: &Document<'_>) -> AnalysisResult<FeatureMapping> {
        let scorer = doc.toolkit().polarity();
        let mut total = PolarityScores::default();
        for sentence in doc.sentences()? {
            let scores = scorer.polarity(sentence)?;
            total.pos += scores.pos;
            total.neg += scores.neg;
            total.neu += scores.neu;
            total.compound += scores.compound;
        }

        let mut features = FeatureMapping::new();
        features.insert("pos", total.pos);
        features.insert("neg", total.neg);
        features.insert("neu", total.neu);
        features.insert("compound", total.compound);
        Ok(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{Lexicon, Toolkit};
    use textfeat_core::FeatureValue;

    fn toolkit() -> Toolkit {
        let lexicon = Lexicon::parse("test", "love\t3\nhate\t-3\n").expect("lexicon");
        Toolkit::builder().lexicon(lexicon).build().expect("toolkit")
    }

    #[test]
    fn sentence_scores_use_positional_keys() {
        let features = SentenceSentimentFeaturizer::new(SentenceKeyStyle::Positional)
            .featurize_text("I love it. I hate it. Fine.", &toolkit())
            .expect("featurize");
        assert_eq!(features.keys().collect::<Vec<_>>(), vec!["0", "1", "2"]);
        assert_eq!(features.get("0"), Some(&FeatureValue::Score(3.0)));
        assert_eq!(features.get("1"), Some(&FeatureValue::Score(-3.0)));
        assert_eq!(features.get("2"), Some(&FeatureValue::Score(0.0)));
    }

    #[test]
    fn sentence_scores_can_be_namespaced() {
        let features = SentenceSentimentFeaturizer::new(SentenceKeyStyle::Namespaced)
            .featurize_text("I love it.", &toolkit())
            .expect("featurize");
        assert_eq!(
            features.get("sentiment_sentence_0"),
            Some(&FeatureValue::Score(3.0))
        );
        assert!(!features.contains_key("0"));
    }

    #[test]
    fn polarity_sums_over_sentences() {
        let toolkit = toolkit();
        let single = PolaritySentimentFeaturizer::new()
            .featurize_text("I love it.", &toolkit)
            .expect("featurize");
        let double = PolaritySentimentFeaturizer::new()
            .featurize_text("I love it. I love it.", &toolkit)
            .expect("featurize");

        for key in ["pos", "neg", "neu", "compound"] {
            let one = single.get(key).map(FeatureValue::as_f64).expect(key);
            let two = double.get(key).map(FeatureValue::as_f64).expect(key);
            assert!((two - 2.0 * one).abs() < 1e-9, "{}", key);
        }
        assert!(single.get("compound").map(FeatureValue::as_f64).unwrap_or(0.0) > 0.0);
    }

    #[test]
    fn polarity_of_empty_text_is_all_zero() {
        let features = PolaritySentimentFeaturizer::new()
            .featurize_text("", &toolkit())
            .expect("featurize");
        assert_eq!(features.len(), 4);
        assert!(features.iter().all(|(_, v)| v.as_f64() == 0.0));
    }
}

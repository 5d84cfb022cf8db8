use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::{PolarityScorer, PolarityScores, SentimentScorer};
use crate::error::{AnalysisError, AnalysisResult};

const BUNDLED_LEXICON: &str = include_str!("../../resources/sentiment_lexicon.tsv");

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]+(?:'[a-z]+)?").expect("word regex"));

/// Word valences on the AFINN scale (-5 to 5).
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
}

impl Lexicon {
    /// Lexicon shipped with the crate.
    pub fn bundled() -> AnalysisResult<Self> {
        Self::parse("bundled sentiment lexicon", BUNDLED_LEXICON)
    }

    /// Load a lexicon file: one `word<TAB>score` per line, `#` comments.
    pub fn from_path(path: &Path) -> AnalysisResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(path.display().to_string(), &content)
    }

    /// Parse lexicon text; `name` is used in error messages.
    pub fn parse(name: impl Into<String>, content: &str) -> AnalysisResult<Self> {
        let name = name.into();
        let mut valences = HashMap::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (word, score) = line
                .rsplit_once(|c: char| c.is_whitespace())
                .ok_or_else(|| {
                    AnalysisError::resource(&name, format!("line {}: missing score", idx + 1))
                })?;
            let score: f64 = score.parse().map_err(|_| {
                AnalysisError::resource(&name, format!("line {}: invalid score '{}'", idx + 1, score))
            })?;

            valences.insert(word.trim().to_lowercase(), score);
        }

        Ok(Self { valences })
    }

    /// Add or replace a word's valence.
    pub fn insert(&mut self, word: impl Into<String>, valence: f64) {
        self.valences.insert(word.into().to_lowercase(), valence);
    }

    /// Valence of a lowercase word.
    pub fn get(&self, word: &str) -> Option<f64> {
        self.valences.get(word).copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.valences.len()
    }

    /// Whether the lexicon has no entries.
    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

fn words(sentence: &str) -> Vec<String> {
    let lower = sentence.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Additive lexicon scorer: the sentence score is the sum of word valences.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: Arc<Lexicon>,
}

impl LexiconScorer {
    /// Create a scorer over `lexicon`.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, sentence: &str) -> AnalysisResult<f64> {
        Ok(words(sentence)
            .iter()
            .filter_map(|word| self.lexicon.get(word))
            .fold(0.0, |total, valence| total + valence))
    }
}

const NEGATIONS: [&str; 12] = [
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "nowhere", "cannot",
    "without", "hardly",
];

const BOOSTERS: [&str; 14] = [
    "very", "really", "extremely", "so", "totally", "absolutely", "completely", "incredibly",
    "especially", "highly", "most", "quite", "truly", "deeply",
];

const DAMPENERS: [&str; 6] = ["slightly", "somewhat", "barely", "kinda", "sorta", "marginally"];

/// Rescales AFINN valences onto the narrower polarity scale.
const VALENCE_SCALE: f64 = 0.8;
const BOOST_INCREMENT: f64 = 0.293;
const NEGATION_FACTOR: f64 = -0.74;
const EXCLAMATION_INCREMENT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const NORMALIZATION_ALPHA: f64 = 15.0;

/// Rule-based polarity scorer in the style of VADER.
///
/// Word valences are boosted or dampened by a preceding intensifier and
/// flipped by a negation in the three preceding words. Exclamation marks
/// amplify the dominant direction. `compound` is the normalized sum
/// `s / sqrt(s^2 + 15)`; `pos`, `neg` and `neu` are shares of the
/// sentence and add up to 1 (up to rounding).
#[derive(Debug, Clone)]
pub struct PolarityAnalyzer {
    lexicon: Arc<Lexicon>,
}

impl PolarityAnalyzer {
    /// Create an analyzer over `lexicon`.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    fn valence_at(&self, words: &[String], idx: usize) -> f64 {
        let Some(base) = self.lexicon.get(&words[idx]) else {
            return 0.0;
        };
        let mut valence = base * VALENCE_SCALE;
        if valence == 0.0 {
            return 0.0;
        }

        if let Some(prev) = idx.checked_sub(1).map(|i| words[i].as_str()) {
            if BOOSTERS.contains(&prev) {
                valence += BOOST_INCREMENT * valence.signum();
            } else if DAMPENERS.contains(&prev) {
                valence -= BOOST_INCREMENT * valence.signum();
            }
        }

        let window = &words[idx.saturating_sub(3)..idx];
        if window.iter().any(|w| is_negation(w)) {
            valence *= NEGATION_FACTOR;
        }

        valence
    }
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.ends_with("n't")
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

impl PolarityScorer for PolarityAnalyzer {
    fn polarity(&self, sentence: &str) -> AnalysisResult<PolarityScores> {
        let words = words(sentence);
        if words.is_empty() {
            return Ok(PolarityScores::default());
        }

        let valences: Vec<f64> = (0..words.len()).map(|i| self.valence_at(&words, i)).collect();
        let mut sum = valences.iter().fold(0.0, |total, v| total + v);

        let exclamations = sentence.matches('!').count().min(MAX_EXCLAMATIONS);
        let emphasis = exclamations as f64 * EXCLAMATION_INCREMENT;
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }

        let compound = (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0);

        let mut positive = 0.0;
        let mut negative = 0.0;
        let mut neutral = 0.0;
        for &v in &valences {
            if v > 0.0 {
                positive += v + 1.0;
            } else if v < 0.0 {
                negative += v - 1.0;
            } else {
                neutral += 1.0;
            }
        }
        if positive > negative.abs() {
            positive += emphasis;
        } else if positive < negative.abs() {
            negative -= emphasis;
        }

        let total = positive + negative.abs() + neutral;
        Ok(PolarityScores {
            pos: round_to(positive / total, 3),
            neg: round_to(negative.abs() / total, 3),
            neu: round_to(neutral / total, 3),
            compound: round_to(compound, 4),
        })
    }
}

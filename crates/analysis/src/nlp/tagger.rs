use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::{PosTagger, TaggedToken};
use crate::error::AnalysisResult;

/// Closed-class words and frequent open-class words with fixed tags.
static LEXICON: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let groups: &[(&str, &[&str])] = &[
        (
            "DT",
            &[
                "the", "a", "an", "this", "that", "these", "those", "every", "each", "some",
                "any", "no", "all", "both", "another", "either", "neither",
            ],
        ),
        (
            "IN",
            &[
                "of", "in", "on", "at", "by", "for", "with", "about", "against", "between",
                "into", "through", "during", "before", "after", "above", "below", "from", "up",
                "down", "over", "under", "than", "as", "since", "until", "while", "because",
                "although", "though", "if", "whether", "upon", "within", "without", "toward",
                "towards", "across", "behind", "beyond", "near", "like",
            ],
        ),
        ("TO", &["to"]),
        ("CC", &["and", "or", "but", "nor", "yet"]),
        (
            "PRP",
            &[
                "i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them",
                "myself", "yourself", "himself", "herself", "itself", "ourselves",
                "themselves",
            ],
        ),
        ("PRP$", &["my", "your", "his", "her", "its", "our", "their"]),
        ("WP", &["what", "who", "whom"]),
        ("WP$", &["whose"]),
        ("WDT", &["which"]),
        ("WRB", &["where", "when", "how", "why"]),
        ("EX", &["there"]),
        (
            "MD",
            &[
                "can", "could", "may", "might", "must", "shall", "should", "will", "would",
                "ca", "wo", "'ll", "'d",
            ],
        ),
        (
            "RB",
            &[
                "not", "n't", "very", "too", "also", "just", "only", "then", "here", "now",
                "never", "always", "often", "really", "quite", "well", "still", "already",
                "even", "so", "again", "ever", "almost", "soon",
            ],
        ),
        ("VB", &["be"]),
        ("VBP", &["am", "are", "'m", "'re", "'ve"]),
        ("VBZ", &["is", "'s", "does", "has", "goes"]),
        (
            "VBD",
            &[
                "was", "were", "did", "had", "went", "got", "made", "took", "knew", "thought",
                "saw", "came", "gave", "found", "said", "told", "became", "meant", "ate",
                "ran", "wrote", "began", "felt", "kept", "left", "brought", "bought",
            ],
        ),
        (
            "VBN",
            &[
                "been", "done", "gone", "taken", "known", "seen", "given", "eaten", "written",
                "begun",
            ],
        ),
        ("VBG", &["being", "doing", "having"]),
        (
            "VB",
            &[
                "do", "have", "go", "get", "make", "take", "know", "think", "see", "come",
                "give", "find", "say", "tell", "become", "mean", "sleep", "eat", "run",
                "write", "begin", "feel", "keep", "leave", "put", "bring", "buy", "want",
                "need", "like", "use", "work", "call", "try", "ask", "live", "help", "play",
            ],
        ),
        (
            "JJ",
            &[
                "good", "bad", "new", "old", "great", "big", "small", "large", "long",
                "little", "high", "low", "happy", "sad", "important", "different", "same",
                "real", "easy", "hard", "right", "wrong", "free", "full", "sure", "possible",
                "true", "false", "first", "last", "many", "few", "other", "own", "young",
                "early", "late", "best-known",
            ],
        ),
        ("JJR", &["better", "worse", "more", "less", "bigger", "smaller", "larger"]),
        ("JJS", &["best", "worst", "most", "least", "biggest", "smallest", "largest"]),
    ];

    let mut lexicon = HashMap::new();
    for (tag, words) in groups {
        for word in words.iter() {
            lexicon.entry(*word).or_insert(*tag);
        }
    }
    lexicon
});

const ADJECTIVE_SUFFIXES: [&str; 7] = ["ous", "ful", "ive", "able", "ible", "less", "ical"];

const PLURAL_PRONOUNS: [&str; 4] = ["i", "you", "we", "they"];

/// Lexicon lookup with suffix and context rules for unknown words.
///
/// Produces Penn Treebank tags. Accurate enough for counting verb and
/// adjective classes in short questions; not a statistical tagger.
#[derive(Debug, Clone, Default)]
pub struct LexiconTagger;

impl LexiconTagger {
    /// Create a new LexiconTagger.
    pub fn new() -> Self {
        Self
    }

    fn tag_one(&self, tokens: &[String], tags: &[&'static str], idx: usize) -> &'static str {
        let token = tokens[idx].as_str();
        let lower = token.to_lowercase();
        let prev_tag = idx.checked_sub(1).map(|i| tags[i]);
        let prev_word = idx.checked_sub(1).map(|i| tokens[i].to_lowercase());

        if let Some(tag) = punctuation_tag(token) {
            return tag;
        }

        if let Some(&tag) = LEXICON.get(lower.as_str()) {
            return match tag {
                "VB" => base_verb_tag(tokens, tags, idx),
                _ => tag,
            };
        }

        if lower.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
            && lower.chars().any(|c| c.is_ascii_digit())
        {
            return "CD";
        }

        let after_determiner = matches!(prev_tag, Some("DT" | "PRP$" | "JJ" | "JJR" | "JJS"));

        if lower.len() > 4 && lower.ends_with("ing") {
            return if after_determiner { "NN" } else { "VBG" };
        }
        if lower.len() > 3 && lower.ends_with("ed") {
            return if follows_perfect_or_passive(tokens, idx) {
                "VBN"
            } else if after_determiner {
                "JJ"
            } else {
                "VBD"
            };
        }
        if lower.len() > 3 && lower.ends_with("ly") {
            return "RB";
        }
        if lower.len() > 4 && lower.ends_with("est") {
            return "JJS";
        }
        if ADJECTIVE_SUFFIXES
            .iter()
            .any(|suffix| lower.len() > suffix.len() + 2 && lower.ends_with(suffix))
        {
            return "JJ";
        }

        let capitalized = token.chars().next().map_or(false, char::is_uppercase);
        if capitalized && idx > 0 && prev_tag != Some(".") {
            return "NNP";
        }

        if matches!(prev_tag, Some("MD" | "TO")) {
            return "VB";
        }

        if lower.len() > 3 && lower.ends_with('s') && !lower.ends_with("ss") {
            let singular_subject = match (prev_tag, prev_word.as_deref()) {
                (Some("PRP"), Some(word)) => !PLURAL_PRONOUNS.contains(&word),
                (Some("NN" | "NNP"), _) => true,
                _ => false,
            };
            return if singular_subject { "VBZ" } else { "NNS" };
        }

        if let (Some("PRP"), Some(word)) = (prev_tag, prev_word.as_deref()) {
            if PLURAL_PRONOUNS.contains(&word) {
                return "VBP";
            }
        }

        "NN"
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, tokens: &[String]) -> AnalysisResult<Vec<TaggedToken>> {
        let mut tags: Vec<&'static str> = Vec::with_capacity(tokens.len());
        for idx in 0..tokens.len() {
            let tag = self.tag_one(tokens, &tags, idx);
            tags.push(tag);
        }

        Ok(tokens
            .iter()
            .zip(tags)
            .map(|(token, tag)| TaggedToken::new(token.clone(), tag))
            .collect())
    }
}

fn punctuation_tag(token: &str) -> Option<&'static str> {
    match token {
        "." | "!" | "?" => Some("."),
        "," => Some(","),
        ":" | ";" | "..." | "--" | "-" => Some(":"),
        "(" | "[" | "{" => Some("("),
        ")" | "]" | "}" => Some(")"),
        "\"" | "'" | "`" => Some("''"),
        "$" => Some("$"),
        "#" => Some("#"),
        _ if !token.chars().any(char::is_alphanumeric) => Some("SYM"),
        _ => None,
    }
}

/// Base-form verbs are `VB` after a modal, `to`, or `do`-support and `VBP`
/// after a plural or first/second person subject.
fn base_verb_tag(tokens: &[String], tags: &[&'static str], idx: usize) -> &'static str {
    let start = idx.saturating_sub(4);
    for back in (start..idx).rev() {
        let word = tokens[back].to_lowercase();
        if matches!(tags[back], "MD" | "TO") || matches!(word.as_str(), "do" | "does" | "did") {
            return "VB";
        }
        if tags[back].starts_with("VB") || tags[back] == "." {
            break;
        }
    }

    match idx.checked_sub(1).map(|i| (tags[i], tokens[i].to_lowercase())) {
        Some(("PRP", word)) if PLURAL_PRONOUNS.contains(&word.as_str()) => "VBP",
        Some(("NNS", _)) => "VBP",
        Some(("PRP" | "NN" | "NNP", _)) => "VBZ",
        _ => "VB",
    }
}

fn follows_perfect_or_passive(tokens: &[String], idx: usize) -> bool {
    let start = idx.saturating_sub(2);
    tokens[start..idx].iter().any(|token| {
        matches!(
            token.to_lowercase().as_str(),
            "have" | "has" | "had" | "'ve" | "is" | "are" | "was" | "were" | "be" | "been"
                | "being" | "'s" | "'re" | "am" | "'m"
        )
    })
}

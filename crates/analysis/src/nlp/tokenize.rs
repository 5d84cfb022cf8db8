use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::{SentenceSplitter, Tokenizer};
use crate::error::AnalysisResult;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\w+(?:[-'.]\w+)*|\.\.\.|--|[^\w\s]").expect("token regex")
});

const CLITICS: [&str; 6] = ["s", "m", "d", "ll", "re", "ve"];

/// Penn Treebank style word tokenizer.
///
/// Punctuation becomes its own token and clitics are split off:
/// `didn't` gives `did` + `n't`, `it's` gives `it` + `'s`.
#[derive(Debug, Clone, Default)]
pub struct TreebankTokenizer;

impl TreebankTokenizer {
    /// Create a new TreebankTokenizer.
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for TreebankTokenizer {
    fn tokenize(&self, text: &str) -> AnalysisResult<Vec<String>> {
        let mut tokens = Vec::new();
        for m in TOKEN_RE.find_iter(text) {
            split_clitic(m.as_str(), &mut tokens);
        }
        Ok(tokens)
    }
}

fn split_clitic(word: &str, out: &mut Vec<String>) {
    let lower = word.to_lowercase();

    if lower.len() > 3 && lower.ends_with("n't") {
        let cut = word.len() - 3;
        out.push(word[..cut].to_string());
        out.push(word[cut..].to_string());
        return;
    }

    if let Some(pos) = word.rfind('\'') {
        let suffix = word[pos + 1..].to_lowercase();
        if pos > 0 && CLITICS.contains(&suffix.as_str()) {
            out.push(word[..pos].to_string());
            out.push(word[pos..].to_string());
            return;
        }
    }

    out.push(word.to_string());
}

static ABBREVIATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "inc",
        "ltd", "co", "no", "fig", "approx",
    ]
    .into_iter()
    .collect()
});

/// Splits after runs of `.`, `!`, `?` that are followed by whitespace.
///
/// A period ending a known abbreviation (`Dr.`, `e.g.`) does not end a
/// sentence.
#[derive(Debug, Clone, Default)]
pub struct TerminatorSplitter;

impl TerminatorSplitter {
    /// Create a new TerminatorSplitter.
    pub fn new() -> Self {
        Self
    }
}

impl SentenceSplitter for TerminatorSplitter {
    fn split(&self, text: &str) -> AnalysisResult<Vec<String>> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices().peekable();

        while let Some((idx, ch)) = chars.next() {
            if !matches!(ch, '.' | '!' | '?') {
                continue;
            }

            let mut end = idx + ch.len_utf8();
            while let Some(&(next_idx, next)) = chars.peek() {
                if matches!(next, '.' | '!' | '?' | '"' | '\'' | ')') {
                    end = next_idx + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }

            let at_boundary = chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
            if !at_boundary || (ch == '.' && ends_with_abbreviation(&text[start..idx])) {
                continue;
            }

            push_sentence(&text[start..end], &mut sentences);
            start = end;
        }

        push_sentence(&text[start..], &mut sentences);
        Ok(sentences)
    }
}

fn ends_with_abbreviation(prefix: &str) -> bool {
    prefix
        .split_whitespace()
        .last()
        .map(|word| ABBREVIATIONS.contains(word.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn push_sentence(raw: &str, out: &mut Vec<String>) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

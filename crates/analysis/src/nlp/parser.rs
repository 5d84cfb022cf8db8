use std::sync::Arc;

use super::{
    DependencyParser, DependencyTree, PosTagger, SentenceSplitter, TaggedToken, Tokenizer,
    ROOT_RELATION,
};
use crate::error::AnalysisResult;

const AUXILIARIES: [&str; 17] = [
    "be", "am", "is", "are", "was", "were", "been", "being", "do", "does", "did", "have", "has",
    "had", "'s", "'re", "'m",
];

/// Rule-based dependency parser driven by part-of-speech tags.
///
/// Each sentence gets one ROOT: its first main verb, else its first
/// auxiliary or modal, else its first noun, else its first token.
/// Determiners and adjectives attach to the following noun, prepositions
/// to the preceding noun or verb, prepositional objects to their
/// preposition, and everything else to the root.
pub struct HeuristicParser {
    tokenizer: Arc<dyn Tokenizer>,
    splitter: Arc<dyn SentenceSplitter>,
    tagger: Arc<dyn PosTagger>,
}

impl HeuristicParser {
    /// Create a parser on top of the given collaborators.
    pub fn new(
        tokenizer: Arc<dyn Tokenizer>,
        splitter: Arc<dyn SentenceSplitter>,
        tagger: Arc<dyn PosTagger>,
    ) -> Self {
        Self {
            tokenizer,
            splitter,
            tagger,
        }
    }
}

impl DependencyParser for HeuristicParser {
    fn parse(&self, text: &str) -> AnalysisResult<DependencyTree> {
        let mut entries = Vec::new();

        for sentence in self.splitter.split(text)? {
            let tokens = self.tokenizer.tokenize(&sentence)?;
            if tokens.is_empty() {
                continue;
            }
            let tagged = self.tagger.tag(&tokens)?;
            let offset = entries.len();

            for (idx, (relation, head)) in attach_sentence(&tagged).into_iter().enumerate() {
                let token = &tagged[idx];
                entries.push((
                    token.token.clone(),
                    token.tag.clone(),
                    relation.to_string(),
                    head.map(|h| h + offset),
                ));
            }
        }

        Ok(DependencyTree::from_heads(entries))
    }
}

fn is_noun(tag: &str) -> bool {
    tag.starts_with("NN") || matches!(tag, "PRP" | "WP" | "EX" | "CD")
}

fn is_verb(tag: &str) -> bool {
    tag.starts_with("VB") || tag == "MD"
}

fn is_modifier(tag: &str) -> bool {
    matches!(tag, "DT" | "PRP$" | "WP$" | "PDT" | "JJ" | "JJR" | "JJS" | "POS")
}

fn is_auxiliary(token: &TaggedToken) -> bool {
    token.tag == "MD" || AUXILIARIES.contains(&token.token.to_lowercase().as_str())
}

fn choose_root(tagged: &[TaggedToken]) -> usize {
    let verbs: Vec<usize> = (0..tagged.len())
        .filter(|&i| is_verb(&tagged[i].tag))
        .collect();

    verbs
        .iter()
        .copied()
        .find(|&i| !is_auxiliary(&tagged[i]))
        .or_else(|| verbs.first().copied())
        .or_else(|| (0..tagged.len()).find(|&i| is_noun(&tagged[i].tag)))
        .unwrap_or(0)
}

/// Relation and sentence-local head index for every token.
fn attach_sentence(tagged: &[TaggedToken]) -> Vec<(&'static str, Option<usize>)> {
    let root = choose_root(tagged);
    let tags: Vec<&str> = tagged.iter().map(|t| t.tag.as_str()).collect();

    (0..tagged.len())
        .map(|i| {
            if i == root {
                return (ROOT_RELATION, None);
            }
            let tag = tags[i];

            if is_modifier(tag) {
                return match next_noun(&tags, i) {
                    Some(noun) => (modifier_relation(tag), Some(noun)),
                    None => ("dep", Some(root)),
                };
            }

            if matches!(tag, "IN" | "TO") {
                let head = (0..i)
                    .rev()
                    .find(|&k| is_noun(tags[k]) || is_verb(tags[k]))
                    .unwrap_or(root);
                return ("prep", Some(head));
            }

            if tag.starts_with("NN") && i + 1 < tags.len() && tags[i + 1].starts_with("NN") {
                return ("compound", Some(i + 1));
            }

            if is_noun(tag) || tag == "WDT" {
                let mut k = i;
                while k > 0 && (is_modifier(tags[k - 1]) || tags[k - 1].starts_with("NN")) {
                    k -= 1;
                }
                if k > 0 && matches!(tags[k - 1], "IN" | "TO") {
                    return ("pobj", Some(k - 1));
                }
                return if i < root {
                    ("nsubj", Some(root))
                } else {
                    ("dobj", Some(root))
                };
            }

            if is_verb(tag) {
                return if i < root && is_auxiliary(&tagged[i]) {
                    ("aux", Some(root))
                } else {
                    ("xcomp", Some(root))
                };
            }

            match tag {
                "RB" | "WRB" | "RBR" | "RBS" => ("advmod", Some(root)),
                "CC" => ("cc", Some(root)),
                "." | "," | ":" | "(" | ")" | "''" | "SYM" => ("punct", Some(root)),
                _ => ("dep", Some(root)),
            }
        })
        .collect()
}

fn next_noun(tags: &[&str], from: usize) -> Option<usize> {
    for (k, tag) in tags.iter().enumerate().skip(from + 1) {
        if tag.starts_with("NN") || *tag == "PRP" || *tag == "CD" {
            return Some(k);
        }
        if !is_modifier(tag) && *tag != "RB" {
            return None;
        }
    }
    None
}

fn modifier_relation(tag: &str) -> &'static str {
    match tag {
        "DT" | "PDT" => "det",
        "PRP$" | "WP$" | "POS" => "poss",
        _ => "amod",
    }
}

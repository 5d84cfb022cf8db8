//! Linguistic toolkit consumed by the featurizers.
//!
//! Every collaborator is a trait so callers can plug in their own
//! tokenizer, tagger, parser, or lexicon. [`Toolkit`] bundles one of each
//! behind `Arc`s; it is built once and then shared read-only.

mod categories;
mod parser;
mod sentiment;
mod tagger;
mod tokenize;

pub use categories::LiwcDictionary;
pub use parser::HeuristicParser;
pub use sentiment::{Lexicon, LexiconScorer, PolarityAnalyzer};
pub use tagger::LexiconTagger;
pub use tokenize::{TerminatorSplitter, TreebankTokenizer};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use textfeat_core::config::ToolkitConfig;
use textfeat_core::constants::DEFAULT_MAX_TREE_DEPTH;
use tracing::info;

use crate::error::AnalysisResult;

/// Relation label carried by the top token of each sentence.
pub const ROOT_RELATION: &str = "ROOT";

/// Splits text into word and punctuation tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize `text` in reading order.
    fn tokenize(&self, text: &str) -> AnalysisResult<Vec<String>>;
}

/// Splits text into sentences.
pub trait SentenceSplitter: Send + Sync {
    /// Sentences of `text` in reading order.
    fn split(&self, text: &str) -> AnalysisResult<Vec<String>>;
}

/// Assigns part-of-speech tags.
pub trait PosTagger: Send + Sync {
    /// Tag each token; the output is aligned with `tokens`.
    fn tag(&self, tokens: &[String]) -> AnalysisResult<Vec<TaggedToken>>;
}

/// Builds a dependency tree for a text.
pub trait DependencyParser: Send + Sync {
    /// Parse `text`; one node per sentence carries [`ROOT_RELATION`].
    fn parse(&self, text: &str) -> AnalysisResult<DependencyTree>;
}

/// Single-number lexicon sentiment for a sentence.
pub trait SentimentScorer: Send + Sync {
    /// Aggregate sentiment of `sentence`.
    fn score(&self, sentence: &str) -> AnalysisResult<f64>;
}

/// Four-dimensional sentiment for a sentence.
pub trait PolarityScorer: Send + Sync {
    /// Positive, negative, neutral, and compound scores of `sentence`.
    fn polarity(&self, sentence: &str) -> AnalysisResult<PolarityScores>;
}

/// Word to psycholinguistic category lookup.
pub trait CategoryDictionary: Send + Sync {
    /// Categories `word` belongs to; empty when the word is unknown.
    fn categories(&self, word: &str) -> Vec<String>;
}

/// A token with its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    /// Token text as produced by the tokenizer.
    pub token: String,
    /// Penn Treebank style tag.
    pub tag: String,
}

impl TaggedToken {
    /// Create a tagged token.
    pub fn new(token: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            tag: tag.into(),
        }
    }
}

/// Per-sentence output of a [`PolarityScorer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarityScores {
    /// Share of positive valence.
    pub pos: f64,
    /// Share of negative valence.
    pub neg: f64,
    /// Share of neutral tokens.
    pub neu: f64,
    /// Normalized overall valence in [-1, 1].
    pub compound: f64,
}

/// One token of a dependency tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyNode {
    /// Token text.
    pub text: String,
    /// Part-of-speech tag.
    pub tag: String,
    /// Relation to the head (`ROOT` for sentence heads).
    pub relation: String,
    /// Index of the head node, `None` for roots.
    pub head: Option<usize>,
    /// Indices of dependent nodes.
    pub children: Vec<usize>,
}

/// Arena of dependency nodes; edges are node indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyTree {
    nodes: Vec<DependencyNode>,
}

impl DependencyTree {
    /// Wrap already-linked nodes.
    pub fn new(nodes: Vec<DependencyNode>) -> Self {
        Self { nodes }
    }

    /// Build a tree from head indices, deriving child lists.
    ///
    /// Heads pointing outside the arena are dropped from the child lists.
    pub fn from_heads(entries: Vec<(String, String, String, Option<usize>)>) -> Self {
        let mut nodes: Vec<DependencyNode> = entries
            .into_iter()
            .map(|(text, tag, relation, head)| DependencyNode {
                text,
                tag,
                relation,
                head,
                children: Vec::new(),
            })
            .collect();

        for idx in 0..nodes.len() {
            if let Some(head) = nodes[idx].head {
                if head < nodes.len() {
                    nodes[head].children.push(idx);
                }
            }
        }

        Self { nodes }
    }

    /// All nodes in token order.
    pub fn nodes(&self) -> &[DependencyNode] {
        &self.nodes
    }

    /// Node at `idx`.
    pub fn node(&self, idx: usize) -> Option<&DependencyNode> {
        self.nodes.get(idx)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indices of nodes carrying the ROOT relation.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.relation == ROOT_RELATION)
            .map(|(idx, _)| idx)
    }
}

/// Shared, read-only bundle of linguistic collaborators.
#[derive(Clone)]
pub struct Toolkit {
    tokenizer: Arc<dyn Tokenizer>,
    splitter: Arc<dyn SentenceSplitter>,
    tagger: Arc<dyn PosTagger>,
    parser: Arc<dyn DependencyParser>,
    sentiment: Arc<dyn SentimentScorer>,
    polarity: Arc<dyn PolarityScorer>,
    categories: Arc<dyn CategoryDictionary>,
    max_tree_depth: usize,
}

impl Toolkit {
    /// Start building a toolkit; unset collaborators get the built-ins.
    pub fn builder() -> ToolkitBuilder {
        ToolkitBuilder::default()
    }

    /// Toolkit made only of built-in collaborators and bundled resources.
    pub fn with_defaults() -> AnalysisResult<Self> {
        Self::builder().build()
    }

    /// Toolkit configured from `config`, loading any replacement resources.
    pub fn from_config(config: &ToolkitConfig) -> AnalysisResult<Self> {
        let mut builder = Self::builder().max_tree_depth(config.max_tree_depth);

        if let Some(path) = &config.sentiment_lexicon {
            builder = builder.lexicon(Lexicon::from_path(path)?);
        }
        if let Some(path) = &config.category_dictionary {
            builder = builder.categories(Arc::new(LiwcDictionary::from_path(path)?));
        }

        builder.build()
    }

    /// Tokenizer.
    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    /// Sentence splitter.
    pub fn splitter(&self) -> &dyn SentenceSplitter {
        self.splitter.as_ref()
    }

    /// Part-of-speech tagger.
    pub fn tagger(&self) -> &dyn PosTagger {
        self.tagger.as_ref()
    }

    /// Dependency parser.
    pub fn parser(&self) -> &dyn DependencyParser {
        self.parser.as_ref()
    }

    /// Single-number sentiment scorer.
    pub fn sentiment(&self) -> &dyn SentimentScorer {
        self.sentiment.as_ref()
    }

    /// Four-dimensional sentiment scorer.
    pub fn polarity(&self) -> &dyn PolarityScorer {
        self.polarity.as_ref()
    }

    /// Psycholinguistic category dictionary.
    pub fn categories(&self) -> &dyn CategoryDictionary {
        self.categories.as_ref()
    }

    /// Deepest dependency tree walked before it is rejected.
    pub fn max_tree_depth(&self) -> usize {
        self.max_tree_depth
    }
}

impl std::fmt::Debug for Toolkit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolkit")
            .field("max_tree_depth", &self.max_tree_depth)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Toolkit`].
#[derive(Default)]
pub struct ToolkitBuilder {
    tokenizer: Option<Arc<dyn Tokenizer>>,
    splitter: Option<Arc<dyn SentenceSplitter>>,
    tagger: Option<Arc<dyn PosTagger>>,
    parser: Option<Arc<dyn DependencyParser>>,
    sentiment: Option<Arc<dyn SentimentScorer>>,
    polarity: Option<Arc<dyn PolarityScorer>>,
    categories: Option<Arc<dyn CategoryDictionary>>,
    lexicon: Option<Lexicon>,
    max_tree_depth: Option<usize>,
}

impl ToolkitBuilder {
    /// Use a custom tokenizer.
    pub fn tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Use a custom sentence splitter.
    pub fn splitter(mut self, splitter: Arc<dyn SentenceSplitter>) -> Self {
        self.splitter = Some(splitter);
        self
    }

    /// Use a custom tagger.
    pub fn tagger(mut self, tagger: Arc<dyn PosTagger>) -> Self {
        self.tagger = Some(tagger);
        self
    }

    /// Use a custom dependency parser.
    pub fn parser(mut self, parser: Arc<dyn DependencyParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Use a custom single-number sentiment scorer.
    pub fn sentiment(mut self, sentiment: Arc<dyn SentimentScorer>) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    /// Use a custom polarity scorer.
    pub fn polarity(mut self, polarity: Arc<dyn PolarityScorer>) -> Self {
        self.polarity = Some(polarity);
        self
    }

    /// Use a custom category dictionary.
    pub fn categories(mut self, categories: Arc<dyn CategoryDictionary>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Valence lexicon backing the built-in sentiment scorers.
    pub fn lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    /// Depth limit for dependency trees.
    pub fn max_tree_depth(mut self, depth: usize) -> Self {
        self.max_tree_depth = Some(depth);
        self
    }

    /// Fill unset collaborators with the built-ins and finish.
    pub fn build(self) -> AnalysisResult<Toolkit> {
        let tokenizer: Arc<dyn Tokenizer> = match self.tokenizer {
            Some(t) => t,
            None => Arc::new(TreebankTokenizer::new()),
        };
        let splitter: Arc<dyn SentenceSplitter> = match self.splitter {
            Some(s) => s,
            None => Arc::new(TerminatorSplitter::new()),
        };
        let tagger: Arc<dyn PosTagger> = match self.tagger {
            Some(t) => t,
            None => Arc::new(LexiconTagger::new()),
        };
        let parser: Arc<dyn DependencyParser> = match self.parser {
            Some(p) => p,
            None => Arc::new(HeuristicParser::new(
                Arc::clone(&tokenizer),
                Arc::clone(&splitter),
                Arc::clone(&tagger),
            )),
        };

        let needs_lexicon = self.sentiment.is_none() || self.polarity.is_none();
        let lexicon = match self.lexicon {
            Some(lexicon) => Arc::new(lexicon),
            None if needs_lexicon => Arc::new(Lexicon::bundled()?),
            None => Arc::new(Lexicon::default()),
        };

        let sentiment: Arc<dyn SentimentScorer> = match self.sentiment {
            Some(s) => s,
            None => Arc::new(LexiconScorer::new(Arc::clone(&lexicon))),
        };
        let polarity: Arc<dyn PolarityScorer> = match self.polarity {
            Some(p) => p,
            None => Arc::new(PolarityAnalyzer::new(lexicon)),
        };

        let categories: Arc<dyn CategoryDictionary> = match self.categories {
            Some(c) => c,
            None => Arc::new(LiwcDictionary::bundled()?),
        };

        let max_tree_depth = self.max_tree_depth.unwrap_or(DEFAULT_MAX_TREE_DEPTH);
        info!("Initialized linguistic toolkit (max tree depth {})", max_tree_depth);

        Ok(Toolkit {
            tokenizer,
            splitter,
            tagger,
            parser,
            sentiment,
            polarity,
            categories,
            max_tree_depth,
        })
    }
}

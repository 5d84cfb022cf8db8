//! A text plus lazily computed, shared annotations.

use once_cell::sync::OnceCell;

use crate::error::AnalysisResult;
use crate::nlp::{TaggedToken, Toolkit};

/// Annotations a caller has already computed for a text.
///
/// Any field left `None` is computed on first use.
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    /// Word tokens.
    pub tokens: Option<Vec<String>>,
    /// Sentences.
    pub sentences: Option<Vec<String>>,
    /// Part-of-speech tags aligned with `tokens`.
    pub tagged: Option<Vec<TaggedToken>>,
}

/// The unit every featurizer consumes.
///
/// Tokens, sentences and tags are computed at most once, however many
/// featurizers ask for them, and may be read from several threads.
#[derive(Debug)]
pub struct Document<'a> {
    text: &'a str,
    toolkit: &'a Toolkit,
    tokens: OnceCell<Vec<String>>,
    sentences: OnceCell<Vec<String>>,
    tagged: OnceCell<Vec<TaggedToken>>,
}

impl<'a> Document<'a> {
    /// Wrap `text`; annotations come from `toolkit` on demand.
    pub fn new(text: &'a str, toolkit: &'a Toolkit) -> Self {
        Self {
            text,
            toolkit,
            tokens: OnceCell::new(),
            sentences: OnceCell::new(),
            tagged: OnceCell::new(),
        }
    }

    /// Wrap `text` with annotations computed elsewhere.
    pub fn with_annotations(text: &'a str, toolkit: &'a Toolkit, annotations: Annotations) -> Self {
        let doc = Self::new(text, toolkit);
        if let Some(tokens) = annotations.tokens {
            let _ = doc.tokens.set(tokens);
        }
        if let Some(sentences) = annotations.sentences {
            let _ = doc.sentences.set(sentences);
        }
        if let Some(tagged) = annotations.tagged {
            let _ = doc.tagged.set(tagged);
        }
        doc
    }

    /// Raw text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Toolkit used for on-demand annotation.
    pub fn toolkit(&self) -> &'a Toolkit {
        self.toolkit
    }

    /// Word tokens in reading order.
    pub fn tokens(&self) -> AnalysisResult<&[String]> {
        self.tokens
            .get_or_try_init(|| self.toolkit.tokenizer().tokenize(self.text))
            .map(Vec::as_slice)
    }

    /// Sentences in reading order.
    pub fn sentences(&self) -> AnalysisResult<&[String]> {
        self.sentences
            .get_or_try_init(|| self.toolkit.splitter().split(self.text))
            .map(Vec::as_slice)
    }

    /// Tokens with part-of-speech tags.
    pub fn tagged(&self) -> AnalysisResult<&[TaggedToken]> {
        self.tagged
            .get_or_try_init(|| {
                let tokens = self.tokens()?;
                self.toolkit.tagger().tag(tokens)
            })
            .map(Vec::as_slice)
    }

    /// Lowercased tokens.
    pub fn lowercase_tokens(&self) -> AnalysisResult<Vec<String>> {
        Ok(self.tokens()?.iter().map(|t| t.to_lowercase()).collect())
    }
}

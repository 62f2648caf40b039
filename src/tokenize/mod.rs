//! Text to word tokens.
//!
//! The pipeline only needs `Tokenizer`. `StopwordTokenizer` is the built-in
//! implementation; a real lemmatizer can be plugged in through `Lemmatizer`
//! or by passing any `Fn(&str) -> Vec<String>`.

pub mod stopwords;

use std::borrow::Cow;

pub use stopwords::{StopwordTokenizer, FRENCH_CONTRACTIONS, FRENCH_EXTRA_STOPWORDS};

/// Maps document text to normalized word tokens.
///
/// Implementations must drop stopwords, punctuation-only tokens, numeric
/// tokens and single-character tokens.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn tokenize(&self, text: &str) -> Vec<String> {
        self(text)
    }
}

/// Maps a surface token to its dictionary form.
pub trait Lemmatizer {
    fn lemmatize<'a>(&self, word: &'a str) -> Cow<'a, str>;
}

/// Leaves tokens untouched. Used when the input is already lemmatized.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLemmatizer;

impl Lemmatizer for IdentityLemmatizer {
    fn lemmatize<'a>(&self, word: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(word)
    }
}

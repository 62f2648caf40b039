//! Stopword-filtering tokenizer.
//!
//! Word lists come from the `stop-words` crate, extended for French with
//! common verbs and elided articles.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};
use unicode_normalization::UnicodeNormalization;

use crate::tokenize::{IdentityLemmatizer, Lemmatizer, Tokenizer};

/// Elided forms removed from the front of a word (`l'école` -> `école`).
pub const FRENCH_CONTRACTIONS: &[&str] = &["d'", "l'", "n'", "qu'", "j'", "t'", "s'", "m'"];

/// Added on top of the French list: frequent verbs that carry no topic, and
/// a few stray tokens.
pub const FRENCH_EXTRA_STOPWORDS: &[&str] = &[
    "el", "être", "avoir", "faire", "dire", "aller", "voir", "savoir", "pouvoir", "falloir",
    "vouloir", "m.",
];

#[derive(Debug, Clone)]
pub struct StopwordTokenizer<L = IdentityLemmatizer> {
    /// Lowercase.
    stopwords: HashSet<String>,
    contractions: Vec<String>,
    lemmatizer: L,
}

impl Default for StopwordTokenizer {
    fn default() -> Self {
        Self::new("fr")
    }
}

impl StopwordTokenizer {
    /// Supported languages: fr, en, de, es, it, pt, nl. Unknown codes fall back to French.
    pub fn new(language: &str) -> Self {
        let lang = language.to_lowercase();
        let mut stopwords = load_stopwords(&lang);
        let contractions: Vec<String> = if lang == "fr" || lang == "french" || !is_known(&lang) {
            stopwords.extend(FRENCH_EXTRA_STOPWORDS.iter().map(|w| w.to_string()));
            FRENCH_CONTRACTIONS.iter().map(|c| c.to_string()).collect()
        } else {
            Vec::new()
        };
        stopwords.extend(contractions.iter().cloned());

        Self {
            stopwords,
            contractions,
            lemmatizer: IdentityLemmatizer,
        }
    }

    /// Only the given words are stopwords; no elision handling.
    pub fn from_list(words: &[&str]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.to_lowercase()).collect(),
            contractions: Vec::new(),
            lemmatizer: IdentityLemmatizer,
        }
    }
}

impl<L> StopwordTokenizer<L> {
    pub fn with_lemmatizer<M: Lemmatizer>(self, lemmatizer: M) -> StopwordTokenizer<M> {
        StopwordTokenizer {
            stopwords: self.stopwords,
            contractions: self.contractions,
            lemmatizer,
        }
    }

    pub fn with_contractions(mut self, contractions: &[&str]) -> Self {
        self.contractions = contractions.iter().map(|c| c.to_lowercase()).collect();
        self
    }

    pub fn add_stopwords<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.stopwords.insert(word.as_ref().to_lowercase());
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }

    fn strip_elision<'a>(&self, word: &'a str) -> &'a str {
        for c in &self.contractions {
            if let Some(rest) = word.strip_prefix(c.as_str()) {
                if !rest.is_empty() {
                    return rest;
                }
            }
        }
        word
    }

    fn keep(&self, word: &str) -> bool {
        word.chars().count() > 1
            && word.chars().any(char::is_alphabetic)
            && !word.contains('\'')
            && !self.stopwords.contains(word)
    }
}

impl<L: Lemmatizer> Tokenizer for StopwordTokenizer<L> {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = normalize_text(text);
        let mut tokens = Vec::new();

        for raw in normalized.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-')) {
            let word = raw.trim_matches(|c| c == '\'' || c == '-');
            if word.is_empty() {
                continue;
            }

            let word = self.strip_elision(word);
            let lemma = self.lemmatizer.lemmatize(word).to_lowercase();
            if self.keep(&lemma) {
                tokens.push(lemma);
            }
        }

        tokens
    }
}

/// NFC, typographic apostrophes folded to `'`, `œ` spelled out, whitespace
/// collapsed, lowercased.
pub fn normalize_text(text: &str) -> String {
    let folded: String = text
        .nfc()
        .flat_map(|c| -> Box<dyn Iterator<Item = char>> {
            match c {
                '\u{2019}' | '\u{2018}' | '\u{02BC}' => Box::new(std::iter::once('\'')),
                'œ' => Box::new("oe".chars()),
                'Œ' => Box::new("OE".chars()),
                _ => Box::new(std::iter::once(c)),
            }
        })
        .collect();

    folded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn is_known(language: &str) -> bool {
    matches!(
        language,
        "fr" | "french"
            | "en"
            | "english"
            | "de"
            | "german"
            | "es"
            | "spanish"
            | "it"
            | "italian"
            | "pt"
            | "portuguese"
            | "nl"
            | "dutch"
    )
}

fn load_stopwords(language: &str) -> HashSet<String> {
    let lang = match language {
        "en" | "english" => LANGUAGE::English,
        "de" | "german" => LANGUAGE::German,
        "es" | "spanish" => LANGUAGE::Spanish,
        "it" | "italian" => LANGUAGE::Italian,
        "pt" | "portuguese" => LANGUAGE::Portuguese,
        "nl" | "dutch" => LANGUAGE::Dutch,
        _ => LANGUAGE::French,
    };

    get(lang).iter().map(|s| s.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn normalizes_apostrophes_ligatures_and_whitespace() {
        assert_eq!(
            normalize_text("L\u{2019}Œuvre\n  du  cœur"),
            "l'oeuvre du coeur"
        );
    }

    #[test]
    fn strips_elisions_and_filters() {
        let tokenizer = StopwordTokenizer::from_list(&["de", "et"])
            .with_contractions(FRENCH_CONTRACTIONS);
        let tokens = tokenizer.tokenize("L'école de Lomé, 2024 : l\u{2019}islam et l'Islam ! a");
        assert_eq!(tokens, vec!["école", "lomé", "islam", "islam"]);
    }

    #[test]
    fn drops_numbers_punctuation_and_leftover_apostrophes() {
        let tokenizer = StopwordTokenizer::from_list(&[]);
        let tokens = tokenizer.tokenize("1960 -- 3,5 ... aujourd'hui x Niamey");
        assert_eq!(tokens, vec!["niamey"]);
    }

    #[test]
    fn french_list_includes_extras_and_contractions() {
        let tokenizer = StopwordTokenizer::new("fr");
        assert!(tokenizer.is_stopword("le"));
        assert!(tokenizer.is_stopword("être"));
        assert!(tokenizer.is_stopword("qu'"));
        assert!(tokenizer.is_stopword("m."));
        assert!(!tokenizer.is_stopword("mosquée"));
        assert_eq!(tokenizer.tokenize("le marché et la mosquée"), vec!["marché", "mosquée"]);
    }

    #[test]
    fn lemmatizer_output_is_filtered() {
        struct Plural;
        impl Lemmatizer for Plural {
            fn lemmatize<'a>(&self, word: &'a str) -> Cow<'a, str> {
                match word.strip_suffix('s') {
                    Some(stem) => Cow::Owned(stem.to_string()),
                    None => Cow::Borrowed(word),
                }
            }
        }

        let tokenizer = StopwordTokenizer::from_list(&["le"]).with_lemmatizer(Plural);
        assert_eq!(tokenizer.tokenize("marchés les"), vec!["marché"]);
    }
}

//! Text normalization for incoming emails.
//!
//! `clean_text` is pure pattern matching and always available. The optional
//! linguistic stages (stopword removal, stemming, keyword extraction) go
//! through a [`Linguistics`] backend chosen at startup.

mod clean;
pub mod linguistics;
pub mod stopwords;

pub use clean::{
    CNPJ_TOKEN, CPF_TOKEN, EMAIL_TOKEN, PHONE_TOKEN, URL_TOKEN, VALOR_TOKEN, clean_text,
};
pub use linguistics::{
    BasicLinguistics, FullLinguistics, Linguistics, LinguisticsKind, Stemmer, StopwordSet,
    create_linguistics,
};

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Default number of keywords returned by [`TextNormalizer::extract_keywords`].
pub const DEFAULT_TOP_KEYWORDS: usize = 10;

/// Language of the email content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Portuguese,
    English,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portuguese" | "pt" => Ok(Self::Portuguese),
            "english" | "en" => Ok(Self::English),
            other => Err(format!(
                "unknown language '{other}' (expected 'portuguese' or 'english')"
            )),
        }
    }
}

/// Which optional stages `process_email` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub remove_stopwords: bool,
    pub apply_stemming: bool,
    pub normalize_case: bool,
    pub language: Language,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            remove_stopwords: true,
            apply_stemming: false,
            normalize_case: false,
            language: Language::Portuguese,
        }
    }
}

/// Email text normalizer.
///
/// Stateless apart from the read-only linguistic backend, so one instance
/// can be shared across concurrent requests.
pub struct TextNormalizer {
    linguistics: Arc<dyn Linguistics>,
    language: Language,
}

impl TextNormalizer {
    /// Create a normalizer over a backend. `language` is the default for
    /// callers that do not specify one.
    pub fn new(linguistics: Arc<dyn Linguistics>, language: Language) -> Self {
        Self {
            linguistics,
            language,
        }
    }

    /// Default language for requests that do not name one.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Name of the linguistic backend.
    pub fn backend_name(&self) -> &'static str {
        self.linguistics.name()
    }

    /// See [`clean_text`].
    pub fn clean_text(&self, text: &str) -> String {
        clean_text(text)
    }

    /// Drop stopword tokens and rejoin with single spaces.
    pub fn remove_stopwords(&self, text: &str, language: Language) -> String {
        let stopwords = self.linguistics.stopwords(language);
        if stopwords.is_empty() {
            return text.to_string();
        }
        let tokens = self.linguistics.tokenize(text, language);
        filter_stopwords(&tokens, stopwords)
    }

    /// Stem every eligible word. A backend without a stemmer for `language`
    /// leaves the text unchanged.
    pub fn apply_stemming(&self, text: &str, language: Language) -> String {
        match self.linguistics.stemmer(language) {
            Some(stemmer) => stem_words(text, stemmer),
            None => text.to_string(),
        }
    }

    /// Most frequent content words of `text`, ignoring the stopwords of
    /// `language`.
    pub fn extract_keywords(&self, text: &str, language: Language, top_n: usize) -> Vec<String> {
        rank_keywords(
            &clean_text(text).to_lowercase(),
            self.linguistics.stopwords(language),
            top_n,
        )
    }

    /// Full pipeline: clean, then the stages enabled in `config`.
    pub fn process_email(&self, text: &str, config: &NormalizerConfig) -> String {
        let mut processed = clean_text(text);
        if processed.is_empty() {
            return processed;
        }

        if config.normalize_case {
            processed = processed.to_lowercase();
        }
        if config.remove_stopwords {
            processed = self.remove_stopwords(&processed, config.language);
        }
        if config.apply_stemming {
            processed = self.apply_stemming(&processed, config.language);
        }
        processed
    }
}

/// Keep tokens that are not stopwords. Tokens of two characters or fewer are
/// always kept.
pub fn filter_stopwords(tokens: &[&str], stopwords: &StopwordSet) -> String {
    tokens
        .iter()
        .copied()
        .filter(|token| {
            token.chars().count() <= 2 || !stopwords.contains(token.to_lowercase().as_str())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Stem whitespace-separated words longer than three characters. Placeholder
/// tokens (starting with `[`) and words the stemmer rejects pass through.
pub fn stem_words(text: &str, stemmer: &dyn Stemmer) -> String {
    text.split_whitespace()
        .map(|word| {
            if word.chars().count() > 3 && !word.starts_with('[') {
                stemmer.stem(word).unwrap_or_else(|| word.to_string())
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rank alphabetic words longer than three characters by frequency.
///
/// Ties are broken by first occurrence in `text`.
pub fn rank_keywords(text: &str, stopwords: &StopwordSet, top_n: usize) -> Vec<String> {
    // word -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, word) in text.split_whitespace().enumerate() {
        if word.chars().count() > 3
            && word.chars().all(char::is_alphabetic)
            && !stopwords.contains(word)
        {
            counts.entry(word).or_insert((0, position)).0 += 1;
        }
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(top_n)
        .map(|(word, _, _)| word.to_string())
        .collect()
}

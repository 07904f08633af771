//! Linguistic resources behind the normalizer: stopwords, tokenization and
//! stemming.
//!
//! Two backends exist:
//! - **Full**: extended stopword lists for both languages, a tokenizer that
//!   splits punctuation off words, and Snowball stemmers.
//! - **Basic**: a small hardcoded Portuguese stopword list, plain whitespace
//!   tokenization and no stemming.
//!
//! The backend is chosen once at startup from configuration.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use rust_stemmers::Algorithm;
use tracing::info;

use super::Language;
use super::stopwords;

/// A set of lower-cased stopwords.
pub type StopwordSet = HashSet<&'static str>;

/// Reduces a word to an approximate root form.
pub trait Stemmer: Send + Sync {
    /// Stem a single word. `None` means the word could not be stemmed and the
    /// caller should keep the original.
    fn stem(&self, word: &str) -> Option<String>;
}

/// Capability interface over stopwords, tokenization and stemming.
pub trait Linguistics: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Stopwords for a language. May be empty.
    fn stopwords(&self, language: Language) -> &StopwordSet;

    /// Split text into tokens, preserving order.
    fn tokenize<'a>(&self, text: &'a str, language: Language) -> Vec<&'a str>;

    /// Stemmer for a language, if the backend has one.
    fn stemmer(&self, language: Language) -> Option<&dyn Stemmer>;
}

/// Which linguistic backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinguisticsKind {
    Full,
    Basic,
}

impl FromStr for LinguisticsKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "basic" => Ok(Self::Basic),
            other => Err(format!("unknown NLP backend '{other}' (expected 'full' or 'basic')")),
        }
    }
}

/// Create a linguistic backend.
pub fn create_linguistics(kind: LinguisticsKind) -> Arc<dyn Linguistics> {
    let backend: Arc<dyn Linguistics> = match kind {
        LinguisticsKind::Full => Arc::new(FullLinguistics::new()),
        LinguisticsKind::Basic => Arc::new(BasicLinguistics::new()),
    };
    info!(backend = backend.name(), "Linguistic backend ready");
    backend
}

// ── Full backend ────────────────────────────────────────────────────────

// Placeholders, numbers with separators, words with inner hyphens or
// apostrophes, then any single punctuation mark.
static WORD_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[A-Za-z]+\]|\d+(?:[.,:/]\d+)+|\w+(?:[-'’]\w+)*|[^\w\s]").unwrap()
});

/// Snowball stemmer wrapper.
pub struct SnowballStemmer {
    inner: rust_stemmers::Stemmer,
}

impl SnowballStemmer {
    /// Create a stemmer for a language.
    pub fn new(language: Language) -> Self {
        let algorithm = match language {
            Language::Portuguese => Algorithm::Portuguese,
            Language::English => Algorithm::English,
        };
        Self {
            inner: rust_stemmers::Stemmer::create(algorithm),
        }
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, word: &str) -> Option<String> {
        let stemmed = self.inner.stem(word);
        if stemmed.is_empty() {
            None
        } else {
            Some(stemmed.into_owned())
        }
    }
}

/// Extended stopwords, punctuation-aware tokenizer, Snowball stemmers.
pub struct FullLinguistics {
    portuguese: StopwordSet,
    english: StopwordSet,
    portuguese_stemmer: SnowballStemmer,
    english_stemmer: SnowballStemmer,
}

impl FullLinguistics {
    pub fn new() -> Self {
        Self {
            portuguese: stopwords::PORTUGUESE.iter().copied().collect(),
            english: stopwords::ENGLISH.iter().copied().collect(),
            portuguese_stemmer: SnowballStemmer::new(Language::Portuguese),
            english_stemmer: SnowballStemmer::new(Language::English),
        }
    }
}

impl Default for FullLinguistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Linguistics for FullLinguistics {
    fn name(&self) -> &'static str {
        "full"
    }

    fn stopwords(&self, language: Language) -> &StopwordSet {
        match language {
            Language::Portuguese => &self.portuguese,
            Language::English => &self.english,
        }
    }

    fn tokenize<'a>(&self, text: &'a str, _language: Language) -> Vec<&'a str> {
        WORD_TOKEN.find_iter(text).map(|m| m.as_str()).collect()
    }

    fn stemmer(&self, language: Language) -> Option<&dyn Stemmer> {
        match language {
            Language::Portuguese => Some(&self.portuguese_stemmer),
            Language::English => Some(&self.english_stemmer),
        }
    }
}

// ── Basic backend ───────────────────────────────────────────────────────

/// Hardcoded Portuguese stopwords, whitespace tokenizer, no stemming.
///
/// The same Portuguese list is used whatever the requested language.
pub struct BasicLinguistics {
    stopwords: StopwordSet,
}

impl BasicLinguistics {
    pub fn new() -> Self {
        Self {
            stopwords: stopwords::BASIC_PORTUGUESE.iter().copied().collect(),
        }
    }
}

impl Default for BasicLinguistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Linguistics for BasicLinguistics {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn stopwords(&self, _language: Language) -> &StopwordSet {
        &self.stopwords
    }

    fn tokenize<'a>(&self, text: &'a str, _language: Language) -> Vec<&'a str> {
        text.split_whitespace().collect()
    }

    fn stemmer(&self, _language: Language) -> Option<&dyn Stemmer> {
        None
    }
}

//! Deterministic text cleaning.
//!
//! Pattern scrubbing runs before any whitespace normalization so that a
//! match never spans two fields that only became adjacent after collapsing.

use std::sync::LazyLock;

use regex::Regex;

/// Placeholder for email addresses.
pub const EMAIL_TOKEN: &str = "[EMAIL]";
/// Placeholder for URLs.
pub const URL_TOKEN: &str = "[URL]";
/// Placeholder for phone numbers.
pub const PHONE_TOKEN: &str = "[PHONE]";
/// Placeholder for CPF numbers.
pub const CPF_TOKEN: &str = "[CPF]";
/// Placeholder for CNPJ numbers.
pub const CNPJ_TOKEN: &str = "[CNPJ]";
/// Placeholder for `R$` amounts.
pub const VALOR_TOKEN: &str = "[VALOR]";

/// Passes of the cleaning pipeline before giving up on reaching a fixed point.
const MAX_PASSES: usize = 4;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b").unwrap());

static HTTP_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(?:[a-zA-Z0-9]|[$-_@.&+]|[!*\\(),]|%[0-9a-fA-F]{2})+").unwrap()
});

static WWW_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"www\.(?:[a-zA-Z0-9]|[$-_@.&+]|[!*\\(),])+").unwrap());

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(?\d{2,3}\)?[\s-]?\d{4,5}[\s-]?\d{4}").unwrap());

static CPF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{3}\.\d{3}\.\d{3}-\d{2}").unwrap());

static CNPJ: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}").unwrap());

static CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"R\$\s*\d+[.,]?\d*").unwrap());

// A repeated group keeps its last iteration, so "?!" collapses to "!".
static REPEATED_PUNCT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([!?.]){2,}").unwrap());

// Lines holding only horizontal whitespace count as blank.
static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[^\S\n]*\n){2,}").unwrap());

static MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Clean raw email text into its canonical, scrubbed form.
///
/// Always succeeds and returns an empty string for empty input. The result
/// is a fixed point: cleaning it again yields the same string.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut current = clean_once(text);
    // Whitespace normalization can join fragments the scrubbers skipped on
    // the previous pass.
    for _ in 1..MAX_PASSES {
        let next = clean_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn clean_once(text: &str) -> String {
    // 1. line endings
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    // 2-6. scrub sensitive and noisy content
    let text = EMAIL.replace_all(&text, EMAIL_TOKEN);
    let text = HTTP_URL.replace_all(&text, URL_TOKEN);
    let text = WWW_URL.replace_all(&text, URL_TOKEN);
    let text = PHONE.replace_all(&text, PHONE_TOKEN);
    let text = CPF.replace_all(&text, CPF_TOKEN);
    let text = CNPJ.replace_all(&text, CNPJ_TOKEN);
    let text = CURRENCY.replace_all(&text, VALOR_TOKEN);

    // 7. repeated punctuation
    let text = REPEATED_PUNCT.replace_all(&text, "$1");

    // 8. blank line runs
    let text = BLANK_RUN.replace_all(&text, "\n\n");

    // 9. per-line trim
    let text = text.split('\n').map(str::trim).collect::<Vec<_>>().join("\n");

    // 10. space runs
    let text = MULTI_SPACE.replace_all(&text, " ");

    // 11. overall trim
    text.trim().to_string()
}

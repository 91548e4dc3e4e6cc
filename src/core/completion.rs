//! Tab completion of book names.

use super::corpus::{Corpus, normalize};

/// Suggested when nothing has been typed yet.
pub const EMPTY_SUGGESTION: &str = "help";

/// Returns the text that would complete the last comma-separated token
/// into a book name, or an empty string.
///
/// The first book in canonical order whose normalized name starts with the
/// normalized token wins. The suffix is relative to the normalized token.
pub fn suggest(corpus: &Corpus, buffer: &str) -> String {
    if buffer.is_empty() {
        return EMPTY_SUGGESTION.to_string();
    }
    let last = buffer.rsplit(',').next().unwrap_or_default();
    let prefix = normalize(last);
    if prefix.is_empty() {
        return String::new();
    }

    corpus
        .names()
        .iter()
        .map(|n| normalize(&n.name))
        .find(|name| name.starts_with(&prefix))
        .map(|name| name[prefix.len()..].to_string())
        .unwrap_or_default()
}

/// What the buffer becomes when Tab is pressed.
pub fn complete(corpus: &Corpus, buffer: &str) -> String {
    let suggestion = suggest(corpus, buffer);
    format!("{}{}", normalize(buffer), suggestion)
}

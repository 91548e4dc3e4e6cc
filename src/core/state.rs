//! # Session State
//!
//! The read-only context shared by the input and render tasks.
//!
//! ```text
//! Session
//! ├── corpus: Arc<Corpus>      // loaded once, never mutated
//! └── min_phrase_len: usize    // searches need strictly more characters
//! ```
//!
//! The only mutable state in a session is the input buffer, which the TUI
//! owns. Everything here is built once at startup and handed out by
//! reference.

use std::sync::Arc;

use super::config::{DEFAULT_MIN_PHRASE_LEN, ResolvedConfig};
use super::corpus::Corpus;

#[derive(Debug, Clone)]
pub struct Session {
    pub corpus: Arc<Corpus>,
    pub min_phrase_len: usize,
}

impl Session {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            corpus: Arc::new(corpus),
            min_phrase_len: DEFAULT_MIN_PHRASE_LEN,
        }
    }

    pub fn from_config(corpus: Corpus, config: &ResolvedConfig) -> Self {
        Self {
            corpus: Arc::new(corpus),
            min_phrase_len: config.min_phrase_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::fixture_session;

    #[test]
    fn test_session_new_defaults() {
        let session = fixture_session();
        assert_eq!(session.min_phrase_len, 3);
        assert_eq!(session.corpus.books().len(), 5);
    }
}

//! # Token Processing
//!
//! Everything typed becomes a list of comma-separated tokens. Each token is
//! either a reserved command, a keyphrase search (`!phrase`), or a citation.
//!
//! ```text
//! "john 3:16, 4:1, !grace, help"
//!     │          │      │       └─► Command::Help   → static text
//!     │          │      └─────────► search::search  → matches + summary
//!     └──────────┴────────────────► address::resolve (one shared previous
//!                                   address, so `4:1` stays in John)
//! ```
//!
//! Processing is pure: it reads the corpus and writes a [`Listing`]. The only
//! thing that escapes is the [`Effect`], which tells the TUI to end the
//! session when `quit` shows up anywhere in the chain.

use log::debug;

use super::address::{self, Address};
use super::corpus::normalize;
use super::listing::{Listing, Tone};
use super::search::{self, SEARCH_SIGIL};
use super::state::Session;

/// Reserved tokens that bypass citation and search handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    About,
}

impl Command {
    pub fn parse(token: &str) -> Option<Self> {
        match normalize(token).as_str() {
            "quit" => Some(Command::Quit),
            "help" => Some(Command::Help),
            "about" => Some(Command::About),
            _ => None,
        }
    }
}

/// What the caller must do after processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
}

const HELP: &[&str] = &[
    "Type citations, separated by commas. Results update as you type.",
    "  john 3:16          one verse",
    "  1 peter 3:15-18    a range of verses",
    "  jude 1             a whole chapter",
    "  john 3:16, 4:11    later fragments stay in the same book",
    "  john 3:16, :18     a bare :verse stays in the same chapter",
    "  !grace             every verse containing a phrase",
    "Tab completes a book name. Ctrl-W deletes a word, Ctrl-U the line.",
    "Ctrl-C or `quit` leaves.",
];

/// Splits the raw input line into tokens.
pub fn tokenize(input: &str) -> Vec<&str> {
    input.split(',').collect()
}

/// Runs every token through the right engine, in order.
///
/// Empty tokens and immediate repeats of the previous token are skipped.
/// A single previous address is threaded through the whole chain.
pub fn process(session: &Session, tokens: &[&str], listing: &mut Listing) -> Effect {
    let mut prev_address: Option<Address> = None;
    let mut prev_token: Option<String> = None;

    for token in tokens {
        let text = normalize(token);
        if text.is_empty() || prev_token.as_deref() == Some(text.as_str()) {
            continue;
        }

        let rotate = match Command::parse(&text) {
            Some(Command::Quit) => {
                debug!("Quit requested from input");
                return Effect::Quit;
            }
            Some(Command::Help) => {
                for line in HELP {
                    listing.push_text(Tone::Plain, *line);
                }
                listing.push_text(Tone::Plain, short_phrase_note(session.min_phrase_len));
                true
            }
            Some(Command::About) => {
                listing.push_text(Tone::Plain, about());
                true
            }
            None => match text.strip_prefix(SEARCH_SIGIL) {
                Some(phrase) => {
                    let phrase = phrase.trim_start();
                    if phrase.chars().count() > session.min_phrase_len {
                        search::search(&session.corpus, phrase, listing);
                        true
                    } else {
                        false
                    }
                }
                None => address::resolve(&session.corpus, &text, &mut prev_address, listing),
            },
        };

        if rotate {
            listing.rotate();
        }
        prev_token = Some(text);
    }

    Effect::None
}

/// Shorter `!` phrases are ignored rather than searched.
fn short_phrase_note(min_phrase_len: usize) -> String {
    format!(
        "A !phrase needs more than {min_phrase_len} characters; shorter ones show nothing."
    )
}

fn about() -> String {
    format!(
        "seekfirst {}: look up passages and phrases as you type.",
        env!("CARGO_PKG_VERSION")
    )
}

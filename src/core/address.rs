//! # Reference Resolution
//!
//! Turns a citation token such as `1 peter 3:15-18`, `4:11`, `jude 1`
//! or `:20` into a concrete passage and appends its verses to the listing.
//!
//! ```text
//! token ──normalize──► try_match_book ──► locate ──► candidate Address
//!                          │ (none)                        │
//!                          ▼                               ▼
//!                   previous book                 clamp against Corpus
//!                                                          │
//!                                  same as previous? ◄─────┘
//!                                     │ no
//!                                     ▼
//!                               emit verse lines
//! ```
//!
//! The previous address is threaded through a whole comma chain, so bare
//! fragments inherit the last book (and `:V` fragments the last chapter).
//! Out-of-range numbers are clamped, never rejected.

use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use super::corpus::{Corpus, normalize};
use super::listing::{Listing, Segment, Tone};

/// A passage range. Chapter and verses are 0-based.
///
/// `start`/`end` of `None` mean "unset": both unset is the whole chapter,
/// only `end` unset is a single verse. Resolved addresses always carry
/// concrete verse bounds. Equality compares all four fields and is what
/// decides duplicate suppression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub book: String,
    pub chapter: usize,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

// ============================================================================
// Pattern Matching
// ============================================================================

struct Patterns {
    book: Regex,
    chapter_verse: Regex,
    verses: Regex,
    chapter: Regex,
}

impl Patterns {
    fn compile() -> Self {
        // ASCII digit classes only: `\d` would admit other Unicode digits.
        Self {
            book: Regex::new(r"^(?:[0-9]+ )?[a-z]+(?: [a-z]+)*").expect("book pattern"),
            chapter_verse: Regex::new(r"([0-9]+):([0-9]+)(?:-([0-9]+))?")
                .expect("chapter:verse pattern"),
            verses: Regex::new(r"^:([0-9]+)(?:-([0-9]+))?").expect("verse pattern"),
            chapter: Regex::new(r"[0-9]+").expect("chapter pattern"),
        }
    }
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(Patterns::compile)
}

/// A book-name candidate at the start of a normalized token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookMatch<'a> {
    pub name: &'a str,
    /// Everything after the name.
    pub rest: &'a str,
}

/// Where in a book a fragment points. Numbers are 1-based as typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// `C:V` or `C:V-E`
    ChapterVerse {
        chapter: usize,
        start: usize,
        end: Option<usize>,
    },
    /// `C`
    Chapter(usize),
    /// `:V` or `:V-E`, chapter inherited.
    Verses { start: usize, end: Option<usize> },
}

/// Detects an optional numeral prefix followed by an alphabetic run
/// (`1 peter`, `jude`, `song of solomon`) at the start of `text`.
pub fn try_match_book(text: &str) -> Option<BookMatch<'_>> {
    let m = patterns().book.find(text)?;
    Some(BookMatch {
        name: m.as_str().trim_end(),
        rest: &text[m.end()..],
    })
}

/// Detects the first `C:V[-E]` pattern.
pub fn try_match_chapter_verse(text: &str) -> Option<Locator> {
    let caps = patterns().chapter_verse.captures(text)?;
    Some(Locator::ChapterVerse {
        chapter: numeral(&caps[1]),
        start: numeral(&caps[2]),
        end: caps.get(3).map(|m| numeral(m.as_str())),
    })
}

/// Detects a leading `:V[-E]` fragment.
pub fn try_match_verses(text: &str) -> Option<Locator> {
    let caps = patterns().verses.captures(text.trim_start())?;
    Some(Locator::Verses {
        start: numeral(&caps[1]),
        end: caps.get(2).map(|m| numeral(m.as_str())),
    })
}

/// Detects the first standalone number.
pub fn try_match_chapter(text: &str) -> Option<Locator> {
    let m = patterns().chapter.find(text)?;
    Some(Locator::Chapter(numeral(m.as_str())))
}

/// `C:V` wins over `:V`, which wins over a bare chapter number.
pub fn locate(text: &str) -> Option<Locator> {
    try_match_chapter_verse(text)
        .or_else(|| try_match_verses(text))
        .or_else(|| try_match_chapter(text))
}

/// Converts a digit run matched by one of the patterns above.
///
/// Anything but ASCII digits here is a resolver bug, not bad input.
/// Runs too long for `usize` saturate and get clamped later.
fn numeral(digits: &str) -> usize {
    assert!(
        !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
        "pattern matched a non-numeral: {digits:?}"
    );
    digits.parse().unwrap_or(usize::MAX)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolves one citation token against the corpus.
///
/// Appends either the passage's verse lines or an inline diagnostic to
/// `listing`, and updates `prev` so later fragments in the same chain can
/// inherit from it. Returns `true` when verse lines were emitted, which is
/// the caller's cue to rotate the highlight band.
pub fn resolve(
    corpus: &Corpus,
    token: &str,
    prev: &mut Option<Address>,
    listing: &mut Listing,
) -> bool {
    let text = normalize(token);

    let (book, rest) = match try_match_book(&text) {
        Some(m) => (m.name.to_string(), m.rest),
        None => match prev.as_ref() {
            Some(p) => (p.book.clone(), text.as_str()),
            None => {
                debug!("Unresolved token {text:?}: no book");
                listing.push_text(Tone::Notice, format!("{text} (book not found)"));
                return false;
            }
        },
    };

    let candidate = match locate(rest) {
        Some(Locator::ChapterVerse {
            chapter,
            start,
            end,
        }) => Address {
            book,
            chapter: chapter.saturating_sub(1),
            start: Some(start.saturating_sub(1)),
            end: end.map(|e| e.saturating_sub(1)),
        },
        Some(Locator::Chapter(chapter)) => Address {
            book,
            chapter: chapter.saturating_sub(1),
            start: None,
            end: None,
        },
        Some(Locator::Verses { start, end }) => match prev.as_ref() {
            Some(p) if same_book(corpus, &p.book, &book) => Address {
                book,
                chapter: p.chapter,
                start: Some(start.saturating_sub(1)),
                end: end.map(|e| e.saturating_sub(1)),
            },
            _ => return chapter_not_found(&text, listing),
        },
        None => return chapter_not_found(&text, listing),
    };

    let Some((book_index, resolved)) = clamp(corpus, &candidate) else {
        // Unknown book or a book with nothing in it: nothing to show, but
        // the chain keeps following this address.
        debug!("No passage for {candidate:?}");
        *prev = Some(candidate);
        return false;
    };

    if prev.as_ref() == Some(&resolved) {
        return false;
    }

    let emitted = emit(corpus, book_index, &resolved, listing);
    *prev = Some(resolved);
    emitted
}

/// Same text, or two spellings (name/abbreviation) of one known book.
fn same_book(corpus: &Corpus, a: &str, b: &str) -> bool {
    a == b || corpus.find_book(a).is_some_and(|i| corpus.find_book(b) == Some(i))
}

fn chapter_not_found(text: &str, listing: &mut Listing) -> bool {
    debug!("Unresolved token {text:?}: no chapter");
    listing.push_text(Tone::Notice, format!("{text} (chapter not found)"));
    false
}

/// Clamps a candidate into the corpus: chapter first, then verses against
/// the clamped chapter. Returns `None` when the book is unknown or has no
/// chapters.
pub fn clamp(corpus: &Corpus, candidate: &Address) -> Option<(usize, Address)> {
    let book_index = corpus.find_book(&candidate.book)?;
    let book = corpus.book(book_index)?;
    let last_chapter = book.chapters.len().checked_sub(1)?;
    let chapter = candidate.chapter.min(last_chapter);

    let verse_count = book.chapters[chapter].verses.len();
    let (start, end) = match verse_count.checked_sub(1) {
        None => (None, None),
        Some(last) => {
            let (start, end) = match (candidate.start, candidate.end) {
                (None, None) => (0, last),
                (Some(s), None) => (s, s),
                (Some(s), Some(e)) => (s, e),
                (None, Some(e)) => (0, e),
            };
            let start = start.min(last);
            (Some(start), Some(end.min(last).max(start)))
        }
    };

    let canonical = corpus
        .name(book_index)
        .map(|n| normalize(&n.name))
        .unwrap_or_else(|| candidate.book.clone());

    Some((
        book_index,
        Address {
            book: canonical,
            chapter,
            start,
            end,
        },
    ))
}

fn emit(corpus: &Corpus, book_index: usize, addr: &Address, listing: &mut Listing) -> bool {
    let (Some(start), Some(end)) = (addr.start, addr.end) else {
        return false;
    };
    let (Some(book), Some(name)) = (corpus.book(book_index), corpus.name(book_index)) else {
        return false;
    };
    let verses = &book.chapters[addr.chapter].verses;

    for (i, verse) in verses.iter().enumerate().take(end + 1).skip(start) {
        listing.push(vec![
            Segment::new(
                Tone::Reference,
                format!("{} {}:{}", name.abbr, addr.chapter + 1, i + 1),
            ),
            Segment::new(Tone::Plain, format!(" {verse}")),
        ]);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_corpus;

    fn run(tokens: &[&str]) -> (Listing, Option<Address>) {
        let corpus = fixture_corpus();
        let mut listing = Listing::new();
        let mut prev = None;
        for token in tokens {
            resolve(&corpus, token, &mut prev, &mut listing);
        }
        (listing, prev)
    }

    #[test]
    fn test_try_match_book_variants() {
        let m = try_match_book("1 peter 3:15-18").unwrap();
        assert_eq!(m.name, "1 peter");
        assert_eq!(m.rest, " 3:15-18");

        let m = try_match_book("song of solomon 2").unwrap();
        assert_eq!(m.name, "song of solomon");

        let m = try_match_book("john3:16").unwrap();
        assert_eq!(m.name, "john");
        assert_eq!(m.rest, "3:16");

        assert!(try_match_book("3:16").is_none());
        assert!(try_match_book(":4").is_none());
    }

    #[test]
    fn test_locate_precedence() {
        assert_eq!(
            locate(" 3:15-18"),
            Some(Locator::ChapterVerse {
                chapter: 3,
                start: 15,
                end: Some(18)
            })
        );
        assert_eq!(locate(" 4"), Some(Locator::Chapter(4)));
        assert_eq!(
            locate(":20-22"),
            Some(Locator::Verses {
                start: 20,
                end: Some(22)
            })
        );
        assert_eq!(locate(" "), None);
    }

    #[test]
    fn test_numeral_saturates_on_overflow() {
        assert_eq!(numeral("99999999999999999999999999"), usize::MAX);
    }

    #[test]
    #[should_panic(expected = "non-numeral")]
    fn test_numeral_rejects_non_digits() {
        numeral("3a");
    }

    #[test]
    fn test_single_verse() {
        let (listing, prev) = run(&["john 3:16"]);
        assert_eq!(listing.len(), 1);
        assert_eq!(
            listing.texts()[0],
            "Jn 3:16 For God so loved the world, that he gave his only Son"
        );
        assert_eq!(
            prev,
            Some(Address {
                book: "john".into(),
                chapter: 2,
                start: Some(15),
                end: Some(15)
            })
        );
    }

    #[test]
    fn test_verse_range_in_document_order() {
        let (listing, _) = run(&["1 peter 3:15-18"]);
        let refs: Vec<String> = listing
            .lines()
            .iter()
            .map(|l| l.segments[0].text.clone())
            .collect();
        assert_eq!(refs, vec!["1 Pet 3:15", "1 Pet 3:16", "1 Pet 3:17", "1 Pet 3:18"]);
    }

    #[test]
    fn test_whole_chapter() {
        let (listing, _) = run(&["jude 1"]);
        assert_eq!(listing.len(), 25);
    }

    #[test]
    fn test_chain_inherits_book() {
        let (listing, prev) = run(&["1 peter 3:15-18", " 4:11"]);
        assert_eq!(listing.len(), 5);
        assert_eq!(listing.lines()[4].segments[0].text, "1 Pet 4:11");
        assert_eq!(prev.unwrap().book, "1 peter");
    }

    #[test]
    fn test_verse_fragment_inherits_chapter() {
        let (listing, _) = run(&["john 3:16", ":18-19"]);
        let texts = listing.texts();
        assert_eq!(texts.len(), 3);
        assert!(texts[1].starts_with("Jn 3:18 "));
        assert!(texts[2].starts_with("Jn 3:19 "));
    }

    #[test]
    fn test_duplicate_address_is_suppressed() {
        let corpus = fixture_corpus();
        let mut listing = Listing::new();
        let mut prev = None;
        assert!(resolve(&corpus, "john 3:16", &mut prev, &mut listing));
        assert!(!resolve(&corpus, "john 3:16", &mut prev, &mut listing));
        assert!(!resolve(&corpus, "jn 3:16", &mut prev, &mut listing));
        assert_eq!(listing.len(), 1);
    }

    #[test]
    fn test_chapter_clamped_to_last() {
        let (listing, prev) = run(&["jude 999"]);
        assert_eq!(listing.len(), 25);
        assert_eq!(prev.unwrap().chapter, 0);

        let (_, prev) = run(&["genesis 999:1"]);
        assert_eq!(prev.unwrap().chapter, 5);
    }

    #[test]
    fn test_verse_clamped_after_chapter_clamp() {
        let (listing, prev) = run(&["john 3:16", "3:99"]);
        assert_eq!(listing.len(), 2);
        assert!(listing.texts()[1].starts_with("Jn 3:36 "));
        let prev = prev.unwrap();
        assert_eq!(prev.book, "john");
        assert_eq!(prev.chapter, 2);
        assert_eq!(prev.end, Some(35));
    }

    #[test]
    fn test_reversed_range_collapses_to_start() {
        let (listing, _) = run(&["john 3:18-15"]);
        assert_eq!(listing.len(), 1);
        assert!(listing.texts()[0].starts_with("Jn 3:18 "));
    }

    #[test]
    fn test_zero_numbers_clamp_to_first() {
        let (listing, prev) = run(&["john 0:0"]);
        assert_eq!(listing.len(), 1);
        assert_eq!(prev.unwrap().chapter, 0);
    }

    #[test]
    fn test_book_not_found_without_previous() {
        let (listing, prev) = run(&["3:16"]);
        assert_eq!(listing.texts(), vec!["3:16 (book not found)"]);
        assert_eq!(listing.lines()[0].segments[0].tone, Tone::Notice);
        assert!(prev.is_none());
    }

    #[test]
    fn test_chapter_not_found() {
        let (listing, _) = run(&["1 peter"]);
        assert_eq!(listing.texts(), vec!["1 peter (chapter not found)"]);
    }

    #[test]
    fn test_verse_fragment_without_chapter_context() {
        let (listing, _) = run(&[":4"]);
        assert_eq!(listing.texts(), vec![":4 (book not found)"]);

        let (listing, _) = run(&["john :4"]);
        assert_eq!(listing.texts(), vec!["john :4 (chapter not found)"]);

        let (listing, _) = run(&["john 3:16", "jn :17"]);
        assert_eq!(listing.len(), 2);
        assert!(listing.texts()[1].starts_with("Jn 3:17 "));
    }

    #[test]
    fn test_unknown_book_is_silent_but_carried() {
        let (listing, prev) = run(&["hezekiah 3:1", "4:2"]);
        assert!(listing.is_empty());
        assert_eq!(prev.unwrap().book, "hezekiah");
    }

    #[test]
    fn test_multiword_book_name() {
        let (listing, _) = run(&["Song  of   Solomon 2:1"]);
        assert_eq!(listing.len(), 1);
        assert!(listing.texts()[0].starts_with("Song 2:1 "));
    }
}

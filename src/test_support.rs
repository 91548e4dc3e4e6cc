//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::corpus::{Book, BookName, Chapter, Corpus};
use crate::core::state::Session;

/// Filler verse text. Deliberately free of the phrases tests search for.
fn filler(abbr: &str, chapter: usize, verse: usize) -> String {
    format!("Text of {abbr} chapter {chapter} line {verse}.")
}

/// Builds a book from per-chapter verse counts plus hand-written verses
/// given as `(chapter, verse, text)`, all 1-based.
fn book(abbr: &str, verse_counts: &[usize], special: &[(usize, usize, &str)]) -> Book {
    let chapters = verse_counts
        .iter()
        .enumerate()
        .map(|(c, &count)| Chapter {
            verses: (0..count)
                .map(|v| {
                    special
                        .iter()
                        .find(|(sc, sv, _)| *sc == c + 1 && *sv == v + 1)
                        .map(|(_, _, text)| text.to_string())
                        .unwrap_or_else(|| filler(abbr, c + 1, v + 1))
                })
                .collect(),
        })
        .collect();
    Book { chapters }
}

/// A five-book corpus: Genesis, John, 1 Peter, Jude, Song of Solomon.
///
/// "grace" appears in Gen 6:8, Jn 1:14, 1:16 (twice), 1:17 and 1 Pet 4:10.
pub fn fixture_corpus() -> Corpus {
    let books = vec![
        book(
            "Gen",
            &[10, 10, 10, 10, 10, 10],
            &[(6, 8, "But Noah found grace in the eyes of the LORD.")],
        ),
        book(
            "Jn",
            &[18, 12, 36],
            &[
                (1, 14, "And the Word became flesh, full of grace and truth."),
                (1, 16, "From his fullness we have all received, grace upon grace."),
                (1, 17, "Grace and truth came through Jesus Christ."),
                (3, 16, "For God so loved the world, that he gave his only Son"),
            ],
        ),
        book(
            "1 Pet",
            &[25, 25, 22, 19, 14],
            &[(4, 10, "As good stewards of God's varied grace.")],
        ),
        book("Jude", &[25], &[]),
        book("Song", &[17, 17], &[]),
    ];
    let names = vec![
        BookName::new("Genesis", "Gen"),
        BookName::new("John", "Jn"),
        BookName::new("1 Peter", "1 Pet"),
        BookName::new("Jude", "Jude"),
        BookName::new("Song of Solomon", "Song"),
    ];
    Corpus::new(books, names).expect("fixture corpus is consistent")
}

/// A session over [`fixture_corpus`] with default settings.
pub fn fixture_session() -> Session {
    Session::new(fixture_corpus())
}

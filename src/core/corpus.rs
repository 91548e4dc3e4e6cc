//! # Corpus
//!
//! The in-memory document: Books → Chapters → Verses, plus the book-name
//! table that shares its index space.
//!
//! ```text
//! Corpus
//! ├── books: Vec<Book>          // canonical order
//! │   └── chapters: Vec<Chapter>
//! │       └── verses: Vec<String>
//! ├── names: Vec<BookName>      // names[i] describes books[i]
//! └── index: BookIndex          // normalized name → book index
//! ```
//!
//! Indices are 0-based here; every user-facing address is 1-based.
//! A `Corpus` is immutable once built and shared read-only by the
//! input and render tasks.

use std::collections::HashMap;

use super::loader::LoadError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chapter {
    pub verses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Book {
    pub chapters: Vec<Chapter>,
}

/// One row of the book-name table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookName {
    /// Canonical name, e.g. "1 Peter".
    pub name: String,
    /// Display abbreviation, e.g. "1 Pet".
    pub abbr: String,
}

impl BookName {
    pub fn new(name: impl Into<String>, abbr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            abbr: abbr.into(),
        }
    }
}

/// Lowercases, trims, and collapses internal whitespace runs to one space.
///
/// Every lookup key and every token goes through this before matching.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalized book name → book index.
#[derive(Debug, Clone, Default)]
pub struct BookIndex {
    keys: HashMap<String, usize>,
}

impl BookIndex {
    /// Builds the lookup table from the book-name rows.
    ///
    /// Names always win. Abbreviations are added as secondary keys only
    /// when they do not shadow a name or an earlier abbreviation.
    pub fn build(names: &[BookName]) -> Self {
        let mut keys = HashMap::with_capacity(names.len() * 2);
        for (i, row) in names.iter().enumerate() {
            keys.insert(normalize(&row.name), i);
        }
        for (i, row) in names.iter().enumerate() {
            let abbr = normalize(&row.abbr);
            if !abbr.is_empty() {
                keys.entry(abbr).or_insert(i);
            }
        }
        Self { keys }
    }

    /// Looks up an already-normalized key.
    pub fn get(&self, key: &str) -> Option<usize> {
        self.keys.get(key).copied()
    }
}

#[derive(Debug, Clone)]
pub struct Corpus {
    books: Vec<Book>,
    names: Vec<BookName>,
    index: BookIndex,
}

impl Corpus {
    /// Pairs the parsed books with their name rows.
    ///
    /// Row *i* of `names` describes book *i*; a count mismatch or an empty
    /// document is rejected instead of risking out-of-range lookups later.
    pub fn new(books: Vec<Book>, names: Vec<BookName>) -> Result<Self, LoadError> {
        if books.is_empty() {
            return Err(LoadError::Empty);
        }
        if books.len() != names.len() {
            return Err(LoadError::CountMismatch {
                books: books.len(),
                names: names.len(),
            });
        }
        let index = BookIndex::build(&names);
        Ok(Self {
            books,
            names,
            index,
        })
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn names(&self) -> &[BookName] {
        &self.names
    }

    pub fn book(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    pub fn name(&self, index: usize) -> Option<&BookName> {
        self.names.get(index)
    }

    /// Finds a book by free-form name (normalized before lookup).
    pub fn find_book(&self, name: &str) -> Option<usize> {
        self.index.get(&normalize(name))
    }

    pub fn chapter_count(&self) -> usize {
        self.books.iter().map(|b| b.chapters.len()).sum()
    }

    pub fn verse_count(&self) -> usize {
        self.books
            .iter()
            .flat_map(|b| b.chapters.iter())
            .map(|c| c.verses.len())
            .sum()
    }
}

//! # Corpus Loader
//!
//! Reads the verse document and the book-name table at startup.
//!
//! The document is XML: any root element wrapping `<b>` books, each holding
//! `<c>` chapters, each holding `<v>` verses. The book table is one
//! `Name,Abbreviation` row per book, in document order.
//!
//! Any failure here is fatal: the session never starts on partial data.

use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, info};
use quick_xml::Reader;
use quick_xml::events::Event;

use super::corpus::{Book, BookName, Chapter, Corpus};

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum LoadError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Xml {
        position: usize,
        source: quick_xml::Error,
    },
    /// A `<c>` outside a `<b>`, or a `<v>` outside a `<c>`.
    Structure(String),
    /// The book table is not readable CSV.
    Csv(csv::Error),
    /// A book-table row without both a name and an abbreviation.
    BookRow { line: usize, row: String },
    CountMismatch { books: usize, names: usize },
    Empty,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => write!(f, "cannot read {path}: {source}"),
            LoadError::Xml { position, source } => {
                write!(f, "malformed corpus XML at byte {position}: {source}")
            }
            LoadError::Structure(msg) => write!(f, "malformed corpus structure: {msg}"),
            LoadError::Csv(e) => write!(f, "malformed book table: {e}"),
            LoadError::BookRow { line, row } => {
                write!(f, "book table line {line}: expected `Name,Abbreviation`, got {row:?}")
            }
            LoadError::CountMismatch { books, names } => write!(
                f,
                "corpus has {books} books but the book table has {names} rows"
            ),
            LoadError::Empty => write!(f, "corpus contains no books"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Xml { source, .. } => Some(source),
            LoadError::Csv(source) => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Loads and pairs the corpus document and its book table.
pub fn load(corpus_path: &Path, books_path: &Path) -> Result<Corpus, LoadError> {
    let xml = read(corpus_path)?;
    let table = read(books_path)?;

    let books = parse_books(&xml)?;
    let names = parse_book_table(&table)?;
    let corpus = Corpus::new(books, names)?;

    info!(
        "Loaded corpus from {}: {} books, {} chapters, {} verses",
        corpus_path.display(),
        corpus.books().len(),
        corpus.chapter_count(),
        corpus.verse_count()
    );
    Ok(corpus)
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Parses the `<b>/<c>/<v>` document into books.
pub fn parse_books(xml: &str) -> Result<Vec<Book>, LoadError> {
    // No per-event trimming: text around inline markup keeps its spaces.
    // Each verse is tidied once, when it closes.
    let mut reader = Reader::from_str(xml);

    let mut books: Vec<Book> = Vec::new();
    let mut book: Option<Book> = None;
    let mut chapter: Option<Chapter> = None;
    let mut verse: Option<String> = None;

    loop {
        let event = reader.read_event().map_err(|source| LoadError::Xml {
            position: reader.buffer_position(),
            source,
        })?;
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"b" => book = Some(Book::default()),
                b"c" => {
                    if book.is_none() {
                        return Err(LoadError::Structure("chapter outside a book".into()));
                    }
                    chapter = Some(Chapter::default());
                }
                b"v" => {
                    if chapter.is_none() {
                        return Err(LoadError::Structure("verse outside a chapter".into()));
                    }
                    verse = Some(String::new());
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"b" => books.push(Book::default()),
                b"c" => match book.as_mut() {
                    Some(b) => b.chapters.push(Chapter::default()),
                    None => {
                        return Err(LoadError::Structure("chapter outside a book".into()));
                    }
                },
                b"v" => match chapter.as_mut() {
                    Some(c) => c.verses.push(String::new()),
                    None => {
                        return Err(LoadError::Structure("verse outside a chapter".into()));
                    }
                },
                _ => {}
            },
            Event::Text(e) => {
                if let Some(text) = verse.as_mut() {
                    let unescaped = e.unescape().map_err(|source| LoadError::Xml {
                        position: reader.buffer_position(),
                        source,
                    })?;
                    text.push_str(&unescaped);
                }
            }
            Event::CData(e) => {
                if let Some(text) = verse.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"v" => {
                    if let (Some(text), Some(c)) = (verse.take(), chapter.as_mut()) {
                        c.verses.push(collapse_whitespace(&text));
                    }
                }
                b"c" => {
                    if let (Some(c), Some(b)) = (chapter.take(), book.as_mut()) {
                        b.chapters.push(c);
                    }
                }
                b"b" => {
                    if let Some(b) = book.take() {
                        books.push(b);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    debug!("Parsed {} books from corpus XML", books.len());
    Ok(books)
}

/// Trims a verse and folds every whitespace run into one space.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses `Name,Abbreviation` rows. Blank lines and a leading byte-order
/// mark are skipped; fields may be double-quoted.
pub fn parse_book_table(table: &str) -> Result<Vec<BookName>, LoadError> {
    let table = table.strip_prefix('\u{feff}').unwrap_or(table);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(table.as_bytes());

    let mut names = Vec::new();
    for result in reader.records() {
        let record = result.map_err(LoadError::Csv)?;
        match (record.get(0), record.get(1)) {
            (Some(name), Some(abbr)) if !name.is_empty() && !abbr.is_empty() => {
                names.push(BookName::new(name, abbr));
            }
            _ => {
                return Err(LoadError::BookRow {
                    line: record.position().map_or(0, |p| p.line() as usize),
                    row: record.iter().collect::<Vec<_>>().join(","),
                });
            }
        }
    }
    Ok(names)
}

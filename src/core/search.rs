//! # Keyphrase Search
//!
//! Full scan of every verse for a phrase, case-insensitively. No index:
//! the corpus is small and searches are paced by typing.
//!
//! Each matching verse becomes one listing line with every occurrence of the
//! phrase marked [`Tone::Found`]. After the scan the books are ranked by how
//! many verses matched and a summary line is appended.

use log::debug;
use regex::{Regex, RegexBuilder};

use super::corpus::Corpus;
use super::listing::{Listing, Segment, Tone};

/// Marks a token as a keyphrase search instead of a citation.
pub const SEARCH_SIGIL: char = '!';

/// Per-book match counts for one search, in canonical book order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    counts: Vec<usize>,
}

impl SearchStats {
    pub fn new(book_count: usize) -> Self {
        Self {
            counts: vec![0; book_count],
        }
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Book indices by descending count. Ties keep canonical order.
    pub fn ranking(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.counts.len()).collect();
        // `sort_by` is stable, which is what keeps ties in book order.
        order.sort_by(|&a, &b| self.counts[b].cmp(&self.counts[a]));
        order
    }
}

/// Scans the corpus for `phrase` and appends one line per matching verse
/// plus a summary line.
///
/// `phrase` is expected normalized and long enough to be worth searching;
/// the token processor filters out anything shorter.
pub fn search(corpus: &Corpus, phrase: &str, listing: &mut Listing) -> SearchStats {
    let mut stats = SearchStats::new(corpus.books().len());
    let matcher = phrase_matcher(phrase);

    for (b, book) in corpus.books().iter().enumerate() {
        let abbr = corpus.name(b).map(|n| n.abbr.as_str()).unwrap_or_default();
        for (c, chapter) in book.chapters.iter().enumerate() {
            for (v, verse) in chapter.verses.iter().enumerate() {
                let Some(segments) = highlight(&matcher, verse) else {
                    continue;
                };
                stats.counts[b] += 1;

                let mut line = Vec::with_capacity(segments.len() + 2);
                line.push(Segment::new(Tone::Reference, format!("{abbr} {}:{}", c + 1, v + 1)));
                line.push(Segment::new(Tone::Plain, " "));
                line.extend(segments);
                listing.push(line);
            }
        }
    }

    listing.push_text(Tone::Summary, summary(corpus, phrase, &stats));
    debug!("Search {phrase:?}: {} verses", stats.total());
    stats
}

fn phrase_matcher(phrase: &str) -> Regex {
    RegexBuilder::new(&regex::escape(phrase))
        .case_insensitive(true)
        .build()
        .expect("escaped phrase is always a valid pattern")
}

/// Splits a verse around every match. `None` when nothing matched.
fn highlight(matcher: &Regex, verse: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut last = 0;
    for m in matcher.find_iter(verse) {
        if m.start() > last {
            segments.push(Segment::new(Tone::Plain, &verse[last..m.start()]));
        }
        segments.push(Segment::new(Tone::Found, m.as_str()));
        last = m.end();
    }
    if segments.is_empty() {
        return None;
    }
    if last < verse.len() {
        segments.push(Segment::new(Tone::Plain, &verse[last..]));
    }
    Some(segments)
}

/// `"grace" Jn (3) Gen (1) 1 Pet (1) [5]`
fn summary(corpus: &Corpus, phrase: &str, stats: &SearchStats) -> String {
    let mut line = format!("\"{phrase}\"");
    for b in stats.ranking() {
        let count = stats.counts[b];
        if count == 0 {
            break;
        }
        let abbr = corpus.name(b).map(|n| n.abbr.as_str()).unwrap_or_default();
        line.push_str(&format!(" {abbr} ({count})"));
    }
    line.push_str(&format!(" [{}]", stats.total()));
    line
}

//! # Listing
//!
//! The display listing built for one render pass: styled lines in
//! top-down order. Core code only tags text with a [`Tone`] and a [`Band`];
//! the TUI decides what those look like.
//!
//! Highlight rotation: each distinct resolved passage or search result is
//! painted on the current band, and the band flips before the next one so
//! neighbouring results stay visually separate.

/// What a piece of text is, not how it looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    /// Book/chapter/verse prefix, e.g. `Jn 3:16`.
    Reference,
    /// Matched keyphrase inside a verse.
    Found,
    /// Search summary line.
    Summary,
    /// Inline diagnostic such as `(book not found)`.
    Notice,
}

/// Alternating highlight slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Band {
    #[default]
    Even,
    Odd,
}

impl Band {
    pub fn next(self) -> Self {
        match self {
            Band::Even => Band::Odd,
            Band::Odd => Band::Even,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub tone: Tone,
    pub text: String,
}

impl Segment {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLine {
    pub band: Band,
    pub segments: Vec<Segment>,
}

impl ListingLine {
    /// The unstyled text of the line.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    lines: Vec<ListingLine>,
    band: Band,
}

impl Listing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line on the current band.
    pub fn push(&mut self, segments: Vec<Segment>) {
        self.lines.push(ListingLine {
            band: self.band,
            segments,
        });
    }

    /// Appends a single-segment line.
    pub fn push_text(&mut self, tone: Tone, text: impl Into<String>) {
        self.push(vec![Segment::new(tone, text)]);
    }

    /// Flips the band for whatever is pushed next.
    pub fn rotate(&mut self) {
        self.band = self.band.next();
    }

    pub fn band(&self) -> Band {
        self.band
    }

    pub fn lines(&self) -> &[ListingLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<ListingLine> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Unstyled text of every line, mostly for assertions and logs.
    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(ListingLine::text).collect()
    }
}

//! # Render Step
//!
//! Decides whether a poke from the input loop needs a repaint and, if so,
//! builds the [`View`] to paint. No terminal access here.
//!
//! ```text
//! poke ─► Tab pending? ─yes─► buffer = normalize(buffer) + suggestion
//!              │
//!              ▼
//!         same text as last paint? ─yes─► Unchanged
//!              │ no
//!              ▼
//!         tokenize → process → View (listing, prompt, suggestion)
//! ```

use log::debug;

use crate::core::action::{self, Effect};
use crate::core::completion;
use crate::core::listing::{Listing, ListingLine};
use crate::core::state::Session;

use super::input::InputState;

/// Everything one paint needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub listing: Vec<ListingLine>,
    /// The literal typed text.
    pub input: String,
    /// Completion hint drawn muted after the input.
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Unchanged,
    Paint(View),
    Quit,
}

pub struct Renderer<'a> {
    session: &'a Session,
    last_rendered: Option<String>,
}

impl<'a> Renderer<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            last_rendered: None,
        }
    }

    /// One render pass over the current input.
    ///
    /// Takes the input mutably only to apply a pending Tab completion.
    pub fn step(&mut self, input: &mut InputState) -> RenderOutcome {
        let corpus = &self.session.corpus;

        if input.tab_pending {
            input.text = completion::complete(corpus, &input.text);
            input.tab_pending = false;
        }

        if self.last_rendered.as_deref() == Some(input.text.as_str()) {
            return RenderOutcome::Unchanged;
        }
        self.last_rendered = Some(input.text.clone());

        let tokens = action::tokenize(&input.text);
        let mut listing = Listing::new();
        if action::process(self.session, &tokens, &mut listing) == Effect::Quit {
            return RenderOutcome::Quit;
        }

        let mut suggestion = completion::suggest(corpus, &input.text);
        // The suggestion is relative to the normalized token, which has no
        // trailing space; avoid showing a doubled one.
        if input.text.ends_with(' ') {
            if let Some(rest) = suggestion.strip_prefix(' ') {
                suggestion = rest.to_string();
            }
        }

        debug!(
            "Render {:?}: {} lines, suggestion {:?}",
            input.text,
            listing.len(),
            suggestion
        );

        RenderOutcome::Paint(View {
            listing: listing.into_lines(),
            input: input.text.clone(),
            suggestion,
        })
    }
}

//! # Input Loop
//!
//! Reads the input stream one byte at a time, applies line-editing rules to
//! the shared buffer, and pokes the render task after every byte.
//!
//! The input loop is the only writer of the text; the render task reads it
//! and clears the Tab request once it has applied the completion. The poke
//! carries no data and the channel holds at most one, so a burst of
//! keystrokes collapses into a single pending render.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};

use super::event::Key;

/// The live line being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    pub text: String,
    /// Set by Tab; the render task applies the completion and clears it.
    pub tab_pending: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one editing key. `Interrupt` is the caller's business and
    /// leaves the buffer untouched.
    pub fn apply(&mut self, key: Key) {
        match key {
            Key::Interrupt => {}
            Key::Backspace => {
                self.text.pop();
            }
            Key::ClearLine => self.text.clear(),
            Key::DeleteWord => self.delete_word(),
            Key::Tab => self.tab_pending = true,
            Key::Space => self.text.push(' '),
            Key::Char(c) => self.text.push(c),
        }
    }

    /// Drops trailing separators, then everything back to the nearest
    /// space or comma. The separator before the word stays.
    fn delete_word(&mut self) {
        let trimmed = self.text.trim_end_matches([' ', ',']);
        let cut = trimmed.rfind([' ', ',']).map_or(0, |i| i + 1);
        self.text.truncate(cut);
    }
}

/// Why the input loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputExit {
    /// Ctrl+C
    Interrupted,
    /// EOF or a read error; treated the same as a quit.
    StreamClosed,
    /// Nobody is rendering anymore.
    RendererGone,
}

/// Runs until interrupt, end of input, or the render side hanging up.
///
/// Every byte read, recognized or not, sends a render poke; the render side
/// skips the work when the text did not change.
pub async fn input_loop<R>(
    mut reader: R,
    input: Arc<Mutex<InputState>>,
    notify: mpsc::Sender<()>,
) -> InputExit
where
    R: AsyncRead + Unpin,
{
    loop {
        let byte = match reader.read_u8().await {
            Ok(byte) => byte,
            Err(e) => {
                info!("Input stream closed: {}", e);
                return InputExit::StreamClosed;
            }
        };

        match Key::from_byte(byte) {
            Some(Key::Interrupt) => {
                info!("Interrupt received");
                return InputExit::Interrupted;
            }
            Some(key) => input.lock().await.apply(key),
            None => debug!("Ignoring byte {byte:#04x}"),
        }

        match notify.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => {}
            Err(TrySendError::Closed(())) => {
                warn!("Render task gone, stopping input loop");
                return InputExit::RendererGone;
            }
        }
    }
}

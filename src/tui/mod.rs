//! # TUI Adapter
//!
//! The terminal-specific layer. Puts the terminal in raw mode, reads raw
//! input bytes, and paints listings with ratatui.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Tasks
//!
//! Two tasks share one [`InputState`]:
//!
//! - **Input loop** (spawned): blocks on one byte at a time from stdin,
//!   edits the buffer, then pokes a one-slot channel.
//! - **Render loop** (this task): waits for a poke, drains any extra ones,
//!   and repaints only if the text changed since the last paint.
//!
//! The session ends on Ctrl+C, on `quit` anywhere in the input, or when
//! stdin closes or fails. The terminal is restored by a drop guard, so every
//! one of those paths (and a panic) leaves the terminal as it was found.

mod event;
mod input;
mod render;
mod ui;

pub use event::Key;
pub use input::{InputExit, InputState, input_loop};
pub use render::{RenderOutcome, Renderer, View};
pub use ui::draw_ui;

use log::info;
use std::io::stdout;
use std::sync::Arc;

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tokio::sync::{Mutex, mpsc};

use crate::core::state::Session;

/// Restores the terminal when dropped.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> std::io::Result<(Self, DefaultTerminal)> {
        let terminal = ratatui::try_init()?;
        // Guard exists from here on, so a failure below still restores.
        let guard = Self;
        // Non-blinking: the cursor is repositioned on every repaint
        execute!(stdout(), Show, SetCursorStyle::SteadyBar)?;
        info!("Terminal in raw mode");
        Ok((guard, terminal))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), SetCursorStyle::DefaultUserShape);
        ratatui::restore();
        info!("Terminal restored");
    }
}

pub async fn run(session: Session) -> std::io::Result<()> {
    let (_guard, mut terminal) = TerminalGuard::new()?;

    let input = Arc::new(Mutex::new(InputState::new()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>(1);

    let reader = tokio::spawn(input_loop(tokio::io::stdin(), input.clone(), notify_tx));

    let result = render_loop(&session, input, notify_rx, |view| {
        terminal.draw(|f| draw_ui(f, view)).map(|_| ())
    })
    .await;

    // Render side is done: quit token, closed channel, or a paint error.
    // The reader may still be parked on stdin.
    reader.abort();
    match reader.await {
        Ok(exit) => info!("Input loop finished: {:?}", exit),
        Err(e) if e.is_cancelled() => info!("Input loop cancelled"),
        Err(e) => info!("Input loop failed: {}", e),
    }
    result
}

/// Repaints through `paint` until a quit or until the input side hangs up.
///
/// A burst of pokes costs one render step: after waking, any pokes that
/// queued meanwhile are drained before the next step.
async fn render_loop<P, E>(
    session: &Session,
    input: Arc<Mutex<InputState>>,
    mut notify: mpsc::Receiver<()>,
    mut paint: P,
) -> Result<(), E>
where
    P: FnMut(&View) -> Result<(), E>,
{
    let mut renderer = Renderer::new(session);

    loop {
        let outcome = {
            let mut state = input.lock().await;
            renderer.step(&mut state)
        };

        match outcome {
            RenderOutcome::Unchanged => {}
            RenderOutcome::Paint(view) => paint(&view)?,
            RenderOutcome::Quit => {
                info!("Session ended by quit command");
                return Ok(());
            }
        }

        // Sender dropped: the input loop has ended
        if notify.recv().await.is_none() {
            return Ok(());
        }
        while notify.try_recv().is_ok() {}
    }
}

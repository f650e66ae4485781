//! Renderer seam and a plain-text implementation.

use crate::orchestrator::{AssemblyEvent, BoardUnavailable};
use std::io::Write;
use std::sync::{Mutex, PoisonError};
use strictly_trivia_core::{Board, RevealOutcome, RevealState};
use tracing::warn;

/// Consumes finished boards and reveal notifications.
///
/// `show_board` and `show_unavailable` run while the session holds its
/// board lock; implementations must not call back into the session.
pub trait BoardRenderer: Send + Sync {
    /// Paint a freshly assembled board.
    fn show_board(&self, generation: u64, board: &Board);

    /// Update one cell after a reveal.
    fn show_reveal(&self, outcome: &RevealOutcome);

    /// Tell the player no board could be assembled.
    fn show_unavailable(&self, generation: u64, error: &BoardUnavailable);

    /// Optional assembly progress.
    fn show_progress(&self, _event: &AssemblyEvent) {}
}

/// Dollar value shown on a hidden cell in row `row` (0-based).
pub fn cell_value(row: usize) -> usize {
    (row + 1) * 200
}

/// Formats a board as one block per category.
pub fn format_board(board: &Board) -> String {
    let mut out = String::new();
    for (c, category) in board.categories().iter().enumerate() {
        out.push_str(&format!("[{}] {}\n", c + 1, category.title()));
        for (r, clue) in category.clues().iter().enumerate() {
            let cell = match clue.state() {
                RevealState::Hidden => format!("${}", cell_value(r)),
                RevealState::ShowingQuestion => format!("Q: {}", clue.question()),
                RevealState::ShowingAnswer => format!("A: {}", clue.answer()),
            };
            out.push_str(&format!("  {}. {}\n", r + 1, cell));
        }
    }
    out
}

/// One-line description of a progress event.
pub fn format_progress(event: &AssemblyEvent) -> String {
    match event {
        AssemblyEvent::AttemptStarted {
            attempt,
            max_attempts,
        } => format!("Building board (attempt {attempt}/{max_attempts})..."),
        AssemblyEvent::CategoryAccepted { title, .. } => format!("  + {title}"),
        AssemblyEvent::CategoryRejected { name, reason, .. } => format!("  - {name}: {reason}"),
        AssemblyEvent::AttemptFailed { failure, .. } => format!("Attempt failed: {failure}"),
        AssemblyEvent::RetryScheduled { delay, .. } => {
            format!("Retrying in {} ms", delay.as_millis())
        }
        AssemblyEvent::BoardReady { attempt } => format!("Board ready after {attempt} attempt(s)"),
    }
}

/// Writes plain text to any writer (stdout by default).
#[derive(Debug)]
pub struct TextRenderer<W: Write + Send> {
    out: Mutex<W>,
}

impl TextRenderer<std::io::Stdout> {
    /// Renders to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TextRenderer<W> {
    /// Renders to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{text}").and_then(|_| out.flush()) {
            warn!(error = %e, "Failed to write output");
        }
    }
}

impl<W: Write + Send> BoardRenderer for TextRenderer<W> {
    fn show_board(&self, _generation: u64, board: &Board) {
        self.write(format_board(board).trim_end());
    }

    fn show_reveal(&self, outcome: &RevealOutcome) {
        let label = match outcome.state {
            RevealState::ShowingAnswer => "A",
            _ => "Q",
        };
        self.write(&format!(
            "[{}.{}] {}: {}",
            outcome.category + 1,
            outcome.clue + 1,
            label,
            outcome.text
        ));
    }

    fn show_unavailable(&self, _generation: u64, error: &BoardUnavailable) {
        self.write(&format!("Could not build a board: {error}. Type `new` to try again."));
    }

    fn show_progress(&self, event: &AssemblyEvent) {
        self.write(&format_progress(event));
    }
}

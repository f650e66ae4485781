//! Two-stage clue reveal.
//!
//! Every clue walks `Hidden -> ShowingQuestion -> ShowingAnswer` and then
//! stays put. The state lives in an atomic cell so a shared `&Board` can be
//! revealed from concurrent interaction handlers without a lock: each
//! advance is a single compare-and-set.

use crate::types::Board;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::{debug, instrument};

/// What a board cell currently shows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum RevealState {
    /// Nothing revealed; the cell shows its value.
    Hidden,
    /// The question is visible.
    ShowingQuestion,
    /// The answer is visible. Terminal.
    ShowingAnswer,
}

impl RevealState {
    /// Returns the state one reveal later.
    ///
    /// `ShowingAnswer` maps to itself.
    pub fn next(self) -> Self {
        match self {
            RevealState::Hidden => RevealState::ShowingQuestion,
            RevealState::ShowingQuestion => RevealState::ShowingAnswer,
            RevealState::ShowingAnswer => RevealState::ShowingAnswer,
        }
    }

    /// Returns true once no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, RevealState::ShowingAnswer)
    }

    fn to_bits(self) -> u8 {
        match self {
            RevealState::Hidden => 0,
            RevealState::ShowingQuestion => 1,
            RevealState::ShowingAnswer => 2,
        }
    }

    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => RevealState::Hidden,
            1 => RevealState::ShowingQuestion,
            _ => RevealState::ShowingAnswer,
        }
    }
}

/// Atomic holder of a clue's [`RevealState`].
#[derive(Debug)]
pub struct RevealCell(AtomicU8);

impl RevealCell {
    /// Creates a cell in the given state.
    pub fn new(state: RevealState) -> Self {
        Self(AtomicU8::new(state.to_bits()))
    }

    /// Current state.
    pub fn get(&self) -> RevealState {
        RevealState::from_bits(self.0.load(Ordering::Acquire))
    }

    /// Advances one stage and returns `(previous, current)`.
    ///
    /// A terminal cell is left unchanged and reports `previous == current`.
    pub fn advance(&self) -> (RevealState, RevealState) {
        let previous = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                let state = RevealState::from_bits(bits);
                (!state.is_terminal()).then(|| state.next().to_bits())
            })
            .unwrap_or_else(|bits| bits);
        let previous = RevealState::from_bits(previous);
        (previous, previous.next())
    }
}

impl Default for RevealCell {
    fn default() -> Self {
        Self::new(RevealState::Hidden)
    }
}

impl Clone for RevealCell {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl PartialEq for RevealCell {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Eq for RevealCell {}

impl Serialize for RevealCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.get().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RevealCell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RevealState::deserialize(deserializer).map(RevealCell::new)
    }
}

/// Result of one reveal interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevealOutcome {
    /// Column of the clue.
    pub category: usize,
    /// Row of the clue.
    pub clue: usize,
    /// State before the interaction.
    pub previous: RevealState,
    /// State after the interaction.
    pub state: RevealState,
    /// Text the cell should now display.
    pub text: String,
}

impl RevealOutcome {
    /// Returns true if the interaction moved the clue to a new state.
    pub fn changed(&self) -> bool {
        self.previous != self.state
    }
}

/// Applies reveal interactions to a board.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClueRevealMachine;

impl ClueRevealMachine {
    /// Advances the clue at `(category, clue)` by one stage.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range. Callers only emit indices of
    /// cells they were given, so a bad index is a bug, not user input.
    #[instrument(skip(board))]
    pub fn reveal(board: &Board, category: usize, clue: usize) -> RevealOutcome {
        let Some(target) = board.clue(category, clue) else {
            panic!(
                "Reveal requested for nonexistent cell ({category}, {clue}) on a {}x{} board",
                board.categories().len(),
                board.categories().first().map_or(0, |c| c.clues().len()),
            );
        };

        let (previous, state) = target.advance();
        let text = match state {
            RevealState::ShowingAnswer => target.answer().clone(),
            _ => target.question().clone(),
        };

        debug!(%previous, %state, "Clue revealed");
        RevealOutcome {
            category,
            clue,
            previous,
            state,
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use strum::IntoEnumIterator;

    #[test]
    fn test_next_is_monotonic() {
        for state in RevealState::iter() {
            assert!(state.next() >= state);
        }
    }

    #[test]
    fn test_cell_advances_then_sticks() {
        let cell = RevealCell::default();
        assert_eq!(cell.advance(), (RevealState::Hidden, RevealState::ShowingQuestion));
        assert_eq!(cell.advance(), (RevealState::ShowingQuestion, RevealState::ShowingAnswer));
        assert_eq!(cell.advance(), (RevealState::ShowingAnswer, RevealState::ShowingAnswer));
        assert_eq!(cell.get(), RevealState::ShowingAnswer);
    }

    #[test]
    fn test_concurrent_advances_never_skip_a_stage() {
        let cell = Arc::new(RevealCell::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cell = Arc::clone(&cell);
                std::thread::spawn(move || cell.advance())
            })
            .collect();
        let transitions: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|(from, to)| from != to)
            .collect();
        assert_eq!(transitions.len(), 2);
        assert!(transitions.contains(&(RevealState::Hidden, RevealState::ShowingQuestion)));
        assert!(transitions.contains(&(RevealState::ShowingQuestion, RevealState::ShowingAnswer)));
    }

    #[test]
    fn test_cell_serializes_as_state() {
        let cell = RevealCell::new(RevealState::ShowingQuestion);
        let json = serde_json::to_string(&cell).unwrap();
        assert_eq!(json, "\"ShowingQuestion\"");
        let back: RevealCell = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cell);
    }
}

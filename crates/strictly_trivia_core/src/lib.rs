//! Strictly Trivia core - pure board logic.
//!
//! Everything here is synchronous and free of I/O:
//!
//! - **Decoding**: entity-escaped source text to literal text ([`decode`])
//! - **Deduplication**: first N unique questions of a page ([`dedupe_take`])
//! - **Board types**: [`Clue`], [`Category`], [`Board`] with checked invariants
//! - **Reveal**: the two-stage [`ClueRevealMachine`]
//!
//! # Example
//!
//! ```
//! use strictly_trivia_core::{Board, BoardShape, Category, Clue, ClueRevealMachine, RevealState};
//!
//! let category = Category::new("Science", vec![Clue::new("H2O?", "Water")]).unwrap();
//! let board = Board::new(BoardShape::new(1, 1), vec![category]).unwrap();
//!
//! ClueRevealMachine::reveal(&board, 0, 0);
//! let outcome = ClueRevealMachine::reveal(&board, 0, 0);
//! assert_eq!(outcome.state, RevealState::ShowingAnswer);
//! assert_eq!(outcome.text, "Water");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod decode;
mod dedupe;
mod invariants;
mod raw;
mod reveal;
mod types;

pub use decode::{decode, normalize};
pub use dedupe::{Insufficient, dedupe_take};
pub use invariants::{
    BoardInvariants, BoardShapeInvariant, DistinctQuestionsInvariant, Invariant, InvariantSet,
    InvariantViolation,
};
pub use raw::{CategoryId, CategoryRef, RawQuestion};
pub use reveal::{ClueRevealMachine, RevealCell, RevealOutcome, RevealState};
pub use types::{Board, BoardError, BoardShape, Category, Clue};

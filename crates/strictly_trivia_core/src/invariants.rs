//! First-class board invariants.
//!
//! Invariants are logical properties every assembled [`Board`] satisfies.
//! They are checked when a board is constructed and can be tested on their own.

use crate::types::{Board, Category};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants checked together.
///
/// Implemented for tuples of [`Invariant`]s.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// The board has exactly K categories of exactly N clues.
pub struct BoardShapeInvariant;

impl Invariant<Board> for BoardShapeInvariant {
    fn holds(board: &Board) -> bool {
        let shape = board.shape();
        board.categories().len() == shape.categories
            && board
                .categories()
                .iter()
                .all(|c| c.clues().len() == shape.clues)
    }

    fn description() -> &'static str {
        "Board must have exactly K categories of exactly N clues"
    }
}

/// No category repeats a question, comparing normalized text.
pub struct DistinctQuestionsInvariant;

impl Invariant<Category> for DistinctQuestionsInvariant {
    fn holds(category: &Category) -> bool {
        category.has_distinct_questions()
    }

    fn description() -> &'static str {
        "Questions within a category must be pairwise distinct"
    }
}

impl Invariant<Board> for DistinctQuestionsInvariant {
    fn holds(board: &Board) -> bool {
        board
            .categories()
            .iter()
            .all(<Self as Invariant<Category>>::holds)
    }

    fn description() -> &'static str {
        <Self as Invariant<Category>>::description()
    }
}

/// All board invariants as a composable set.
pub type BoardInvariants = (BoardShapeInvariant, DistinctQuestionsInvariant);

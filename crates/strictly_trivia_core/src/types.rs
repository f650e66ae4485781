//! Board domain types.

use crate::decode::normalize;
use crate::invariants::{
    BoardInvariants, DistinctQuestionsInvariant, Invariant, InvariantSet,
};
use crate::reveal::{RevealCell, RevealState};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{instrument, warn};

/// One question/answer pair and its reveal state.
///
/// Text is immutable after construction; only the reveal state moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    question: String,
    answer: String,
    state: RevealCell,
}

impl Clue {
    /// Creates a hidden clue from already-decoded text.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            state: RevealCell::default(),
        }
    }

    /// Question text.
    pub fn question(&self) -> &String {
        &self.question
    }

    /// Answer text.
    pub fn answer(&self) -> &String {
        &self.answer
    }

    /// Current reveal state.
    pub fn state(&self) -> RevealState {
        self.state.get()
    }

    /// Text to show for the current state, `None` while hidden.
    pub fn visible_text(&self) -> Option<&str> {
        match self.state() {
            RevealState::Hidden => None,
            RevealState::ShowingQuestion => Some(&self.question),
            RevealState::ShowingAnswer => Some(&self.answer),
        }
    }

    pub(crate) fn advance(&self) -> (RevealState, RevealState) {
        self.state.advance()
    }
}

/// A titled column of clues with pairwise distinct questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CategoryFields")]
pub struct Category {
    title: String,
    clues: Vec<Clue>,
}

impl Category {
    /// Creates a category, rejecting repeated questions.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::DuplicateQuestion`] if two clues share a
    /// normalized question.
    #[instrument(skip(title, clues), fields(title = %title.as_ref(), clues = clues.len()))]
    pub fn new(title: impl AsRef<str>, clues: Vec<Clue>) -> Result<Self, BoardError> {
        let category = Self {
            title: title.as_ref().to_string(),
            clues,
        };
        if !<DistinctQuestionsInvariant as Invariant<Category>>::holds(&category) {
            warn!("Category has repeated questions");
            return Err(BoardError::DuplicateQuestion(category.title));
        }
        Ok(category)
    }

    /// Display title.
    pub fn title(&self) -> &String {
        &self.title
    }

    /// Clues in row order.
    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }

    pub(crate) fn has_distinct_questions(&self) -> bool {
        let mut seen = HashSet::new();
        self.clues.iter().all(|c| seen.insert(normalize(&c.question)))
    }
}

/// Board dimensions: `categories` columns of `clues` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{}x{}", categories, clues)]
pub struct BoardShape {
    /// Number of categories (K).
    pub categories: usize,
    /// Clues per category (N).
    pub clues: usize,
}

impl BoardShape {
    /// Creates a shape.
    pub fn new(categories: usize, clues: usize) -> Self {
        Self { categories, clues }
    }
}

/// A complete board: exactly `shape.categories` valid categories of
/// `shape.clues` clues each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardFields")]
pub struct Board {
    shape: BoardShape,
    categories: Vec<Category>,
}

// Deserialized data goes through the constructors.
#[derive(Deserialize)]
struct CategoryFields {
    title: String,
    clues: Vec<Clue>,
}

impl TryFrom<CategoryFields> for Category {
    type Error = BoardError;

    fn try_from(fields: CategoryFields) -> Result<Self, Self::Error> {
        Category::new(fields.title, fields.clues)
    }
}

#[derive(Deserialize)]
struct BoardFields {
    shape: BoardShape,
    categories: Vec<Category>,
}

impl TryFrom<BoardFields> for Board {
    type Error = BoardError;

    fn try_from(fields: BoardFields) -> Result<Self, Self::Error> {
        Board::new(fields.shape, fields.categories)
    }
}

impl Board {
    /// Assembles a board, checking its shape and every category.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvariantViolation`] listing every broken invariant.
    #[instrument(skip(shape, categories), fields(shape = %shape, found = categories.len()))]
    pub fn new(shape: BoardShape, categories: Vec<Category>) -> Result<Self, BoardError> {
        let board = Self { shape, categories };
        BoardInvariants::check_all(&board).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            warn!(%descriptions, "Board rejected");
            BoardError::InvariantViolation(descriptions)
        })?;
        Ok(board)
    }

    /// Declared dimensions.
    pub fn shape(&self) -> BoardShape {
        self.shape
    }

    /// Categories in column order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Looks up a clue by column and row.
    pub fn clue(&self, category: usize, clue: usize) -> Option<&Clue> {
        self.categories.get(category)?.clues.get(clue)
    }

    /// Returns true once every clue shows its answer.
    pub fn is_fully_revealed(&self) -> bool {
        self.categories
            .iter()
            .flat_map(|c| c.clues.iter())
            .all(|c| c.state().is_terminal())
    }
}

/// Reasons a category or board cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum BoardError {
    /// Two clues in the named category share a question.
    #[display("Category {:?} repeats a question", _0)]
    DuplicateQuestion(String),

    /// The board breaks one or more invariants.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for BoardError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(title: &str, n: usize) -> Category {
        let clues = (0..n)
            .map(|i| Clue::new(format!("{title} question {i}"), format!("{title} answer {i}")))
            .collect();
        Category::new(title, clues).unwrap()
    }

    #[test]
    fn test_clue_starts_hidden() {
        let clue = Clue::new("Q", "A");
        assert_eq!(clue.state(), RevealState::Hidden);
        assert_eq!(clue.visible_text(), None);
    }

    #[test]
    fn test_category_rejects_normalized_duplicates() {
        let clues = vec![Clue::new("Who?", "a"), Clue::new("  WHO? ", "b")];
        assert_eq!(
            Category::new("People", clues),
            Err(BoardError::DuplicateQuestion("People".to_string()))
        );
    }

    #[test]
    fn test_board_accepts_exact_shape() {
        let shape = BoardShape::new(2, 3);
        let board = Board::new(shape, vec![category("A", 3), category("B", 3)]).unwrap();
        assert_eq!(board.shape(), shape);
        assert_eq!(board.clue(1, 2).unwrap().question(), "B question 2");
        assert!(board.clue(2, 0).is_none());
        assert!(board.clue(0, 3).is_none());
    }

    #[test]
    fn test_board_rejects_short_board() {
        let result = Board::new(BoardShape::new(3, 3), vec![category("A", 3), category("B", 3)]);
        assert!(matches!(result, Err(BoardError::InvariantViolation(_))));
    }

    #[test]
    fn test_board_rejects_short_category() {
        let result = Board::new(BoardShape::new(2, 3), vec![category("A", 3), category("B", 2)]);
        assert!(matches!(result, Err(BoardError::InvariantViolation(_))));
    }
}

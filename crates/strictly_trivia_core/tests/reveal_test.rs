//! Tests for the clue reveal state machine on assembled boards.

use strictly_trivia_core::{
    Board, BoardShape, Category, Clue, ClueRevealMachine, RevealState, decode,
};

fn sample_board() -> Board {
    let categories = ["History", "Science"]
        .into_iter()
        .map(|title| {
            let clues = (1..=3)
                .map(|row| Clue::new(format!("{title} Q{row}"), format!("{title} A{row}")))
                .collect();
            Category::new(title, clues).expect("Distinct questions")
        })
        .collect();
    Board::new(BoardShape::new(2, 3), categories).expect("Valid board")
}

#[test]
fn test_two_reveals_show_answer_third_is_noop() {
    let board = sample_board();

    let first = ClueRevealMachine::reveal(&board, 1, 2);
    assert_eq!(first.previous, RevealState::Hidden);
    assert_eq!(first.state, RevealState::ShowingQuestion);
    assert_eq!(first.text, "Science Q3");
    assert!(first.changed());

    let second = ClueRevealMachine::reveal(&board, 1, 2);
    assert_eq!(second.state, RevealState::ShowingAnswer);
    assert_eq!(second.text, "Science A3");
    assert!(second.changed());

    let third = ClueRevealMachine::reveal(&board, 1, 2);
    assert_eq!(third.state, RevealState::ShowingAnswer);
    assert_eq!(third.text, second.text);
    assert!(!third.changed());
}

#[test]
fn test_reveal_touches_only_one_clue() {
    let board = sample_board();
    ClueRevealMachine::reveal(&board, 0, 0);

    for (c, category) in board.categories().iter().enumerate() {
        for (r, clue) in category.clues().iter().enumerate() {
            let expected = if (c, r) == (0, 0) {
                RevealState::ShowingQuestion
            } else {
                RevealState::Hidden
            };
            assert_eq!(clue.state(), expected, "cell ({c}, {r})");
        }
    }
}

#[test]
fn test_fully_revealed_after_two_passes() {
    let board = sample_board();
    assert!(!board.is_fully_revealed());
    for _ in 0..2 {
        for c in 0..2 {
            for r in 0..3 {
                ClueRevealMachine::reveal(&board, c, r);
            }
        }
    }
    assert!(board.is_fully_revealed());
}

#[test]
#[should_panic(expected = "nonexistent cell")]
fn test_out_of_range_category_panics() {
    let board = sample_board();
    ClueRevealMachine::reveal(&board, 2, 0);
}

#[test]
#[should_panic(expected = "nonexistent cell")]
fn test_out_of_range_clue_panics() {
    let board = sample_board();
    ClueRevealMachine::reveal(&board, 0, 3);
}

#[test]
fn test_decoded_text_is_what_gets_revealed() {
    let question = decode("Who wrote &quot;Dune&quot;?");
    let category = Category::new("Books", vec![Clue::new(question, "Frank Herbert")]).unwrap();
    let board = Board::new(BoardShape::new(1, 1), vec![category]).unwrap();

    let outcome = ClueRevealMachine::reveal(&board, 0, 0);
    assert_eq!(outcome.text, "Who wrote \"Dune\"?");
}

#[test]
fn test_board_round_trips_through_json_with_state() {
    let board = sample_board();
    ClueRevealMachine::reveal(&board, 0, 1);

    let json = serde_json::to_string(&board).unwrap();
    let restored: Board = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, board);
    assert_eq!(restored.clue(0, 1).unwrap().state(), RevealState::ShowingQuestion);
}

#[test]
fn test_deserializing_short_board_is_rejected() {
    let mut value = serde_json::to_value(sample_board()).unwrap();
    value["shape"]["categories"] = serde_json::json!(6);
    value["shape"]["clues"] = serde_json::json!(5);

    let result: Result<Board, _> = serde_json::from_value(value);
    assert!(result.is_err());
}

#[test]
fn test_deserializing_repeated_questions_is_rejected() {
    let mut value = serde_json::to_value(sample_board()).unwrap();
    value["categories"][0]["clues"][1]["question"] = serde_json::json!("  history q1 ");

    let result: Result<Board, _> = serde_json::from_value(value);
    let error = result.unwrap_err().to_string();
    assert!(error.contains("repeats a question"), "unexpected error: {error}");
}

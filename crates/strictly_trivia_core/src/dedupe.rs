//! First-N unique selection over an oversampled page of questions.

use crate::decode::normalize;
use crate::raw::RawQuestion;
use derive_more::{Display, Error};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Not enough distinct questions in the page to fill a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Only {} unique questions found, {} required", found, required)]
pub struct Insufficient {
    /// Unique questions seen before the input ran out.
    pub found: usize,
    /// Unique questions requested.
    pub required: usize,
}

/// Returns the first `required` records whose normalized question text is unique.
///
/// Records are scanned in input order and the scan stops as soon as
/// `required` records have been kept. Output keeps first-seen order.
///
/// # Errors
///
/// Returns [`Insufficient`] when the input is exhausted first.
#[instrument(skip(records))]
pub fn dedupe_take<I>(records: I, required: usize) -> Result<Vec<RawQuestion>, Insufficient>
where
    I: IntoIterator<Item = RawQuestion>,
{
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(required);
    if required == 0 {
        return Ok(kept);
    }

    for record in records {
        if seen.insert(normalize(record.question())) {
            kept.push(record);
            if kept.len() == required {
                break;
            }
        } else {
            debug!(question = %record.question(), "Dropping duplicate question");
        }
    }

    if kept.len() < required {
        return Err(Insufficient {
            found: kept.len(),
            required,
        });
    }

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(question: &str) -> RawQuestion {
        RawQuestion::new(question, format!("answer to {question}"))
    }

    #[test]
    fn test_unique_input_returns_prefix_in_order() {
        let records: Vec<_> = ["a", "b", "c", "d", "e", "f"].into_iter().map(q).collect();
        let kept = dedupe_take(records.clone(), 4).unwrap();
        assert_eq!(kept, records[..4]);
    }

    #[test]
    fn test_duplicates_skipped_first_seen_wins() {
        let records = vec![q("a"), q("A"), q("b"), q("a "), q("c")];
        let kept = dedupe_take(records, 3).unwrap();
        let questions: Vec<_> = kept.iter().map(|r| r.question().as_str()).collect();
        assert_eq!(questions, ["a", "b", "c"]);
    }

    #[test]
    fn test_entity_escaped_duplicates_detected() {
        let records = vec![
            q("Who said &quot;hi&quot;?"),
            q("Who said \"hi\"?"),
            q("Other"),
        ];
        assert_eq!(
            dedupe_take(records, 3),
            Err(Insufficient { found: 2, required: 3 })
        );
    }

    #[test]
    fn test_insufficient_when_too_few_unique() {
        let records: Vec<_> = ["x", "y", "z", "x", "y", "z", "x", "y", "z", "x"]
            .into_iter()
            .map(q)
            .collect();
        assert_eq!(records.len(), 10);
        assert_eq!(
            dedupe_take(records, 5),
            Err(Insufficient { found: 3, required: 5 })
        );
    }

    #[test]
    fn test_stops_early_once_satisfied() {
        let mut consumed = 0;
        let records = ["a", "b", "c", "d"].into_iter().map(|s| {
            consumed += 1;
            q(s)
        });
        let kept = dedupe_take(records, 2).unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_zero_required_is_empty() {
        assert_eq!(dedupe_take(vec![q("a")], 0).unwrap(), Vec::new());
    }
}

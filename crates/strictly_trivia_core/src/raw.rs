//! Raw records as handed over by a trivia source.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Identifier of a category in the source catalog.
pub type CategoryId = u32;

/// A catalog entry: enough to request a category's questions and to title its column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Serialize, Deserialize, new)]
pub struct CategoryRef {
    /// Source-specific category identifier.
    id: CategoryId,
    /// Display name, possibly entity-escaped.
    #[new(into)]
    name: String,
}

/// One undecoded question/answer pair.
///
/// Both fields may contain entity-escaped characters.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, new)]
pub struct RawQuestion {
    /// Question text.
    #[new(into)]
    question: String,
    /// Answer text.
    #[new(into)]
    answer: String,
}

//! Per-category acquisition: one fetch, deduplicate, validate.

use crate::config::TriviaConfig;
use crate::source::{QuestionSupplier, SourceError};
use derive_more::Display;
use std::sync::Arc;
use strictly_trivia_core::{Category, CategoryRef, Clue, dedupe_take, decode};
use tracing::{debug, info, instrument, warn};

/// Why a category could not fill its column.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum CategoryShortfall {
    /// The source returned fewer records than clues needed.
    #[display("only {} of {} questions returned", returned, required)]
    ShortPage {
        /// Records in the page.
        returned: usize,
        /// Clues needed.
        required: usize,
    },

    /// Enough records came back but too many were repeats.
    #[display("only {} unique of {} required questions", unique, required)]
    Duplicates {
        /// Distinct questions found.
        unique: usize,
        /// Clues needed.
        required: usize,
    },

    /// The request for this category failed.
    #[display("fetch failed: {}", _0)]
    Fetch(String),

    /// The decoded clues did not form a valid category.
    #[display("rejected: {}", _0)]
    Rejected(String),
}

/// Outcome of acquiring one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    /// The category yielded a full column of distinct clues.
    Valid(Category),
    /// The category cannot be used this attempt.
    Invalid(CategoryShortfall),
}

/// Fetches and validates one category's worth of clues.
///
/// Never retries: a shortfall is reported upward so the orchestrator can
/// re-sample.
#[derive(Clone)]
pub struct CategoryAcquirer {
    supplier: Arc<dyn QuestionSupplier>,
    config: TriviaConfig,
}

impl std::fmt::Debug for CategoryAcquirer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryAcquirer")
            .field("shape", &self.config.shape())
            .finish_non_exhaustive()
    }
}

impl CategoryAcquirer {
    /// Creates an acquirer over a question supplier.
    pub fn new(supplier: Arc<dyn QuestionSupplier>, config: TriviaConfig) -> Self {
        Self { supplier, config }
    }

    /// Acquires `category` on the given attempt (1-based).
    ///
    /// # Errors
    ///
    /// Returns the [`SourceError`] only when the whole source is
    /// unavailable. Every other failure is an [`Acquisition::Invalid`].
    #[instrument(skip(self, category), fields(category_id = *category.id(), name = %category.name()))]
    pub async fn acquire(
        &self,
        category: &CategoryRef,
        attempt: u32,
    ) -> Result<Acquisition, SourceError> {
        let required = *self.config.clues_per_category();
        let count = self.config.fetch_count(attempt);
        debug!(required, count, "Requesting questions");

        let page = match self.supplier.fetch_questions(*category.id(), count).await {
            Ok(page) => page,
            Err(e) if e.is_unavailable() => return Err(e),
            Err(e) => {
                warn!(error = %e, "Category fetch failed");
                return Ok(Acquisition::Invalid(CategoryShortfall::Fetch(e.message)));
            }
        };

        if page.len() < required {
            warn!(returned = page.len(), required, "Short page");
            return Ok(Acquisition::Invalid(CategoryShortfall::ShortPage {
                returned: page.len(),
                required,
            }));
        }

        let unique = match dedupe_take(page, required) {
            Ok(unique) => unique,
            Err(insufficient) => {
                warn!(found = insufficient.found, required, "Too many duplicate questions");
                return Ok(Acquisition::Invalid(CategoryShortfall::Duplicates {
                    unique: insufficient.found,
                    required,
                }));
            }
        };

        let clues = unique
            .iter()
            .map(|raw| Clue::new(decode(raw.question()), decode(raw.answer())))
            .collect();

        match Category::new(decode(category.name()), clues) {
            Ok(category) => {
                info!(title = %category.title(), "Category validated");
                Ok(Acquisition::Valid(category))
            }
            Err(e) => {
                warn!(error = %e, "Decoded category failed validation");
                Ok(Acquisition::Invalid(CategoryShortfall::Rejected(e.to_string())))
            }
        }
    }
}

//! Trivia sources: where catalogs and question pages come from.
//!
//! The board pipeline only sees the two traits below. Concrete suppliers:
//! [`OpenTdbClient`] talks to an Open Trivia DB compatible HTTP API and
//! [`FixtureSource`] serves a fixed catalog from memory or a JSON file.

mod fixture;
mod opentdb;

pub use fixture::{FixtureCategory, FixtureError, FixtureSource};
pub use opentdb::OpenTdbClient;

use async_trait::async_trait;
use derive_more::Display;
use strictly_trivia_core::{CategoryId, CategoryRef, RawQuestion};
use tracing::{instrument, warn};

/// Supplies the full category catalog.
#[async_trait]
pub trait CategoryCatalog: Send + Sync {
    /// Lists every category the source can serve.
    async fn list_categories(&self) -> Result<Vec<CategoryRef>, SourceError>;
}

/// Supplies raw question pages for one category.
#[async_trait]
pub trait QuestionSupplier: Send + Sync {
    /// Fetches up to `count` raw questions for `category`.
    ///
    /// The page may be shorter than `count` and may contain repeats.
    async fn fetch_questions(
        &self,
        category: CategoryId,
        count: usize,
    ) -> Result<Vec<RawQuestion>, SourceError>;
}

/// A source that can both list categories and serve their questions.
pub trait TriviaSource: CategoryCatalog + QuestionSupplier {}

impl<T: CategoryCatalog + QuestionSupplier> TriviaSource for T {}

/// Broad classes of source failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SourceErrorKind {
    /// The source cannot serve anything right now (down, unreachable, rate limited).
    #[display("source unavailable")]
    Unavailable,
    /// One request was rejected or failed; others may still succeed.
    #[display("request failed")]
    Request,
    /// The response could not be understood.
    #[display("malformed response")]
    Malformed,
}

/// Error returned by a trivia source, with location tracking.
#[derive(Debug, Clone, Display)]
#[display("Source error ({}): {} at {}:{}", kind, message, file, line)]
pub struct SourceError {
    /// Failure class.
    pub kind: SourceErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SourceError {
    /// Creates a new source error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        warn!(%kind, error_message = %message, "Source error created");
        Self {
            kind,
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// The whole source is down; further requests in this attempt are pointless.
    #[track_caller]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Unavailable, message)
    }

    /// A single request failed.
    #[track_caller]
    pub fn request(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Request, message)
    }

    /// The response body was not what the source promised.
    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Malformed, message)
    }

    /// Returns true when the error means the whole source is down.
    pub fn is_unavailable(&self) -> bool {
        self.kind == SourceErrorKind::Unavailable
    }
}

impl std::error::Error for SourceError {}

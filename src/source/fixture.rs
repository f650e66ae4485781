//! Offline trivia source backed by a fixed catalog.
//!
//! The JSON file format is:
//!
//! ```json
//! {"categories": [{"id": 1, "name": "Science", "questions": [{"question": "...", "answer": "..."}]}]}
//! ```

use super::{CategoryCatalog, QuestionSupplier, SourceError};
use async_trait::async_trait;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::path::Path;
use strictly_trivia_core::{CategoryId, CategoryRef, RawQuestion};
use tracing::{debug, info, instrument};

/// One category of a fixture catalog with all of its questions.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, new)]
pub struct FixtureCategory {
    /// Category identifier.
    id: CategoryId,
    /// Display name.
    #[new(into)]
    name: String,
    /// Every question the category can serve, in page order.
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FixtureFile {
    categories: Vec<FixtureCategory>,
}

/// Serves a fixed catalog.
///
/// A page for a category is its first `count` questions; unknown ids get an
/// empty page.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    categories: Vec<FixtureCategory>,
}

impl FixtureSource {
    /// Creates a source from in-memory categories.
    #[instrument(skip(categories), fields(count = categories.len()))]
    pub fn new(categories: Vec<FixtureCategory>) -> Self {
        debug!("Creating fixture source");
        Self { categories }
    }

    /// Loads a catalog from a JSON file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| FixtureError::new(format!("Failed to read fixture: {}", e)))?;
        let file: FixtureFile = serde_json::from_str(&content)
            .map_err(|e| FixtureError::new(format!("Failed to parse fixture: {}", e)))?;

        info!(categories = file.categories.len(), "Fixture loaded");
        Ok(Self::new(file.categories))
    }

    /// Categories in catalog order.
    pub fn categories(&self) -> &[FixtureCategory] {
        &self.categories
    }
}

#[async_trait]
impl CategoryCatalog for FixtureSource {
    async fn list_categories(&self) -> Result<Vec<CategoryRef>, SourceError> {
        Ok(self
            .categories
            .iter()
            .map(|c| CategoryRef::new(c.id, c.name.clone()))
            .collect())
    }
}

#[async_trait]
impl QuestionSupplier for FixtureSource {
    async fn fetch_questions(
        &self,
        category: CategoryId,
        count: usize,
    ) -> Result<Vec<RawQuestion>, SourceError> {
        let page = self
            .categories
            .iter()
            .find(|c| c.id == category)
            .map(|c| c.questions.iter().take(count).cloned().collect())
            .unwrap_or_default();
        Ok(page)
    }
}

/// Fixture loading error.
#[derive(Debug, Clone, Display, Error)]
#[display("Fixture error: {} at {}:{}", message, file, line)]
pub struct FixtureError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl FixtureError {
    /// Creates a new fixture error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

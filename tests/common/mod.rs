//! Shared test doubles: a scripted trivia source and a recording renderer.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use strictly_trivia::{
    AssemblyEvent, Board, BoardRenderer, BoardUnavailable, CategoryCatalog, CategoryId,
    CategoryRef, QuestionSupplier, RawQuestion, RevealOutcome, SourceError, TriviaConfig,
};
use tokio::sync::Notify;

/// Config with no pauses and a fixed seed.
pub fn fast_config() -> TriviaConfig {
    TriviaConfig::default()
        .with_retry_delay_ms(0)
        .with_min_request_interval_ms(0)
        .with_seed(42)
}

/// `count` distinct questions for category `id`.
pub fn questions(id: CategoryId, count: usize) -> Vec<RawQuestion> {
    (0..count)
        .map(|q| RawQuestion::new(format!("Cat {id} question {q}?"), format!("Answer {q}")))
        .collect()
}

/// Catalog entries for the given ids, named `Category <id>`.
pub fn catalog(ids: impl IntoIterator<Item = CategoryId>) -> Vec<CategoryRef> {
    ids.into_iter()
        .map(|id| CategoryRef::new(id, format!("Category {id}")))
        .collect()
}

enum Page {
    Questions(Vec<RawQuestion>),
    Unavailable,
    Failing,
}

/// A source whose catalogs and pages are scripted per test.
///
/// Catalog call `i` returns `catalogs[i]`, repeating the last entry once the
/// script runs out. Unknown categories get ten distinct questions.
#[derive(Default)]
pub struct ScriptedSource {
    catalogs: Vec<Vec<CategoryRef>>,
    pages: HashMap<CategoryId, Page>,
    catalog_failures: AtomicUsize,
    catalog_calls: AtomicUsize,
    fetches: Mutex<Vec<(CategoryId, usize)>>,
    hold: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedSource {
    /// A source that always lists `catalog`.
    pub fn new(catalog: Vec<CategoryRef>) -> Self {
        Self::with_catalogs(vec![catalog])
    }

    /// A source that lists each catalog in turn.
    pub fn with_catalogs(catalogs: Vec<Vec<CategoryRef>>) -> Self {
        Self {
            catalogs,
            ..Self::default()
        }
    }

    /// Serves `questions` for category `id`.
    pub fn with_page(mut self, id: CategoryId, questions: Vec<RawQuestion>) -> Self {
        self.pages.insert(id, Page::Questions(questions));
        self
    }

    /// Category `id` reports the whole source as unavailable.
    pub fn with_unavailable(mut self, id: CategoryId) -> Self {
        self.pages.insert(id, Page::Unavailable);
        self
    }

    /// Category `id` fails with an ordinary request error.
    pub fn with_failing(mut self, id: CategoryId) -> Self {
        self.pages.insert(id, Page::Failing);
        self
    }

    /// The first `count` catalog requests fail.
    pub fn with_catalog_failures(self, count: usize) -> Self {
        self.catalog_failures.store(count, Ordering::SeqCst);
        self
    }

    /// The next catalog request blocks until the returned gate is notified.
    pub fn hold_next_catalog(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.hold.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Catalog requests made so far.
    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    /// `(category, count)` of every question request, in order.
    pub fn fetches(&self) -> Vec<(CategoryId, usize)> {
        self.fetches.lock().unwrap().clone()
    }

    /// Category ids of every question request, in order.
    pub fn fetched_ids(&self) -> Vec<CategoryId> {
        self.fetches().into_iter().map(|(id, _)| id).collect()
    }
}

#[async_trait]
impl CategoryCatalog for ScriptedSource {
    async fn list_categories(&self) -> Result<Vec<CategoryRef>, SourceError> {
        let call = self.catalog_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.hold.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let failing = self
            .catalog_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(SourceError::request("catalog endpoint returned 400"));
        }

        let index = call.min(self.catalogs.len().saturating_sub(1));
        Ok(self.catalogs.get(index).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl QuestionSupplier for ScriptedSource {
    async fn fetch_questions(
        &self,
        category: CategoryId,
        count: usize,
    ) -> Result<Vec<RawQuestion>, SourceError> {
        self.fetches.lock().unwrap().push((category, count));
        match self.pages.get(&category) {
            Some(Page::Questions(page)) => Ok(page.iter().take(count).cloned().collect()),
            Some(Page::Unavailable) => Err(SourceError::unavailable("service down")),
            Some(Page::Failing) => Err(SourceError::request("invalid parameter")),
            None => Ok(questions(category, count.min(10))),
        }
    }
}

/// Renderer that remembers every call.
#[derive(Default)]
pub struct RecordingRenderer {
    pub boards: Mutex<Vec<(u64, Board)>>,
    pub reveals: Mutex<Vec<RevealOutcome>>,
    pub unavailable: Mutex<Vec<(u64, BoardUnavailable)>>,
    pub progress: Mutex<Vec<AssemblyEvent>>,
}

impl RecordingRenderer {
    /// Generations of every board shown.
    pub fn board_generations(&self) -> Vec<u64> {
        self.boards.lock().unwrap().iter().map(|(g, _)| *g).collect()
    }
}

impl BoardRenderer for RecordingRenderer {
    fn show_board(&self, generation: u64, board: &Board) {
        self.boards.lock().unwrap().push((generation, board.clone()));
    }

    fn show_reveal(&self, outcome: &RevealOutcome) {
        self.reveals.lock().unwrap().push(outcome.clone());
    }

    fn show_unavailable(&self, generation: u64, error: &BoardUnavailable) {
        self.unavailable
            .lock()
            .unwrap()
            .push((generation, error.clone()));
    }

    fn show_progress(&self, event: &AssemblyEvent) {
        self.progress.lock().unwrap().push(event.clone());
    }
}

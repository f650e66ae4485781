//! Board assembly: sample, acquire, retry.

use crate::acquirer::{Acquisition, CategoryAcquirer, CategoryShortfall};
use crate::config::TriviaConfig;
use crate::source::{CategoryCatalog, TriviaSource};
use derive_more::{Display, Error};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use strictly_trivia_core::{Board, CategoryRef};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

/// Progress messages emitted while a board is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyEvent {
    /// An attempt began.
    AttemptStarted {
        /// 1-based attempt number.
        attempt: u32,
        /// Attempt budget.
        max_attempts: u32,
    },
    /// A category filled its column.
    CategoryAccepted {
        /// Attempt number.
        attempt: u32,
        /// Decoded title.
        title: String,
    },
    /// A category was skipped.
    CategoryRejected {
        /// Attempt number.
        attempt: u32,
        /// Catalog name.
        name: String,
        /// Why it was skipped.
        reason: CategoryShortfall,
    },
    /// An attempt ended without a board.
    AttemptFailed {
        /// Attempt number.
        attempt: u32,
        /// What went wrong.
        failure: AttemptFailure,
    },
    /// The next attempt starts after `delay`.
    RetryScheduled {
        /// Upcoming attempt number.
        attempt: u32,
        /// Pause before it.
        delay: Duration,
    },
    /// A full board was assembled.
    BoardReady {
        /// Attempt that produced it.
        attempt: u32,
    },
}

/// Why one attempt did not produce a board.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum AttemptFailure {
    /// Fewer than K categories validated.
    #[display("{} of {} categories validated", validated, required)]
    Shortfall {
        /// Categories that validated.
        validated: usize,
        /// Categories needed.
        required: usize,
    },

    /// The source went down mid-attempt.
    #[display("source unavailable: {}", _0)]
    SourceUnavailable(String),

    /// The catalog request failed.
    #[display("catalog request failed: {}", _0)]
    CatalogFailed(String),

    /// The catalog cannot supply K distinct categories.
    #[display("catalog has {} categories, {} required", available, required)]
    CatalogTooSmall {
        /// Categories in the catalog.
        available: usize,
        /// Categories needed.
        required: usize,
    },

    /// Validated categories did not form a valid board.
    #[display("assembled board rejected: {}", _0)]
    InvalidBoard(String),
}

/// No board could be assembled within the attempt budget.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("No board after {} attempt(s): {}", attempts, last_failure)]
pub struct BoardUnavailable {
    /// Attempts made.
    pub attempts: u32,
    /// Failure of the final attempt.
    pub last_failure: AttemptFailure,
}

/// Assembles boards of exactly K categories × N clues.
pub struct BoardOrchestrator {
    catalog: Arc<dyn CategoryCatalog>,
    acquirer: CategoryAcquirer,
    config: TriviaConfig,
    rng: Mutex<StdRng>,
    events: Option<mpsc::UnboundedSender<AssemblyEvent>>,
}

impl std::fmt::Debug for BoardOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardOrchestrator")
            .field("shape", &self.config.shape())
            .field("max_attempts", self.config.max_attempts())
            .finish_non_exhaustive()
    }
}

impl BoardOrchestrator {
    /// Creates an orchestrator over a source.
    ///
    /// Sampling is seeded from `config.seed` when set.
    #[instrument(skip(source, config), fields(shape = %config.shape()))]
    pub fn new<S>(source: Arc<S>, config: TriviaConfig) -> Self
    where
        S: TriviaSource + 'static,
    {
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(*seed),
            None => StdRng::from_entropy(),
        };
        info!("Creating board orchestrator");
        Self {
            catalog: source.clone(),
            acquirer: CategoryAcquirer::new(source, config.clone()),
            config,
            rng: Mutex::new(rng),
            events: None,
        }
    }

    /// Sends progress events to `tx`.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<AssemblyEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &TriviaConfig {
        &self.config
    }

    /// Assembles a fresh board.
    ///
    /// Each attempt samples K categories anew and discards anything validated
    /// by earlier attempts. Attempts are separated by the configured delay.
    ///
    /// # Errors
    ///
    /// Returns [`BoardUnavailable`] once the attempt budget is spent, or
    /// immediately if the catalog is smaller than K.
    #[instrument(skip(self))]
    pub async fn assemble_board(&self) -> Result<Board, BoardUnavailable> {
        let max_attempts = *self.config.max_attempts();
        let mut last_failure = AttemptFailure::Shortfall {
            validated: 0,
            required: *self.config.categories_per_board(),
        };

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                let delay = self.config.retry_delay();
                self.emit(AssemblyEvent::RetryScheduled { attempt, delay });
                debug!(?delay, attempt, "Waiting before retry");
                tokio::time::sleep(delay).await;
            }

            self.emit(AssemblyEvent::AttemptStarted {
                attempt,
                max_attempts,
            });

            match self.run_attempt(attempt).await {
                Ok(board) => {
                    info!(attempt, "Board assembled");
                    self.emit(AssemblyEvent::BoardReady { attempt });
                    return Ok(board);
                }
                Err(failure @ AttemptFailure::CatalogTooSmall { .. }) => {
                    error!(%failure, "Catalog cannot fill a board");
                    self.emit(AssemblyEvent::AttemptFailed {
                        attempt,
                        failure: failure.clone(),
                    });
                    return Err(BoardUnavailable {
                        attempts: attempt,
                        last_failure: failure,
                    });
                }
                Err(failure) => {
                    warn!(attempt, %failure, "Attempt failed");
                    self.emit(AssemblyEvent::AttemptFailed {
                        attempt,
                        failure: failure.clone(),
                    });
                    last_failure = failure;
                }
            }
        }

        error!(max_attempts, %last_failure, "Board unavailable");
        Err(BoardUnavailable {
            attempts: max_attempts,
            last_failure,
        })
    }

    #[instrument(skip(self))]
    async fn run_attempt(&self, attempt: u32) -> Result<Board, AttemptFailure> {
        let shape = self.config.shape();

        let catalog = self.catalog.list_categories().await.map_err(|e| {
            if e.is_unavailable() {
                AttemptFailure::SourceUnavailable(e.message)
            } else {
                AttemptFailure::CatalogFailed(e.message)
            }
        })?;

        if catalog.len() < shape.categories {
            return Err(AttemptFailure::CatalogTooSmall {
                available: catalog.len(),
                required: shape.categories,
            });
        }

        let candidates = self.sample(&catalog, shape.categories);
        let ids: Vec<_> = candidates.iter().map(|c| *c.id()).collect();
        debug!(?ids, "Sampled categories");

        let mut validated = Vec::with_capacity(shape.categories);
        for candidate in &candidates {
            match self.acquirer.acquire(candidate, attempt).await {
                Ok(Acquisition::Valid(category)) => {
                    self.emit(AssemblyEvent::CategoryAccepted {
                        attempt,
                        title: category.title().clone(),
                    });
                    validated.push(category);
                }
                Ok(Acquisition::Invalid(reason)) => {
                    debug!(name = %candidate.name(), %reason, "Skipping category");
                    self.emit(AssemblyEvent::CategoryRejected {
                        attempt,
                        name: candidate.name().clone(),
                        reason,
                    });
                }
                Err(e) => return Err(AttemptFailure::SourceUnavailable(e.message)),
            }
        }

        if validated.len() < shape.categories {
            return Err(AttemptFailure::Shortfall {
                validated: validated.len(),
                required: shape.categories,
            });
        }

        Board::new(shape, validated).map_err(|e| AttemptFailure::InvalidBoard(e.to_string()))
    }

    fn sample(&self, catalog: &[CategoryRef], count: usize) -> Vec<CategoryRef> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        catalog.choose_multiple(&mut *rng, count).cloned().collect()
    }

    fn emit(&self, event: AssemblyEvent) {
        if let Some(tx) = &self.events {
            if tx.send(event).is_err() {
                debug!("Assembly event receiver dropped");
            }
        }
    }
}

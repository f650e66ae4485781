//! Game session: owns the current board and drops stale assemblies.

use crate::orchestrator::{AssemblyEvent, BoardOrchestrator, BoardUnavailable};
use crate::render::BoardRenderer;
use derive_more::{Display, Error};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use strictly_trivia_core::{Board, ClueRevealMachine, RevealOutcome};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// What happened to one `start` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The board was handed to the renderer and is now current.
    Delivered {
        /// Generation of the request.
        generation: u64,
    },
    /// Assembly failed; the player was told.
    Unavailable {
        /// Generation of the request.
        generation: u64,
        /// Terminal failure.
        error: BoardUnavailable,
    },
    /// A newer request started first; the result was dropped.
    Superseded {
        /// Generation of the request.
        generation: u64,
    },
}

/// Reveal requested with no board loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("No board is loaded")]
pub struct NoBoard;

/// One player's game: the current board plus the machinery to replace it.
pub struct GameSession {
    orchestrator: Arc<BoardOrchestrator>,
    renderer: Arc<dyn BoardRenderer>,
    generation: AtomicU64,
    board: Mutex<Option<Arc<Board>>>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .field("has_board", &self.board().is_some())
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Creates a session with no board.
    #[instrument(skip_all)]
    pub fn new(orchestrator: Arc<BoardOrchestrator>, renderer: Arc<dyn BoardRenderer>) -> Self {
        info!("Creating game session");
        Self {
            orchestrator,
            renderer,
            generation: AtomicU64::new(0),
            board: Mutex::new(None),
        }
    }

    /// Wires an orchestrator's progress events to a renderer.
    ///
    /// Returns the orchestrator to hand to [`GameSession::new`]. The
    /// forwarding task ends when the orchestrator is dropped.
    pub fn forward_progress(
        orchestrator: BoardOrchestrator,
        renderer: Arc<dyn BoardRenderer>,
    ) -> BoardOrchestrator {
        let (tx, mut rx) = mpsc::unbounded_channel::<AssemblyEvent>();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                renderer.show_progress(&event);
            }
        });
        orchestrator.with_events(tx)
    }

    /// Starts a new game.
    ///
    /// The current board is discarded immediately, so reveals return
    /// [`NoBoard`] until this request (or a newer one) delivers.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Delivery {
        let generation = {
            let mut current = self.board.lock().unwrap_or_else(PoisonError::into_inner);
            *current = None;
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        info!(generation, "Assembling new board");

        let result = self.orchestrator.assemble_board().await;

        // Check, publish and render under the board lock so a newer request
        // cannot paint between the check and the renderer call.
        let mut current = self.board.lock().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Dropping stale assembly result");
            return Delivery::Superseded { generation };
        }

        match result {
            Ok(board) => {
                let board = Arc::new(board);
                *current = Some(Arc::clone(&board));
                self.renderer.show_board(generation, &board);
                info!(generation, "Board delivered");
                Delivery::Delivered { generation }
            }
            Err(error) => {
                warn!(generation, %error, "Board unavailable");
                self.renderer.show_unavailable(generation, &error);
                Delivery::Unavailable { generation, error }
            }
        }
    }

    /// Generation of the most recent `start` request.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Current board, if one has been delivered.
    pub fn board(&self) -> Option<Arc<Board>> {
        self.board
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Routes a cell activation to the reveal machine.
    ///
    /// The renderer is notified only when the cell changed.
    ///
    /// # Panics
    ///
    /// Panics on out-of-range indices; see [`ClueRevealMachine::reveal`].
    #[instrument(skip(self))]
    pub fn reveal(&self, category: usize, clue: usize) -> Result<RevealOutcome, NoBoard> {
        let board = self.board().ok_or(NoBoard)?;
        let outcome = ClueRevealMachine::reveal(&board, category, clue);
        if outcome.changed() {
            self.renderer.show_reveal(&outcome);
        }
        Ok(outcome)
    }
}

//! Strictly Trivia - trivia boards from an unreliable source
//!
//! Samples categories from a trivia source, fills each with distinct
//! questions, and retries until a complete board exists or the attempt
//! budget runs out.
//!
//! # Architecture
//!
//! - **Sources**: [`CategoryCatalog`] and [`QuestionSupplier`], with
//!   [`OpenTdbClient`] (HTTP) and [`FixtureSource`] (offline) implementations
//! - **Acquirer**: fetches and validates one category ([`CategoryAcquirer`])
//! - **Orchestrator**: samples, acquires, retries ([`BoardOrchestrator`])
//! - **Session**: current board, generations, reveals ([`GameSession`])
//! - **Core**: board types and the reveal machine, from `strictly_trivia_core`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use strictly_trivia::{BoardOrchestrator, OpenTdbClient, TriviaConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = TriviaConfig::default();
//! let source = Arc::new(OpenTdbClient::new(&config)?);
//! let board = BoardOrchestrator::new(source, config).assemble_board().await?;
//! assert_eq!(board.categories().len(), 6);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod acquirer;
mod config;
mod orchestrator;
mod render;
mod session;
mod source;

// Crate-level exports - Configuration
pub use config::{BASE_URL_ENV, ConfigError, TriviaConfig};

// Crate-level exports - Sources
pub use source::{
    CategoryCatalog, FixtureCategory, FixtureError, FixtureSource, OpenTdbClient,
    QuestionSupplier, SourceError, SourceErrorKind, TriviaSource,
};

// Crate-level exports - Assembly pipeline
pub use acquirer::{Acquisition, CategoryAcquirer, CategoryShortfall};
pub use orchestrator::{AssemblyEvent, AttemptFailure, BoardOrchestrator, BoardUnavailable};

// Crate-level exports - Session and rendering
pub use render::{BoardRenderer, TextRenderer, cell_value, format_board, format_progress};
pub use session::{Delivery, GameSession, NoBoard};

// Crate-level exports - Core board types
pub use strictly_trivia_core::{
    Board, BoardError, BoardShape, Category, CategoryId, CategoryRef, Clue, ClueRevealMachine,
    Insufficient, RawQuestion, RevealOutcome, RevealState, decode, dedupe_take, normalize,
};

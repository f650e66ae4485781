//! Command-line interface for strictly_trivia.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Trivia - assemble and play trivia boards
#[derive(Parser, Debug)]
#[command(name = "strictly_trivia")]
#[command(about = "Trivia board assembly with bounded retries", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to TOML configuration (defaults used if missing)
    #[arg(short, long, default_value = "trivia.toml", global = true)]
    pub config: PathBuf,

    /// Serve categories from a JSON fixture instead of the network
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    /// Seed for category sampling
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the source's category catalog
    Categories,

    /// Assemble one board and print it
    Board {
        /// Print the board as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assemble a board and play it from stdin
    ///
    /// Commands: `<column> <row>` reveals a cell, `new` restarts,
    /// `show` redraws, `quit` exits.
    Play,
}

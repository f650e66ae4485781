//! Strictly Trivia - CLI
//!
//! Assemble trivia boards from Open Trivia DB (or a local fixture) and play
//! them in the terminal.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::sync::Arc;
use strictly_trivia::{
    BoardOrchestrator, BoardRenderer, FixtureSource, GameSession, OpenTdbClient,
    TextRenderer, TriviaConfig, TriviaSource, format_board,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    let mut config = TriviaConfig::load_or_default(&cli.config)?;
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    config.validate()?;

    match &cli.fixture {
        Some(path) => {
            info!(path = %path.display(), "Using fixture source");
            // Nothing to rate limit offline.
            let config = config.with_min_request_interval_ms(0);
            run(Arc::new(FixtureSource::from_file(path)?), config, cli.command).await
        }
        None => {
            let source = Arc::new(OpenTdbClient::new(&config)?);
            run(source, config, cli.command).await
        }
    }
}

/// Logs go to stderr so the board owns stdout.
fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,strictly_trivia=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run<S>(source: Arc<S>, config: TriviaConfig, command: Command) -> Result<()>
where
    S: TriviaSource + 'static,
{
    match command {
        Command::Categories => list_categories(source.as_ref()).await,
        Command::Board { json } => print_board(source, config, json).await,
        Command::Play => play(source, config).await,
    }
}

#[instrument(skip(source))]
async fn list_categories<S: TriviaSource>(source: &S) -> Result<()> {
    let categories = source.list_categories().await?;
    for category in &categories {
        println!("{:>4}  {}", category.id(), strictly_trivia::decode(category.name()));
    }
    Ok(())
}

#[instrument(skip(source, config))]
async fn print_board<S>(source: Arc<S>, config: TriviaConfig, json: bool) -> Result<()>
where
    S: TriviaSource + 'static,
{
    let orchestrator = BoardOrchestrator::new(source, config);
    let board = orchestrator.assemble_board().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        print!("{}", format_board(&board));
    }
    Ok(())
}

#[instrument(skip(source, config))]
async fn play<S>(source: Arc<S>, config: TriviaConfig) -> Result<()>
where
    S: TriviaSource + 'static,
{
    let renderer: Arc<dyn BoardRenderer> = Arc::new(TextRenderer::stdout());
    let orchestrator = GameSession::forward_progress(
        BoardOrchestrator::new(source, config),
        Arc::clone(&renderer),
    );
    let session = GameSession::new(Arc::new(orchestrator), renderer);

    session.start().await;
    println!("Enter `<column> <row>` to reveal, `new`, `show`, or `quit`.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        debug!(line, "Player input");
        match line {
            "" => continue,
            "quit" | "exit" => break,
            "new" => {
                session.start().await;
            }
            "show" => match session.board() {
                Some(board) => print!("{}", format_board(&board)),
                None => println!("No board yet. Type `new`."),
            },
            other => match parse_cell(other) {
                Some((column, row)) => reveal_cell(&session, column, row),
                None => println!("Unrecognized command: {other}"),
            },
        }
    }

    info!("Game over");
    Ok(())
}

/// Parses `"<column> <row>"` (1-based) into 0-based indices.
fn parse_cell(input: &str) -> Option<(usize, usize)> {
    let mut parts = input.split_whitespace();
    let column: usize = parts.next()?.parse().ok()?;
    let row: usize = parts.next()?.parse().ok()?;
    if parts.next().is_some() || column == 0 || row == 0 {
        return None;
    }
    Some((column - 1, row - 1))
}

fn reveal_cell(session: &GameSession, column: usize, row: usize) {
    let Some(board) = session.board() else {
        println!("No board yet. Type `new`.");
        return;
    };
    if board.clue(column, row).is_none() {
        let shape = board.shape();
        println!(
            "No such cell. Columns 1-{}, rows 1-{}.",
            shape.categories, shape.clues
        );
        return;
    }
    if let Ok(outcome) = session.reveal(column, row) {
        if !outcome.changed() {
            println!("Already showing the answer: {}", outcome.text);
        }
    }
}

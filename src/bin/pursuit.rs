//! pursuit CLI - Solve, learn and play a grid-maze pursuit-evasion game
//!
//! This CLI provides a unified interface for:
//! - Solving the finite-horizon game with backward induction
//! - Learning action values with tabular Q-learning
//! - Playing a solved policy against a random pursuer

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "pursuit")]
#[command(version, about = "Pursuit-evasion on a grid maze", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the maze with backward induction
    Solve(pursuit::cli::commands::solve::SolveArgs),

    /// Learn action values with tabular Q-learning
    Learn(Box<pursuit::cli::commands::learn::LearnArgs>),

    /// Play a solved policy against a random pursuer
    Play(pursuit::cli::commands::play::PlayArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Solve(args) => pursuit::cli::commands::solve::execute(args),
        Commands::Learn(args) => pursuit::cli::commands::learn::execute(*args),
        Commands::Play(args) => pursuit::cli::commands::play::execute(args),
    }
}

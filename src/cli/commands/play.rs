//! Play command - Run a solved policy against the random pursuer

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use super::{ExperimentArgs, parse_state, solve::solve_policy};
use crate::{
    cli::output::{print_kv, print_section, render_state},
    simulation::{MazeGame, Outcome},
};

#[derive(Parser, Debug)]
#[command(about = "Play a solved policy against a random pursuer")]
pub struct PlayArgs {
    #[command(flatten)]
    pub experiment: ExperimentArgs,

    /// Number of decision steps (overrides the config)
    #[arg(long, short = 't')]
    pub horizon: Option<usize>,

    /// Start state as `xp,yp,xb,yb` (defaults to the configured starts)
    #[arg(long)]
    pub start: Option<String>,

    /// Number of games to play
    #[arg(long, short = 'g', default_value_t = 1)]
    pub games: usize,

    /// Random seed for the pursuer; game `i` uses `seed + i`
    #[arg(long)]
    pub seed: Option<u64>,

    /// Only print the tally, not every board
    #[arg(long, short = 'q', default_value_t = false)]
    pub quiet: bool,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let mut config = args.experiment.load()?;
    if let Some(horizon) = args.horizon {
        config.bellman.horizon = horizon;
    }
    let maze = config.validate()?;
    let start = match &args.start {
        Some(value) => parse_state(value, "--start")?,
        None => config.maze.start(),
    };

    let policy = Arc::new(solve_policy(&config, &maze)?);

    let mut reached = 0;
    let mut captured = 0;
    let mut unresolved = 0;
    for game_index in 0..args.games {
        let seed = args.seed.map(|seed| seed.wrapping_add(game_index as u64));
        let mut game = MazeGame::new(
            &maze,
            Arc::clone(&policy),
            &config.bellman.player_actions,
            &config.bellman.pursuer_actions,
            start,
            seed,
        )?;

        if !args.quiet {
            print_section(&format!("Game {}", game_index + 1));
            println!("Map at step 0");
            print!("{}", render_state(&maze, start));
        }
        while !game.is_finished() {
            let transition = game.step()?;
            if !args.quiet {
                println!(
                    "Map at step {} (player {}, pursuer {})",
                    transition.time_step + 1,
                    transition.player_action,
                    transition.pursuer_action
                );
                print!("{}", render_state(&maze, transition.after));
            }
        }

        let outcome = game.trajectory().outcome(&maze);
        match outcome {
            Outcome::ReachedGoal { .. } => reached += 1,
            Outcome::Captured { .. } => captured += 1,
            Outcome::Unresolved => unresolved += 1,
        }
        if !args.quiet {
            println!("Outcome: {outcome:?}");
        }
    }

    print_section("Tally");
    print_kv("Games", &args.games.to_string());
    print_kv("Reached goal", &reached.to_string());
    print_kv("Captured", &captured.to_string());
    print_kv("Unresolved", &unresolved.to_string());
    Ok(())
}

//! Solve command - Finite-horizon backward induction

use std::{path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;

use super::{ExperimentArgs, parse_actions, parse_state};
use crate::{
    bellman::{BellmanSolver, PolicyTable},
    cli::output::{create_spinner, format_number, print_kv, print_section, print_subsection},
    config::ExperimentConfig,
    export::ValueHistoryExporter,
    maze::Maze,
    types::JointState,
};

#[derive(Parser, Debug)]
#[command(about = "Solve the maze with backward induction")]
pub struct SolveArgs {
    #[command(flatten)]
    pub experiment: ExperimentArgs,

    /// Number of decision steps (overrides the config)
    #[arg(long, short = 't')]
    pub horizon: Option<usize>,

    /// Player actions, e.g. `up,down,left,right,stay`
    #[arg(long)]
    pub player_actions: Option<String>,

    /// Pursuer actions, e.g. `up,down,left,right`
    #[arg(long)]
    pub pursuer_actions: Option<String>,

    /// Joint state to report as `xp,yp,xb,yb` (defaults to the start state)
    #[arg(long)]
    pub state: Option<String>,

    /// Write the reported state's decision sequence to a CSV file
    #[arg(long)]
    pub decisions_csv: Option<PathBuf>,
}

impl SolveArgs {
    pub(crate) fn resolve(&self) -> Result<ExperimentConfig> {
        let mut config = self.experiment.load()?;
        if let Some(horizon) = self.horizon {
            config.bellman.horizon = horizon;
        }
        if let Some(actions) = &self.player_actions {
            config.bellman.player_actions = parse_actions(actions, "--player-actions")?;
        }
        if let Some(actions) = &self.pursuer_actions {
            config.bellman.pursuer_actions = parse_actions(actions, "--pursuer-actions")?;
        }
        Ok(config)
    }
}

/// Solve `config` and return the policy table, with a spinner on stderr.
pub(crate) fn solve_policy(config: &ExperimentConfig, maze: &Maze) -> Result<PolicyTable> {
    let solver = BellmanSolver::new(
        maze,
        &config.bellman.player_actions,
        &config.bellman.pursuer_actions,
        config.bellman.horizon,
    )?;
    let spinner = create_spinner("Solving Bellman recursion...")?;
    let table = solver.solve().context("backward induction failed")?;
    spinner.finish_and_clear();
    Ok(table)
}

pub fn execute(args: SolveArgs) -> Result<()> {
    let config = args.resolve()?;
    let maze = config.validate()?;
    let state = match &args.state {
        Some(value) => parse_state(value, "--state")?,
        None => config.maze.start(),
    };
    maze.check_inside("player", state.player)?;
    maze.check_inside("pursuer", state.pursuer)?;

    let started = Instant::now();
    let table = solve_policy(&config, &maze)?;
    let elapsed = started.elapsed();

    print_section("Bellman Solution");
    print_kv("Maze", &format!("{}x{}", maze.length(), maze.height()));
    print_kv("Goal", &maze.goal().to_string());
    print_kv("Joint states", &format_number(table.space().len()));
    print_kv("Horizon", &config.bellman.horizon.to_string());
    print_kv("Computation time", &format!("{:.3}s", elapsed.as_secs_f64()));

    print_decisions(&table, state);

    if let Some(path) = &args.decisions_csv {
        let rows = ValueHistoryExporter::write_decisions(path, &table, state)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("\nWrote {rows} decisions to {}", path.display());
    }
    Ok(())
}

fn print_decisions(table: &PolicyTable, state: JointState) {
    print_subsection(&format!("Optimal policy for {state}"));
    let decisions = table.decisions(state);
    for (time_step, decision) in decisions.iter().rev().enumerate() {
        println!(
            "  t={time_step:<3} remaining={:<3} {:<6} {:.4}",
            decisions.len() - 1 - time_step,
            decision.action,
            decision.value
        );
    }
}

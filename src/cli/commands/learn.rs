//! Learn command - Q-learning from simulated trajectories

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use super::{ExperimentArgs, parse_actions, parse_state, solve::solve_policy};
use crate::{
    cli::output::{format_number, print_kv, print_section, print_subsection},
    config::ExperimentConfig,
    export::ValueHistoryExporter,
    maze::{Action, Maze},
    pipeline::{
        JsonlObserver, LearningPipeline, LearningResult, MetricsObserver, PipelineConfig,
        ProgressObserver,
    },
    q_learning::{QLearningSolver, SavedQTable},
};

#[derive(Debug, Serialize)]
struct LearningSummaryFile {
    result: LearningResult,
    discount: f64,
    q_init: f64,
    seed: Option<u64>,
    reset_probability: Option<f64>,
    avg_episode_length: f64,
    total_reward: f64,
    greedy_action: Option<Action>,
    bellman_action: Option<Action>,
}

#[derive(Parser, Debug)]
#[command(about = "Learn action values with tabular Q-learning")]
pub struct LearnArgs {
    #[command(flatten)]
    pub experiment: ExperimentArgs,

    /// Number of single-step updates
    #[arg(long, short = 'n')]
    pub iterations: Option<usize>,

    /// Discount factor in (0, 1)
    #[arg(long)]
    pub discount: Option<f64>,

    /// Initial value of every Q-table entry
    #[arg(long)]
    pub q_init: Option<f64>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Restart from the initial state after each step with this probability
    #[arg(long)]
    pub reset_probability: Option<f64>,

    /// Initial joint state to track as `xp,yp,xb,yb`
    #[arg(long)]
    pub start: Option<String>,

    /// Player actions, e.g. `up,down,left,right,stay`
    #[arg(long)]
    pub player_actions: Option<String>,

    /// Pursuer actions, e.g. `up,down,left,right`
    #[arg(long)]
    pub pursuer_actions: Option<String>,

    /// Continue from a saved Q-table (MessagePack)
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// Save the learned Q-table (MessagePack)
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Write the value history of the initial state to a CSV file
    #[arg(long)]
    pub history_csv: Option<PathBuf>,

    /// Optional file for JSONL update observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Record every n-th update in the observation file
    #[arg(long, default_value_t = 100)]
    pub observation_stride: usize,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Compare the greedy action with the Bellman solution
    #[arg(long, default_value_t = false)]
    pub compare_bellman: bool,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl LearnArgs {
    fn resolve(&self) -> Result<ExperimentConfig> {
        let mut config = self.experiment.load()?;
        let learning = &mut config.learning;
        if let Some(iterations) = self.iterations {
            learning.iterations = iterations;
        }
        if let Some(discount) = self.discount {
            learning.discount = discount;
        }
        if let Some(q_init) = self.q_init {
            learning.q_init = q_init;
        }
        if self.seed.is_some() {
            learning.seed = self.seed;
        }
        if self.reset_probability.is_some() {
            learning.reset_probability = self.reset_probability;
        }
        if let Some(actions) = &self.player_actions {
            config.bellman.player_actions = parse_actions(actions, "--player-actions")?;
        }
        if let Some(actions) = &self.pursuer_actions {
            config.bellman.pursuer_actions = parse_actions(actions, "--pursuer-actions")?;
        }
        if let Some(start) = &self.start {
            let state = parse_state(start, "--start")?;
            config.maze.player_start = state.player;
            config.learning.pursuer_start = state.pursuer;
        }
        Ok(config)
    }
}

/// Rebuild a solver from `saved`, refusing settings that differ from `config`.
fn resume_solver<'a>(
    saved: &SavedQTable,
    maze: &'a Maze,
    config: &ExperimentConfig,
) -> Result<QLearningSolver<'a>> {
    let start = config.learning_start();
    if saved.initial != start {
        bail!(
            "saved Q-table tracks initial state {} but this run starts at {start}",
            saved.initial
        );
    }
    if saved.discount != config.learning.discount {
        bail!(
            "saved Q-table was learned with discount {} but this run uses {} (pass --discount {})",
            saved.discount,
            config.learning.discount,
            saved.discount
        );
    }
    if saved.player_actions != config.bellman.player_actions
        || saved.pursuer_actions != config.bellman.pursuer_actions
    {
        bail!("saved Q-table was learned with different action sets");
    }
    saved
        .to_solver(maze)
        .context("saved Q-table does not fit the configured maze")
}

pub fn execute(args: LearnArgs) -> Result<()> {
    let config = args.resolve()?;
    let maze = config.validate()?;
    let start = config.learning_start();
    let learning = &config.learning;

    let mut solver = match &args.resume {
        Some(path) => {
            let saved = SavedQTable::load_from_file(path)
                .with_context(|| format!("failed to load Q-table {}", path.display()))?;
            let solver = resume_solver(&saved, &maze, &config)?;
            info!(path = %path.display(), "resuming from saved Q-table");
            solver
        }
        None => QLearningSolver::new(
            &maze,
            &config.bellman.player_actions,
            &config.bellman.pursuer_actions,
            start,
            learning.discount,
        )?
        .with_q_init(learning.q_init),
    };

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut pipeline = LearningPipeline::new(PipelineConfig {
        iterations: learning.iterations,
        seed: learning.seed,
        reset_probability: learning.reset_probability,
    })
    .with_observer(Box::new(Arc::clone(&metrics)));
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path, args.observation_stride)
            .with_context(|| format!("failed to create {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let result = pipeline.run(&mut solver)?;
    let greedy_action = solver.greedy_action(start);
    let (avg_episode_length, total_reward) = {
        let metrics = metrics
            .lock()
            .map_err(|_| anyhow::anyhow!("metrics observer lock poisoned"))?;
        (metrics.avg_episode_length(), metrics.total_reward())
    };

    print_section("Q-learning Results");
    print_kv("Updates", &format_number(result.iterations));
    print_kv("Episodes", &format_number(result.episodes));
    print_kv("Avg episode length", &format!("{avg_episode_length:.1}"));
    print_kv("Captures", &format_number(result.captures));
    print_kv("Goal visits", &format_number(result.goal_visits));
    print_kv("Total reward", &format!("{total_reward:.1}"));
    print_kv("Visited entries", &format_number(result.visited_entries));
    print_kv("Initial state", &start.to_string());
    print_kv("Initial value", &format!("{:.4}", result.final_value));
    print_kv(
        "Greedy action",
        &greedy_action.map_or_else(|| "-".to_string(), |a| a.to_string()),
    );

    let bellman_action = if args.compare_bellman {
        let table = solve_policy(&config, &maze)?;
        let decision = table.decision_at(start, 0)?;
        print_subsection("Bellman comparison");
        print_kv("Horizon", &config.bellman.horizon.to_string());
        print_kv("Bellman action", &decision.action.to_string());
        print_kv("Bellman value", &format!("{:.4}", decision.value));
        Some(decision.action)
    } else {
        None
    };

    if let Some(path) = &args.history_csv {
        ValueHistoryExporter::write_history(path, solver.value_history())
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("\nValue history saved to {}", path.display());
    }

    if let Some(path) = &args.output {
        SavedQTable::from_solver(&solver)
            .save_to_file(path)
            .with_context(|| format!("failed to save Q-table to {}", path.display()))?;
        println!("Q-table saved to {}", path.display());
    }

    if let Some(path) = &args.summary {
        let summary = LearningSummaryFile {
            result,
            discount: learning.discount,
            q_init: learning.q_init,
            seed: learning.seed,
            reset_probability: learning.reset_probability,
            avg_episode_length,
            total_reward,
            greedy_action,
            bellman_action,
        };
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &summary)?;
        println!("Summary saved to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::config::{MazePreset, WallSpec};

    fn saved_run(config: &ExperimentConfig) -> SavedQTable {
        let maze = config.validate().unwrap();
        let mut solver = QLearningSolver::new(
            &maze,
            &config.bellman.player_actions,
            &config.bellman.pursuer_actions,
            config.learning_start(),
            config.learning.discount,
        )
        .unwrap();
        solver.run(40, Some(2)).unwrap();
        SavedQTable::from_solver(&solver)
    }

    #[test]
    fn test_progress_bar_can_be_disabled() {
        let args = LearnArgs::try_parse_from(["learn"]).unwrap();
        assert!(!args.no_progress);
        let args = LearnArgs::try_parse_from(["learn", "--no-progress"]).unwrap();
        assert!(args.no_progress);
    }

    #[test]
    fn test_resume_accepts_matching_run() {
        let config = ExperimentConfig::preset(MazePreset::Open4);
        let saved = saved_run(&config);
        let maze = config.validate().unwrap();
        let solver = resume_solver(&saved, &maze, &config).unwrap();
        assert_eq!(solver.table().total_visits(), 40);
    }

    #[test]
    fn test_resume_rejects_other_discount() {
        let config = ExperimentConfig::preset(MazePreset::Open4);
        let saved = saved_run(&config);

        let mut other = config.clone();
        other.learning.discount = 0.5;
        let maze = other.validate().unwrap();
        assert!(resume_solver(&saved, &maze, &other).is_err());
    }

    #[test]
    fn test_resume_rejects_same_size_other_layout() {
        let config = ExperimentConfig::preset(MazePreset::Open4);
        let saved = saved_run(&config);

        let mut other = config.clone();
        other.maze.walls.push(WallSpec::vertical(1, 0, 1));
        let maze = other.validate().unwrap();
        assert!(resume_solver(&saved, &maze, &other).is_err());
    }
}

//! Learning pipeline for Q-learning runs

use rand::{Rng, distr::Bernoulli};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Error, Result,
    ports::LearningObserver,
    q_learning::QLearningSolver,
    simulation::driver::build_rng,
};

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of single-step updates
    pub iterations: usize,

    /// Random seed for the simulated trajectory
    pub seed: Option<u64>,

    /// Probability of restarting from the initial state after each step.
    /// `None` keeps one continuous trajectory.
    pub reset_probability: Option<f64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            seed: None,
            reset_probability: None,
        }
    }
}

/// Result of a learning run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningResult {
    /// Updates applied
    pub iterations: usize,

    /// Trajectories started, including the first one
    pub episodes: usize,

    /// Steps that ended with the player caught
    pub captures: usize,

    /// Steps that ended with the player on the goal (and not caught)
    pub goal_visits: usize,

    /// Value estimate of the initial state at the end of the run
    pub final_value: f64,

    /// Q-table entries updated at least once
    pub visited_entries: usize,
}

impl LearningResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Drives a [`QLearningSolver`] through simulated experience and notifies
/// observers along the way.
pub struct LearningPipeline {
    config: PipelineConfig,
    observers: Vec<Box<dyn LearningObserver>>,
}

impl LearningPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn LearningObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the configured number of updates.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] for a reset probability outside
    /// `[0, 1]`; simulation and observer errors abort the run.
    pub fn run(&mut self, solver: &mut QLearningSolver<'_>) -> Result<LearningResult> {
        let resets = self
            .config
            .reset_probability
            .map(|p| {
                Bernoulli::new(p).map_err(|_| Error::InvalidConfiguration {
                    message: format!("reset probability {p} must lie in [0, 1]"),
                })
            })
            .transpose()?;
        let mut reset_rng = build_rng(self.config.seed.map(|seed| seed.wrapping_add(1)));

        let iterations = self.config.iterations;
        let initial = solver.initial_state();
        let maze = solver.maze();
        let mut simulation = solver.simulation(self.config.seed)?;

        info!(
            iterations,
            reset_probability = ?self.config.reset_probability,
            "starting learning pipeline"
        );
        for observer in &mut self.observers {
            observer.on_learning_start(iterations)?;
        }

        let mut episodes = 1;
        let mut captures = 0;
        let mut goal_visits = 0;
        let checkpoint = (iterations / 10).max(1);

        for iteration in 1..=iterations {
            let transition = simulation.step()?;
            let reward = solver.learn(&transition);
            let value = solver.initial_value();

            if transition.after.is_capture() {
                captures += 1;
            } else if maze.is_goal(transition.after.player) {
                goal_visits += 1;
            }

            for observer in &mut self.observers {
                observer.on_update(iteration, &transition, reward, value)?;
            }

            let restart = match &resets {
                Some(resets) => iteration < iterations && reset_rng.sample(resets),
                None => false,
            };
            if restart {
                simulation.reset(initial)?;
                episodes += 1;
                for observer in &mut self.observers {
                    observer.on_episode_reset(iteration)?;
                }
            }

            if iteration % checkpoint == 0 {
                debug!(iteration, value, episodes, "learning checkpoint");
            }
        }

        for observer in &mut self.observers {
            observer.on_learning_end()?;
        }

        let result = LearningResult {
            iterations,
            episodes,
            captures,
            goal_visits,
            final_value: solver.initial_value(),
            visited_entries: solver.table().visited_entries(),
        };
        info!(
            final_value = result.final_value,
            episodes, captures, goal_visits, "learning pipeline complete"
        );
        Ok(result)
    }
}

//! Observer implementations for learning pipelines
//!
//! Observers allow composable data collection during learning without coupling
//! the update loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{Result, maze::Action, ports::LearningObserver, simulation::Transition};

/// One sampled update, as written by [`JsonlObserver`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateObservation {
    pub iteration: usize,
    pub player: (i32, i32),
    pub pursuer: (i32, i32),
    pub action: Action,
    pub reward: f64,
    pub initial_value: f64,
}

/// Progress bar observer - Shows learning progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    refresh_every: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            refresh_every: 1,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl LearningObserver for ProgressObserver {
    fn on_learning_start(&mut self, total_iterations: usize) -> Result<()> {
        let pb = ProgressBar::new(total_iterations as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} updates (V0: {msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.refresh_every = (total_iterations / 200).max(1);
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_update(
        &mut self,
        iteration: usize,
        _transition: &Transition,
        _reward: f64,
        initial_value: f64,
    ) -> Result<()> {
        if iteration % self.refresh_every != 0 {
            return Ok(());
        }
        if let Some(pb) = &self.progress_bar {
            pb.set_position(iteration as u64);
            pb.set_message(format!("{initial_value:.4}"));
        }
        Ok(())
    }

    fn on_learning_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish();
        }
        Ok(())
    }
}

/// Metrics observer - Tracks episode statistics
#[derive(Debug, Clone, Default)]
pub struct MetricsObserver {
    episodes: usize,
    steps_in_episode: usize,
    episode_lengths: Vec<usize>,
    total_reward: f64,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed episodes, counting the final open one once learning ends
    pub fn episodes(&self) -> usize {
        self.episodes
    }

    /// Average number of steps per episode
    pub fn avg_episode_length(&self) -> f64 {
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            self.episode_lengths.iter().sum::<usize>() as f64 / self.episode_lengths.len() as f64
        }
    }

    /// Sum of rewards over every update
    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    fn close_episode(&mut self) {
        if self.steps_in_episode > 0 {
            self.episode_lengths.push(self.steps_in_episode);
            self.episodes += 1;
            self.steps_in_episode = 0;
        }
    }
}

impl LearningObserver for MetricsObserver {
    fn on_update(
        &mut self,
        _iteration: usize,
        _transition: &Transition,
        reward: f64,
        _initial_value: f64,
    ) -> Result<()> {
        self.steps_in_episode += 1;
        self.total_reward += reward;
        Ok(())
    }

    fn on_episode_reset(&mut self, _iteration: usize) -> Result<()> {
        self.close_episode();
        Ok(())
    }

    fn on_learning_end(&mut self) -> Result<()> {
        self.close_episode();
        Ok(())
    }
}

/// JSONL observer - Writes every `stride`-th update as a JSON line
pub struct JsonlObserver {
    writer: BufWriter<File>,
    stride: usize,
}

impl JsonlObserver {
    /// Create a new JSONL observer writing every `stride`-th update
    pub fn new<P: AsRef<Path>>(path: P, stride: usize) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            stride: stride.max(1),
        })
    }
}

impl LearningObserver for JsonlObserver {
    fn on_update(
        &mut self,
        iteration: usize,
        transition: &Transition,
        reward: f64,
        initial_value: f64,
    ) -> Result<()> {
        if iteration % self.stride != 0 {
            return Ok(());
        }
        let observation = UpdateObservation {
            iteration,
            player: (transition.before.player.x, transition.before.player.y),
            pursuer: (transition.before.pursuer.x, transition.before.pursuer.y),
            action: transition.player_action,
            reward,
            initial_value,
        };
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn on_learning_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Shared observer handle, so callers can read an observer back after the
/// pipeline has consumed its box.
impl<T: LearningObserver> LearningObserver for Arc<Mutex<T>> {
    fn on_learning_start(&mut self, total_iterations: usize) -> Result<()> {
        lock(self).on_learning_start(total_iterations)
    }

    fn on_update(
        &mut self,
        iteration: usize,
        transition: &Transition,
        reward: f64,
        initial_value: f64,
    ) -> Result<()> {
        lock(self).on_update(iteration, transition, reward, initial_value)
    }

    fn on_episode_reset(&mut self, iteration: usize) -> Result<()> {
        lock(self).on_episode_reset(iteration)
    }

    fn on_learning_end(&mut self) -> Result<()> {
        lock(self).on_learning_end()
    }
}

fn lock<T>(shared: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    shared
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

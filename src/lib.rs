//! Pursuit-evasion on a grid maze
//!
//! This crate provides:
//! - A maze model with walls that bind the player and boundary walls that
//!   bind both the player and a randomly moving pursuer
//! - An exact finite-horizon Bellman solver producing a policy table
//! - A tabular Q-learning solver trained on simulated joint trajectories
//! - A simulation driver and a policy-driven game recording trajectories
//! - Learning pipelines with observers, configuration and CSV export

pub mod bellman;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod maze;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod simulation;
pub mod types;

pub use bellman::{BellmanSolver, Decision, PolicyTable};
pub use config::{ExperimentConfig, MazePreset};
pub use error::{Error, Result};
pub use maze::{Action, Maze, Position, Role};
pub use q_learning::{QLearningSolver, QTable};
pub use types::JointState;

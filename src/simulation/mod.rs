//! Simulated play in the maze
//!
//! - [`Simulation`] steps a player and a pursuer together, each driven by a
//!   [`Strategy`]. The learning pipeline uses it with two random explorers.
//! - [`MazeGame`] plays a solved [`crate::bellman::PolicyTable`] against a
//!   random pursuer and records the [`Trajectory`].

pub mod driver;
pub mod game;
pub mod strategy;
pub mod trajectory;

pub use driver::{Agent, Simulation};
pub use game::MazeGame;
pub use strategy::{DecisionContext, Strategy};
pub use trajectory::{Outcome, Trajectory, Transition};

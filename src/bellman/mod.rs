//! Exact finite-horizon dynamic programming (backward induction)
//!
//! [`BellmanSolver`] sweeps every joint state once per time step, from the
//! terminal step back to time zero, and records the value-maximising player
//! action in a [`PolicyTable`]. States within one layer are independent, so the
//! `parallel` feature evaluates them with rayon.

pub mod policy;
pub mod solver;

pub use policy::{Decision, PolicyTable};
pub use solver::{
    BellmanSolver, GOAL_REWARD, INFEASIBLE_VALUE, stage_reward, terminal_reward,
};

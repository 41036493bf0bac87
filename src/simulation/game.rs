//! Policy-driven game between a scripted player and a random pursuer

use std::sync::Arc;

use super::{
    driver::{Agent, Simulation},
    strategy::Strategy,
    trajectory::{Transition, Trajectory},
};
use crate::{
    Error, Result,
    bellman::PolicyTable,
    maze::{Action, Maze, Role},
    types::JointState,
};

/// Plays out a solved policy table step by step.
///
/// The player reads its decision for the current time step from the table;
/// the pursuer picks uniformly among its feasible actions. Once the two share
/// a cell, both are frozen in place for the rest of the game.
#[derive(Debug)]
pub struct MazeGame<'a> {
    simulation: Simulation<'a>,
    trajectory: Trajectory,
    horizon: usize,
}

impl<'a> MazeGame<'a> {
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] for an unsolved table, plus any
    /// placement error for off-grid starts or empty pursuer actions.
    pub fn new(
        maze: &'a Maze,
        policy: Arc<PolicyTable>,
        player_actions: &[Action],
        pursuer_actions: &[Action],
        start: JointState,
        seed: Option<u64>,
    ) -> Result<Self> {
        let horizon = policy.horizon().ok_or(Error::InvalidConfiguration {
            message: "cannot play an unsolved policy table".to_string(),
        })?;

        let player = Agent::new(
            Role::Player,
            start.player,
            player_actions,
            Strategy::Scripted(policy),
        );
        let pursuer = Agent::random_pursuer(start.pursuer, pursuer_actions);
        let simulation = Simulation::new(maze, seed).with_agents(player, pursuer)?;

        Ok(Self {
            simulation,
            trajectory: Trajectory::new(start),
            horizon,
        })
    }

    pub fn time_step(&self) -> usize {
        self.simulation.time_step()
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn state(&self) -> Result<JointState> {
        self.simulation.state()
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn is_finished(&self) -> bool {
        self.time_step() >= self.horizon
    }

    /// Advance one time step.
    ///
    /// # Errors
    ///
    /// [`Error::HorizonExceeded`] once all `horizon` moves have been played.
    pub fn step(&mut self) -> Result<Transition> {
        if self.is_finished() {
            return Err(Error::HorizonExceeded {
                step: self.time_step(),
                horizon: self.horizon,
            });
        }

        let transition = if self.simulation.state()?.is_capture() {
            self.simulation.advance(Action::Stay, Action::Stay)?
        } else {
            self.simulation.step()?
        };
        self.trajectory.push(transition);
        Ok(transition)
    }

    /// Play every remaining step and return the full trace.
    pub fn play(mut self) -> Result<Trajectory> {
        while !self.is_finished() {
            self.step()?;
        }
        Ok(self.trajectory)
    }
}

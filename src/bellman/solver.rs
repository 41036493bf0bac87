//! Finite-horizon backward induction against a uniformly random pursuer

use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, trace};

use super::policy::{Decision, PolicyTable};
use crate::{
    Error, Result,
    maze::{Action, Maze, MoveTable, Role},
    types::{JointState, StateSpace},
};

/// Reward paid at the terminal step when the player stands on the goal.
pub const GOAL_REWARD: f64 = 100.0;

/// Value held by action slots that are infeasible at the evaluated state.
pub const INFEASIBLE_VALUE: f64 = -1000.0;

/// Reward at the final time step: [`GOAL_REWARD`] on the goal, otherwise 0.
///
/// Being caught at the final step is worth 0, not a penalty.
pub fn terminal_reward(maze: &Maze, state: JointState) -> f64 {
    if maze.is_goal(state.player) {
        GOAL_REWARD
    } else {
        0.0
    }
}

/// Reward collected at a non-terminal step. Always 0: only the terminal step
/// can pay the goal bonus.
pub fn stage_reward(_maze: &Maze, _state: JointState) -> f64 {
    0.0
}

/// Exact dynamic-programming solver over every joint state.
///
/// The pursuer is modelled as a stochastic nuisance choosing uniformly among
/// its feasible actions, not as a minimising opponent. For every joint state and
/// every time step the solver records the player action that maximises the
/// expected value of the remaining game.
#[derive(Debug, Clone)]
pub struct BellmanSolver<'a> {
    maze: &'a Maze,
    space: StateSpace,
    player_actions: Vec<Action>,
    player_moves: MoveTable,
    pursuer_moves: MoveTable,
    horizon: usize,
}

impl<'a> BellmanSolver<'a> {
    /// Create a solver for `horizon` decision steps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyActionSet`] if either action set is empty.
    pub fn new(
        maze: &'a Maze,
        player_actions: &[Action],
        pursuer_actions: &[Action],
        horizon: usize,
    ) -> Result<Self> {
        if player_actions.is_empty() {
            return Err(Error::EmptyActionSet { role: Role::Player });
        }
        if pursuer_actions.is_empty() {
            return Err(Error::EmptyActionSet {
                role: Role::Pursuer,
            });
        }

        Ok(Self {
            maze,
            space: StateSpace::new(maze),
            player_actions: player_actions.to_vec(),
            player_moves: MoveTable::new(maze, player_actions, Role::Player),
            pursuer_moves: MoveTable::new(maze, pursuer_actions, Role::Pursuer),
            horizon,
        })
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Solve into a fresh table.
    pub fn solve(&self) -> Result<PolicyTable> {
        let mut table = PolicyTable::new(self.maze);
        self.solve_into(&mut table)?;
        Ok(table)
    }

    /// Populate an empty policy table, terminal layer first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `table` was already solved or
    /// belongs to a maze of different dimensions, and
    /// [`Error::NoFeasibleActions`] if some non-absorbing state leaves an agent
    /// with nothing to do.
    pub fn solve_into(&self, table: &mut PolicyTable) -> Result<()> {
        if !table.is_empty() {
            return Err(Error::InvalidConfiguration {
                message: "policy table has already been solved".to_string(),
            });
        }
        if table.space() != self.space {
            return Err(Error::InvalidConfiguration {
                message: "policy table was created for a different maze".to_string(),
            });
        }

        let started = Instant::now();
        info!(
            states = self.space.len(),
            horizon = self.horizon,
            "solving finite-horizon Bellman equations"
        );

        table.push_layer(self.terminal_layer());
        for remaining in 1..=self.horizon {
            let next = table.latest_layer().unwrap_or_default();
            let layer = self.sweep(next)?;
            table.push_layer(layer);
            debug!(time_step = self.horizon - remaining, remaining, "layer solved");
        }

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Bellman solve complete"
        );
        Ok(())
    }

    fn terminal_layer(&self) -> Vec<Decision> {
        self.space
            .states()
            .map(|state| Decision {
                action: Action::Stay,
                value: terminal_reward(self.maze, state),
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn sweep(&self, next: &[Decision]) -> Result<Vec<Decision>> {
        (0..self.space.len())
            .map(|index| self.evaluate(self.space.state(index), next))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn sweep(&self, next: &[Decision]) -> Result<Vec<Decision>> {
        (0..self.space.len())
            .into_par_iter()
            .map(|index| self.evaluate(self.space.state(index), next))
            .collect()
    }

    /// One Bellman backup of `state` given the next layer.
    fn evaluate(&self, state: JointState, next: &[Decision]) -> Result<Decision> {
        let reward = stage_reward(self.maze, state);

        // Goal and capture are absorbing: the player is frozen and the pursuer
        // is not moved.
        if state.is_absorbing(self.maze) {
            let continuation = next[self.space.index(state)].value;
            return Ok(Decision {
                action: Action::Stay,
                value: reward + continuation,
            });
        }

        let pursuer_moves = self.pursuer_moves.moves(state.pursuer);
        if pursuer_moves.is_empty() {
            return Err(Error::NoFeasibleActions {
                role: Role::Pursuer,
                position: state.pursuer,
            });
        }
        let weight = 1.0 / pursuer_moves.len() as f64;

        let mut values = [INFEASIBLE_VALUE; Action::COUNT];
        for &(action, player_next) in self.player_moves.moves(state.player) {
            let expected: f64 = pursuer_moves
                .iter()
                .map(|&(_, pursuer_next)| {
                    weight * next[self.space.index(JointState::new(player_next, pursuer_next))].value
                })
                .sum();
            values[action.index()] = expected + reward;
        }

        let decision = self.select(state, &values)?;
        trace!(%state, action = %decision.action, value = decision.value, "state evaluated");
        Ok(decision)
    }

    /// First feasible action, in player action-set order, with maximal value.
    fn select(&self, state: JointState, values: &[f64; Action::COUNT]) -> Result<Decision> {
        let mut best: Option<Decision> = None;
        for action in self.player_moves.actions(state.player) {
            let value = values[action.index()];
            if best.is_none_or(|current| value > current.value) {
                best = Some(Decision { action, value });
            }
        }

        best.ok_or(Error::NoFeasibleActions {
            role: Role::Player,
            position: state.player,
        })
    }

    /// Player action set in its enumeration order.
    pub fn player_actions(&self) -> &[Action] {
        &self.player_actions
    }
}

//! Off-policy Q-learning solver with visit-count step sizes

use std::time::Instant;

use tracing::{debug, info};

use super::q_table::{DEFAULT_Q_INIT, QTable};
use crate::{
    Error, Result,
    maze::{Action, Maze, MoveTable, Role},
    simulation::{Agent, Simulation, Transition},
    types::JointState,
};

/// Reward for sharing a cell with the pursuer.
pub const CAPTURE_REWARD: f64 = -10.0;

/// Reward for standing on the goal.
pub const GOAL_STEP_REWARD: f64 = 1.0;

/// Reward collected on arriving in `state`.
///
/// Capture takes precedence over the goal when both coincide.
pub fn reward(maze: &Maze, state: JointState) -> f64 {
    if state.is_capture() {
        CAPTURE_REWARD
    } else if maze.is_goal(state.player) {
        GOAL_STEP_REWARD
    } else {
        0.0
    }
}

/// Step size `1 / n` for the `n`-th update of an entry.
pub fn step_size(visits: u64) -> f64 {
    1.0 / visits.max(1) as f64
}

/// Learns player action values from random joint trajectories.
///
/// Each simulated transition updates the single entry of the state and player
/// action it started from, then records the current value estimate of the
/// initial joint state in the value history.
#[derive(Debug, Clone)]
pub struct QLearningSolver<'a> {
    maze: &'a Maze,
    table: QTable,
    player_actions: Vec<Action>,
    pursuer_actions: Vec<Action>,
    player_moves: MoveTable,
    initial: JointState,
    discount: f64,
    value_history: Vec<f64>,
}

impl<'a> QLearningSolver<'a> {
    /// Create a solver with every entry at [`DEFAULT_Q_INIT`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfiguration`] unless `0 < discount < 1`
    /// - [`Error::EmptyActionSet`] for an empty action set
    /// - [`Error::PositionOutOfBounds`] for an off-grid initial state
    /// - [`Error::NoFeasibleActions`] if the player cannot act at its start
    pub fn new(
        maze: &'a Maze,
        player_actions: &[Action],
        pursuer_actions: &[Action],
        initial: JointState,
        discount: f64,
    ) -> Result<Self> {
        if !(discount > 0.0 && discount < 1.0) {
            return Err(Error::InvalidConfiguration {
                message: format!("discount factor {discount} must lie strictly between 0 and 1"),
            });
        }
        if player_actions.is_empty() {
            return Err(Error::EmptyActionSet { role: Role::Player });
        }
        if pursuer_actions.is_empty() {
            return Err(Error::EmptyActionSet {
                role: Role::Pursuer,
            });
        }
        maze.check_inside("player start", initial.player)?;
        maze.check_inside("pursuer start", initial.pursuer)?;

        let player_moves = MoveTable::new(maze, player_actions, Role::Player);
        if player_moves.moves(initial.player).is_empty() {
            return Err(Error::NoFeasibleActions {
                role: Role::Player,
                position: initial.player,
            });
        }

        Ok(Self {
            maze,
            table: QTable::new(maze, DEFAULT_Q_INIT),
            player_actions: player_actions.to_vec(),
            pursuer_actions: pursuer_actions.to_vec(),
            player_moves,
            initial,
            discount,
            value_history: Vec::new(),
        })
    }

    /// Restart from a table with every entry at `q_init`.
    pub fn with_q_init(mut self, q_init: f64) -> Self {
        self.table = QTable::new(self.maze, q_init);
        self.value_history.clear();
        self
    }

    /// Continue learning from a previously saved table.
    ///
    /// Only the grid dimensions can be checked here; [`super::SavedQTable`]
    /// also records the goal and walls and checks them on restore.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] if the table covers a grid of another
    /// size.
    pub fn with_table(mut self, table: QTable) -> Result<Self> {
        if table.space() != self.table.space() {
            return Err(Error::InvalidConfiguration {
                message: "Q-table was created for a different maze".to_string(),
            });
        }
        self.table = table;
        Ok(self)
    }

    pub fn maze(&self) -> &'a Maze {
        self.maze
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn into_table(self) -> QTable {
        self.table
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    pub fn initial_state(&self) -> JointState {
        self.initial
    }

    pub fn player_actions(&self) -> &[Action] {
        &self.player_actions
    }

    pub fn pursuer_actions(&self) -> &[Action] {
        &self.pursuer_actions
    }

    /// Value estimate of the initial joint state after every update so far.
    pub fn value_history(&self) -> &[f64] {
        &self.value_history
    }

    /// Best estimated value over the player's feasible actions in `state`.
    pub fn state_value(&self, state: JointState) -> f64 {
        self.table
            .max_value(state, self.player_moves.actions(state.player))
            .unwrap_or(0.0)
    }

    /// Current value estimate of the initial joint state.
    pub fn initial_value(&self) -> f64 {
        self.state_value(self.initial)
    }

    /// Greedy feasible player action in `state`.
    pub fn greedy_action(&self, state: JointState) -> Option<Action> {
        self.table
            .greedy_action(state, self.player_moves.actions(state.player))
    }

    /// Apply one Q-learning update and return the entry's new estimate.
    ///
    /// `Q(s0, a) += 1/n * (r + discount * max_a' Q(s1, a') - Q(s0, a))`, where
    /// `n` is the entry's visit count after incrementing and the maximum runs
    /// over the player's feasible actions in `state1`.
    pub fn update(
        &mut self,
        state0: JointState,
        action: Action,
        reward: f64,
        state1: JointState,
    ) -> f64 {
        let max_future = self.state_value(state1);

        let entry = self.table.entry_mut(state0, action);
        entry.visits += 1;
        let alpha = step_size(entry.visits);
        entry.value += alpha * (reward + self.discount * max_future - entry.value);
        let updated = entry.value;

        let initial_value = self.initial_value();
        self.value_history.push(initial_value);
        updated
    }

    /// Learn from a simulated transition, rewarding the state it arrived in.
    /// Returns the reward applied.
    pub fn learn(&mut self, transition: &Transition) -> f64 {
        let step_reward = reward(self.maze, transition.after);
        self.update(
            transition.before,
            transition.player_action,
            step_reward,
            transition.after,
        );
        step_reward
    }

    /// Joint driver with two uniform-random explorers at the initial state.
    pub fn simulation(&self, seed: Option<u64>) -> Result<Simulation<'a>> {
        Simulation::new(self.maze, seed).with_agents(
            Agent::random_player(self.initial.player, &self.player_actions),
            Agent::random_pursuer(self.initial.pursuer, &self.pursuer_actions),
        )
    }

    /// Run `iterations` single-step updates along one continuous trajectory.
    pub fn run(&mut self, iterations: usize, seed: Option<u64>) -> Result<()> {
        let started = Instant::now();
        info!(
            iterations,
            discount = self.discount,
            entries = self.table.len(),
            "starting Q-learning run"
        );

        let mut simulation = self.simulation(seed)?;
        let checkpoint = (iterations / 10).max(1);
        for iteration in 1..=iterations {
            let transition = simulation.step()?;
            self.learn(&transition);
            if iteration % checkpoint == 0 {
                debug!(iteration, value = self.initial_value(), "learning checkpoint");
            }
        }

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            value = self.initial_value(),
            "Q-learning run complete"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Position;

    fn open_maze() -> Maze {
        Maze::new(4, 4, Position::new(1, 1)).unwrap()
    }

    #[test]
    fn test_reward_rule() {
        let maze = open_maze();
        let caught_on_goal = JointState::new(Position::new(1, 1), Position::new(1, 1));
        let on_goal = JointState::new(Position::new(1, 1), Position::new(3, 3));
        let elsewhere = JointState::new(Position::new(0, 0), Position::new(3, 3));

        assert_eq!(reward(&maze, caught_on_goal), CAPTURE_REWARD);
        assert_eq!(reward(&maze, on_goal), GOAL_STEP_REWARD);
        assert_eq!(reward(&maze, elsewhere), 0.0);
    }

    #[test]
    fn test_step_size_diminishes() {
        assert_eq!(step_size(1), 1.0);
        assert_eq!(step_size(4), 0.25);
    }

    #[test]
    fn test_rejects_discount_outside_unit_interval() {
        let maze = open_maze();
        let start = JointState::new(Position::new(0, 0), Position::new(3, 3));
        for discount in [0.0, 1.0, -0.5, 1.5] {
            let result = QLearningSolver::new(&maze, &Action::ALL, &Action::ALL, start, discount);
            assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
        }
    }

    #[test]
    fn test_value_history_grows_per_update() {
        let maze = open_maze();
        let start = JointState::new(Position::new(0, 0), Position::new(3, 3));
        let mut solver =
            QLearningSolver::new(&maze, &Action::ALL, &Action::ALL, start, 0.8).unwrap();
        solver.run(250, Some(5)).unwrap();
        assert_eq!(solver.value_history().len(), 250);
        assert_eq!(solver.table().total_visits(), 250);
    }
}

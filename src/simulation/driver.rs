//! Joint simulation driver stepping both agents together

use rand::{SeedableRng, rngs::StdRng};

use super::{
    strategy::{DecisionContext, Strategy},
    trajectory::Transition,
};
use crate::{
    Error, Result,
    maze::{Action, Maze, Position, Role},
    types::JointState,
};

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// An agent placed in the maze: role, position, action set and strategy.
#[derive(Debug, Clone)]
pub struct Agent {
    pub role: Role,
    pub position: Position,
    pub actions: Vec<Action>,
    pub strategy: Strategy,
}

impl Agent {
    pub fn new(role: Role, position: Position, actions: &[Action], strategy: Strategy) -> Self {
        Self {
            role,
            position,
            actions: actions.to_vec(),
            strategy,
        }
    }

    /// A player exploring uniformly at random.
    pub fn random_player(position: Position, actions: &[Action]) -> Self {
        Self::new(Role::Player, position, actions, Strategy::UniformRandom)
    }

    /// A pursuer moving uniformly at random; the pursuer is never scripted.
    pub fn random_pursuer(position: Position, actions: &[Action]) -> Self {
        Self::new(Role::Pursuer, position, actions, Strategy::UniformRandom)
    }
}

/// Steps a player and a pursuer through the maze one joint move at a time.
///
/// Both agents must be placed before stepping; the driver samples each
/// agent's action from its strategy, checks legality for the agent's role and
/// then moves both.
#[derive(Debug)]
pub struct Simulation<'a> {
    maze: &'a Maze,
    player: Option<Agent>,
    pursuer: Option<Agent>,
    time_step: usize,
    rng: StdRng,
}

impl<'a> Simulation<'a> {
    pub fn new(maze: &'a Maze, seed: Option<u64>) -> Self {
        Self {
            maze,
            player: None,
            pursuer: None,
            time_step: 0,
            rng: build_rng(seed),
        }
    }

    pub fn with_agents(mut self, player: Agent, pursuer: Agent) -> Result<Self> {
        self.place(player)?;
        self.place(pursuer)?;
        Ok(self)
    }

    /// Put `agent` into the slot matching its role, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PositionOutOfBounds`] if the agent starts off-grid and
    /// [`Error::EmptyActionSet`] if it has nothing to choose from.
    pub fn place(&mut self, agent: Agent) -> Result<()> {
        let what = match agent.role {
            Role::Player => "player start",
            Role::Pursuer => "pursuer start",
        };
        self.maze.check_inside(what, agent.position)?;
        if agent.actions.is_empty() {
            return Err(Error::EmptyActionSet { role: agent.role });
        }

        match agent.role {
            Role::Player => self.player = Some(agent),
            Role::Pursuer => self.pursuer = Some(agent),
        }
        Ok(())
    }

    pub fn maze(&self) -> &'a Maze {
        self.maze
    }

    pub fn time_step(&self) -> usize {
        self.time_step
    }

    pub fn player(&self) -> Option<&Agent> {
        self.player.as_ref()
    }

    pub fn pursuer(&self) -> Option<&Agent> {
        self.pursuer.as_ref()
    }

    /// Current joint state.
    ///
    /// # Errors
    ///
    /// [`Error::MissingAgent`] if either agent has not been placed.
    pub fn state(&self) -> Result<JointState> {
        let player = self
            .player
            .as_ref()
            .ok_or(Error::MissingAgent { role: Role::Player })?;
        let pursuer = self.pursuer.as_ref().ok_or(Error::MissingAgent {
            role: Role::Pursuer,
        })?;
        Ok(JointState::new(player.position, pursuer.position))
    }

    /// Move both agents back to `state` and restart the clock.
    pub fn reset(&mut self, state: JointState) -> Result<()> {
        self.maze.check_inside("player start", state.player)?;
        self.maze.check_inside("pursuer start", state.pursuer)?;
        let player = self
            .player
            .as_mut()
            .ok_or(Error::MissingAgent { role: Role::Player })?;
        player.position = state.player;
        let pursuer = self.pursuer.as_mut().ok_or(Error::MissingAgent {
            role: Role::Pursuer,
        })?;
        pursuer.position = state.pursuer;
        self.time_step = 0;
        Ok(())
    }

    /// Sample one action per agent for the current state without moving.
    pub fn choose_actions(&mut self) -> Result<(Action, Action)> {
        let player = self
            .player
            .as_ref()
            .ok_or(Error::MissingAgent { role: Role::Player })?;
        let pursuer = self.pursuer.as_ref().ok_or(Error::MissingAgent {
            role: Role::Pursuer,
        })?;
        let state = JointState::new(player.position, pursuer.position);

        let player_action = choose(self.maze, player, state, self.time_step, &mut self.rng)?;
        let pursuer_action = choose(self.maze, pursuer, state, self.time_step, &mut self.rng)?;
        Ok((player_action, pursuer_action))
    }

    /// Apply already-validated actions to both agents.
    pub(crate) fn advance(
        &mut self,
        player_action: Action,
        pursuer_action: Action,
    ) -> Result<Transition> {
        let before = self.state()?;
        let after = JointState::new(
            before.player.apply(player_action),
            before.pursuer.apply(pursuer_action),
        );
        if let Some(player) = self.player.as_mut() {
            player.position = after.player;
        }
        if let Some(pursuer) = self.pursuer.as_mut() {
            pursuer.position = after.pursuer;
        }

        let transition = Transition {
            time_step: self.time_step,
            before,
            player_action,
            pursuer_action,
            after,
        };
        self.time_step += 1;
        Ok(transition)
    }

    /// Sample, check and apply one joint move.
    ///
    /// # Errors
    ///
    /// [`Error::MissingAgent`] if either agent is missing; the simulation does
    /// not move in that case.
    pub fn step(&mut self) -> Result<Transition> {
        let (player_action, pursuer_action) = self.choose_actions()?;
        self.advance(player_action, pursuer_action)
    }
}

/// Ask `agent`'s strategy for an action and confirm it is legal for its role.
fn choose(
    maze: &Maze,
    agent: &Agent,
    state: JointState,
    time_step: usize,
    rng: &mut StdRng,
) -> Result<Action> {
    let ctx = DecisionContext {
        maze,
        role: agent.role,
        time_step,
        actions: &agent.actions,
    };
    let action = agent.strategy.choose_action(state, &ctx, rng)?;
    if !maze.is_action_legal(agent.role, action, agent.position) {
        return Err(Error::NoFeasibleActions {
            role: agent.role,
            position: agent.position,
        });
    }
    Ok(action)
}

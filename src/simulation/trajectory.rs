//! Transitions and recorded game traces

use serde::{Deserialize, Serialize};

use crate::{maze::Action, maze::Maze, types::JointState};

/// One simulated step of both agents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Time step at which the actions were taken (0 = first move).
    pub time_step: usize,
    pub before: JointState,
    pub player_action: Action,
    pub pursuer_action: Action,
    pub after: JointState,
}

/// How a recorded game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Player stood on the goal after `step` moves.
    ReachedGoal { step: usize },
    /// Pursuer caught the player after `step` moves.
    Captured { step: usize },
    /// Neither happened within the recorded steps.
    Unresolved,
}

/// Snapshots of a game from its start state onwards.
///
/// Every step stores copies of the joint state, never references into the
/// live simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    start: JointState,
    transitions: Vec<Transition>,
}

impl Trajectory {
    pub fn new(start: JointState) -> Self {
        Self {
            start,
            transitions: Vec::new(),
        }
    }

    pub fn push(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    pub fn start(&self) -> JointState {
        self.start
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Number of recorded moves.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Joint states visited, starting with the initial one.
    pub fn states(&self) -> impl Iterator<Item = JointState> + '_ {
        std::iter::once(self.start).chain(self.transitions.iter().map(|t| t.after))
    }

    pub fn final_state(&self) -> JointState {
        self.transitions.last().map_or(self.start, |t| t.after)
    }

    /// First absorbing event along the trace. Capture wins over the goal when
    /// both happen on the same cell.
    pub fn outcome(&self, maze: &Maze) -> Outcome {
        for (step, state) in self.states().enumerate() {
            if state.is_capture() {
                return Outcome::Captured { step };
            }
            if maze.is_goal(state.player) {
                return Outcome::ReachedGoal { step };
            }
        }
        Outcome::Unresolved
    }
}

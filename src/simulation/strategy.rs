//! Action selection strategies for simulated agents

use std::sync::Arc;

use rand::{Rng, seq::IndexedRandom};

use crate::{
    Error, Result,
    bellman::PolicyTable,
    maze::{Action, Maze, Position, Role},
    types::JointState,
};

/// How an agent picks its next action.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Follow a solved policy table, reading the decision for the current
    /// time step.
    Scripted(Arc<PolicyTable>),
    /// Pick uniformly among the agent's feasible actions.
    UniformRandom,
}

/// What a strategy can see when choosing.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub maze: &'a Maze,
    pub role: Role,
    pub time_step: usize,
    /// The agent's action set, in enumeration order.
    pub actions: &'a [Action],
}

impl Strategy {
    /// Choose an action for the agent of `ctx.role` in joint state `state`.
    ///
    /// # Errors
    ///
    /// [`Error::NoFeasibleActions`] if a random explorer is boxed in, and
    /// [`Error::HorizonExceeded`] when a scripted agent runs past its table.
    pub fn choose_action<R: Rng + ?Sized>(
        &self,
        state: JointState,
        ctx: &DecisionContext<'_>,
        rng: &mut R,
    ) -> Result<Action> {
        match self {
            Strategy::Scripted(table) => {
                Ok(table.decision_at(state, ctx.time_step)?.action)
            }
            Strategy::UniformRandom => {
                let position = own_position(state, ctx.role);
                let feasible = ctx.maze.feasible_actions(ctx.actions, position, ctx.role);
                feasible
                    .choose(rng)
                    .copied()
                    .ok_or(Error::NoFeasibleActions {
                        role: ctx.role,
                        position,
                    })
            }
        }
    }
}

fn own_position(state: JointState, role: Role) -> Position {
    match role {
        Role::Player => state.player,
        Role::Pursuer => state.pursuer,
    }
}

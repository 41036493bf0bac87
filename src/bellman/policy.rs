//! Horizon-indexed policy table produced by backward induction

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    maze::{Action, Maze},
    types::{JointState, StateSpace},
};

/// Optimal action and its expected value at one state and horizon step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    pub value: f64,
}

/// Decisions for every joint state, one layer per solved horizon step.
///
/// Layers are stored in the order they were computed: layer `0` is the
/// terminal step (no moves remaining), the last layer is time step `0` of the
/// game (`horizon` moves remaining). Reading a state's sequence from the end
/// therefore walks the game forwards in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyTable {
    space: StateSpace,
    layers: Vec<Vec<Decision>>,
}

impl PolicyTable {
    /// Create an empty table covering every joint state of `maze`.
    pub fn new(maze: &Maze) -> Self {
        Self {
            space: StateSpace::new(maze),
            layers: Vec::new(),
        }
    }

    pub fn space(&self) -> StateSpace {
        self.space
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of recorded layers (`horizon + 1` once solved).
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Solved horizon, i.e. the number of decision steps from time zero.
    pub fn horizon(&self) -> Option<usize> {
        self.layers.len().checked_sub(1)
    }

    pub(crate) fn push_layer(&mut self, layer: Vec<Decision>) {
        debug_assert_eq!(layer.len(), self.space.len());
        self.layers.push(layer);
    }

    pub(crate) fn latest_layer(&self) -> Option<&[Decision]> {
        self.layers.last().map(Vec::as_slice)
    }

    /// The full decision sequence for `state`, in computation order.
    ///
    /// Entry `k` holds the decision with `k` moves remaining; the last entry
    /// is the decision at the start of the game.
    pub fn decisions(&self, state: JointState) -> Vec<Decision> {
        let index = self.space.index(state);
        self.layers.iter().map(|layer| layer[index]).collect()
    }

    /// Decision for `state` with `remaining` moves left before the horizon.
    pub fn with_remaining(&self, state: JointState, remaining: usize) -> Option<Decision> {
        self.layers
            .get(remaining)
            .map(|layer| layer[self.space.index(state)])
    }

    /// Decision for `state` at game time step `time_step` (0 = first move).
    ///
    /// # Errors
    ///
    /// Returns [`Error::HorizonExceeded`] when `time_step` lies beyond the
    /// solved horizon, including on an unsolved table.
    pub fn decision_at(&self, state: JointState, time_step: usize) -> Result<Decision> {
        let horizon = self.horizon().unwrap_or(0);
        if self.layers.is_empty() || time_step > horizon {
            return Err(Error::HorizonExceeded {
                step: time_step,
                horizon,
            });
        }
        Ok(self.layers[horizon - time_step][self.space.index(state)])
    }

    /// Value of `state` with `remaining` moves left.
    pub fn value(&self, state: JointState, remaining: usize) -> Option<f64> {
        self.with_remaining(state, remaining)
            .map(|decision| decision.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Position;

    fn two_cell_table() -> (PolicyTable, JointState) {
        let maze = Maze::new(2, 1, Position::new(1, 0)).unwrap();
        let mut table = PolicyTable::new(&maze);
        let n = table.space().len();
        table.push_layer(vec![
            Decision {
                action: Action::Stay,
                value: 0.0,
            };
            n
        ]);
        table.push_layer(vec![
            Decision {
                action: Action::Right,
                value: 100.0,
            };
            n
        ]);
        let state = JointState::new(Position::new(0, 0), Position::new(1, 0));
        (table, state)
    }

    #[test]
    fn test_layers_are_read_from_the_end_for_time_steps() {
        let (table, state) = two_cell_table();
        assert_eq!(table.horizon(), Some(1));
        assert_eq!(table.decision_at(state, 0).unwrap().action, Action::Right);
        assert_eq!(table.decision_at(state, 1).unwrap().action, Action::Stay);
        assert_eq!(table.with_remaining(state, 1).unwrap().value, 100.0);
        assert_eq!(table.decisions(state).len(), 2);
    }

    #[test]
    fn test_time_step_past_horizon_is_an_error() {
        let (table, state) = two_cell_table();
        assert!(matches!(
            table.decision_at(state, 2),
            Err(Error::HorizonExceeded {
                step: 2,
                horizon: 1
            })
        ));
    }
}

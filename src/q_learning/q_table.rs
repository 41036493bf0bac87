//! Dense Q-table with per-entry visit counts

use serde::{Deserialize, Serialize};

use crate::{
    maze::{Action, Maze},
    types::{JointState, StateSpace},
};

/// Initial value estimate of every entry.
pub const DEFAULT_Q_INIT: f64 = 0.1;

/// Value estimate and update count of one `(state, action)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QEntry {
    pub value: f64,
    pub visits: u64,
}

/// Q-values for every `(player, pursuer, action)` tuple.
///
/// Entries live in one flat vector indexed by the joint-state index times the
/// action count plus the action index, so every tuple exists from the start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QTable {
    space: StateSpace,
    entries: Vec<QEntry>,
}

impl QTable {
    /// Create a table for `maze` with every entry at `q_init` and no visits.
    pub fn new(maze: &Maze, q_init: f64) -> Self {
        let space = StateSpace::new(maze);
        Self {
            space,
            entries: vec![
                QEntry {
                    value: q_init,
                    visits: 0,
                };
                space.len() * Action::COUNT
            ],
        }
    }

    pub fn space(&self) -> StateSpace {
        self.space
    }

    fn slot(&self, state: JointState, action: Action) -> usize {
        self.space.index(state) * Action::COUNT + action.index()
    }

    pub fn entry(&self, state: JointState, action: Action) -> QEntry {
        self.entries[self.slot(state, action)]
    }

    pub(crate) fn entry_mut(&mut self, state: JointState, action: Action) -> &mut QEntry {
        let slot = self.slot(state, action);
        &mut self.entries[slot]
    }

    pub fn value(&self, state: JointState, action: Action) -> f64 {
        self.entry(state, action).value
    }

    pub fn visits(&self, state: JointState, action: Action) -> u64 {
        self.entry(state, action).visits
    }

    /// Largest value over `actions`, or `None` if there are none.
    pub fn max_value(
        &self,
        state: JointState,
        actions: impl IntoIterator<Item = Action>,
    ) -> Option<f64> {
        actions
            .into_iter()
            .map(|action| self.value(state, action))
            .reduce(f64::max)
    }

    /// Highest-valued action among `actions`; the first one wins ties.
    pub fn greedy_action(
        &self,
        state: JointState,
        actions: impl IntoIterator<Item = Action>,
    ) -> Option<Action> {
        let mut best: Option<(Action, f64)> = None;
        for action in actions {
            let value = self.value(state, action);
            if best.is_none_or(|(_, current)| value > current) {
                best = Some((action, value));
            }
        }
        best.map(|(action, _)| action)
    }

    /// Total number of updates applied across all entries.
    pub fn total_visits(&self) -> u64 {
        self.entries.iter().map(|entry| entry.visits).sum()
    }

    /// Number of entries updated at least once.
    pub fn visited_entries(&self) -> usize {
        self.entries.iter().filter(|entry| entry.visits > 0).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Joint state and dense state-space indexing shared by both solvers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::maze::{Maze, Position};

/// Positions of the player and the pursuer at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JointState {
    pub player: Position,
    pub pursuer: Position,
}

impl JointState {
    pub const fn new(player: Position, pursuer: Position) -> Self {
        Self { player, pursuer }
    }

    /// Player and pursuer share a cell.
    pub fn is_capture(&self) -> bool {
        self.player == self.pursuer
    }

    /// Player has reached the goal or has been caught.
    pub fn is_absorbing(&self, maze: &Maze) -> bool {
        maze.is_goal(self.player) || self.is_capture()
    }
}

impl fmt::Display for JointState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {} / pursuer {}", self.player, self.pursuer)
    }
}

/// Flattened encoding of every `(x_p, y_p, x_b, y_b)` joint state.
///
/// The index order matches nested iteration over player x, player y,
/// pursuer x, pursuer y, so index `0` is both agents at `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSpace {
    length: usize,
    height: usize,
}

impl StateSpace {
    pub fn new(maze: &Maze) -> Self {
        Self {
            length: maze.length() as usize,
            height: maze.height() as usize,
        }
    }

    /// Total number of joint states, `(length * height)^2`.
    pub fn len(&self) -> usize {
        let cells = self.length * self.height;
        cells * cells
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell(&self, position: Position) -> usize {
        debug_assert!(
            position.x >= 0
                && position.y >= 0
                && (position.x as usize) < self.length
                && (position.y as usize) < self.height,
            "position {position} outside the state space"
        );
        position.x as usize * self.height + position.y as usize
    }

    fn position(&self, cell: usize) -> Position {
        Position::new((cell / self.height) as i32, (cell % self.height) as i32)
    }

    /// Dense index of a joint state. Both positions must be grid cells.
    pub fn index(&self, state: JointState) -> usize {
        let cells = self.length * self.height;
        self.cell(state.player) * cells + self.cell(state.pursuer)
    }

    /// Inverse of [`StateSpace::index`].
    pub fn state(&self, index: usize) -> JointState {
        let cells = self.length * self.height;
        JointState::new(self.position(index / cells), self.position(index % cells))
    }

    /// Every joint state in index order.
    pub fn states(&self) -> impl Iterator<Item = JointState> + '_ {
        (0..self.len()).map(|index| self.state(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_follows_nested_iteration_order() {
        let maze = Maze::new(3, 2, Position::new(0, 0)).unwrap();
        let space = StateSpace::new(&maze);
        assert_eq!(space.len(), 36);

        let mut expected = 0;
        for x_p in 0..3 {
            for y_p in 0..2 {
                for x_b in 0..3 {
                    for y_b in 0..2 {
                        let state =
                            JointState::new(Position::new(x_p, y_p), Position::new(x_b, y_b));
                        assert_eq!(space.index(state), expected);
                        assert_eq!(space.state(expected), state);
                        expected += 1;
                    }
                }
            }
        }
    }

    #[test]
    fn test_absorbing_states() {
        let maze = Maze::new(3, 3, Position::new(1, 1)).unwrap();
        let at_goal = JointState::new(Position::new(1, 1), Position::new(0, 0));
        let caught = JointState::new(Position::new(2, 0), Position::new(2, 0));
        let running = JointState::new(Position::new(0, 0), Position::new(2, 2));

        assert!(at_goal.is_absorbing(&maze));
        assert!(caught.is_absorbing(&maze));
        assert!(caught.is_capture());
        assert!(!running.is_absorbing(&maze));
    }
}

//! Positions, actions and roles

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// A cell coordinate in the maze.
///
/// Positions are plain values: moving produces a new `Position`, nothing is
/// mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position reached by taking `action` from here.
    ///
    /// No legality check is performed. Callers must confirm feasibility with
    /// [`crate::maze::Maze`] first; applying an infeasible action yields a cell
    /// outside the traversable region.
    pub fn apply(self, action: Action) -> Position {
        let (dx, dy) = action.delta();
        Position::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

/// A single-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Stay,
}

impl Action {
    /// Every action, in canonical order.
    pub const ALL: [Action; 5] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Stay,
    ];

    /// Number of distinct actions.
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index of the action, matching its position in [`Action::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
            Action::Stay => 4,
        }
    }

    /// Coordinate change `(dx, dy)`.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
            Action::Stay => (0, 0),
        }
    }

    /// The action that undoes this one.
    pub const fn inverse(self) -> Action {
        match self {
            Action::Up => Action::Down,
            Action::Down => Action::Up,
            Action::Left => Action::Right,
            Action::Right => Action::Left,
            Action::Stay => Action::Stay,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
            Action::Stay => "stay",
        }
    }

    /// Parse a comma-separated list such as `"up,down,stay"`.
    pub fn parse_list(input: &str) -> Result<Vec<Action>, Error> {
        input
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(Action::Up),
            "down" | "d" => Ok(Action::Down),
            "left" | "l" => Ok(Action::Left),
            "right" | "r" => Ok(Action::Right),
            "stay" | "s" => Ok(Action::Stay),
            other => Err(Error::ParseAction {
                input: other.to_string(),
                expected: "up, down, left, right, stay".to_string(),
            }),
        }
    }
}

/// Which side of the game an agent plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Tries to reach the goal; blocked by every wall.
    Player,
    /// Chases the player; blocked by outer walls only.
    Pursuer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Player => f.write_str("player"),
            Role::Pursuer => f.write_str("pursuer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_moves_along_axes() {
        let origin = Position::new(2, 2);
        assert_eq!(origin.apply(Action::Up), Position::new(2, 1));
        assert_eq!(origin.apply(Action::Down), Position::new(2, 3));
        assert_eq!(origin.apply(Action::Left), Position::new(1, 2));
        assert_eq!(origin.apply(Action::Right), Position::new(3, 2));
        assert_eq!(origin.apply(Action::Stay), origin);
    }

    #[test]
    fn test_apply_ignores_legality() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.apply(Action::Left), Position::new(-1, 0));
        assert_eq!(corner.apply(Action::Up), Position::new(0, -1));
    }

    #[test]
    fn test_index_matches_canonical_order() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
        }
    }

    #[test]
    fn test_parse_list() {
        let actions = Action::parse_list("up, Down,stay").unwrap();
        assert_eq!(actions, vec![Action::Up, Action::Down, Action::Stay]);
        assert!(matches!(
            Action::parse_list("up,jump"),
            Err(Error::ParseAction { .. })
        ));
    }
}

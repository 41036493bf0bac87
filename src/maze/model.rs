//! Wall geometry and action legality

use serde::{Deserialize, Serialize};

use super::position::{Action, Position, Role};
use crate::{Error, Result};

/// Axis a wall segment runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Sits between columns `at` and `at + 1`, blocking left/right moves.
    Vertical,
    /// Sits between rows `at` and `at + 1`, blocking up/down moves.
    Horizontal,
}

/// A wall segment between adjacent cells.
///
/// A wall at coordinate `at` blocks crossing between `at` and `at + 1` on its
/// axis, for every perpendicular coordinate in `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wall {
    pub orientation: Orientation,
    pub at: i32,
    pub min: i32,
    pub max: i32,
    /// Boundary walls bind both roles; interior walls bind the player only.
    pub outer: bool,
}

impl Wall {
    pub fn vertical(x: i32, y_min: i32, y_max: i32, outer: bool) -> Result<Self> {
        Self::new(Orientation::Vertical, x, y_min, y_max, outer)
    }

    pub fn horizontal(y: i32, x_min: i32, x_max: i32, outer: bool) -> Result<Self> {
        Self::new(Orientation::Horizontal, y, x_min, x_max, outer)
    }

    fn new(orientation: Orientation, at: i32, min: i32, max: i32, outer: bool) -> Result<Self> {
        if min > max {
            return Err(Error::InvalidWallRange { min, max });
        }
        Ok(Self {
            orientation,
            at,
            min,
            max,
            outer,
        })
    }

    /// Whether this wall stops `action` taken from `position`.
    pub fn blocks(&self, action: Action, position: Position) -> bool {
        match (self.orientation, action) {
            (Orientation::Horizontal, Action::Down) => {
                position.y == self.at && self.spans(position.x)
            }
            (Orientation::Horizontal, Action::Up) => {
                position.y == self.at + 1 && self.spans(position.x)
            }
            (Orientation::Vertical, Action::Right) => {
                position.x == self.at && self.spans(position.y)
            }
            (Orientation::Vertical, Action::Left) => {
                position.x == self.at + 1 && self.spans(position.y)
            }
            _ => false,
        }
    }

    fn spans(&self, coordinate: i32) -> bool {
        (self.min..=self.max).contains(&coordinate)
    }
}

/// Grid maze with a goal cell and wall segments.
///
/// The four boundary walls are added on construction and are always outer.
/// Walls are immutable once the maze is handed to a solver; every query here
/// is a pure function of the wall list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maze {
    length: i32,
    height: i32,
    goal: Position,
    walls: Vec<Wall>,
}

impl Maze {
    /// Create a maze enclosed by its boundary walls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for an empty grid and
    /// [`Error::PositionOutOfBounds`] if the goal lies outside it.
    pub fn new(length: i32, height: i32, goal: Position) -> Result<Self> {
        if length < 1 || height < 1 {
            return Err(Error::InvalidDimensions { length, height });
        }

        let mut maze = Self {
            length,
            height,
            goal,
            walls: Vec::new(),
        };
        maze.check_inside("goal", goal)?;

        maze.add_vertical_wall(-1, 0, height - 1, true)?;
        maze.add_vertical_wall(length - 1, 0, height - 1, true)?;
        maze.add_horizontal_wall(-1, 0, length - 1, true)?;
        maze.add_horizontal_wall(height - 1, 0, length - 1, true)?;

        Ok(maze)
    }

    /// Add a wall between columns `x` and `x + 1` spanning rows `y_min..=y_max`.
    pub fn add_vertical_wall(&mut self, x: i32, y_min: i32, y_max: i32, outer: bool) -> Result<()> {
        self.walls.push(Wall::vertical(x, y_min, y_max, outer)?);
        Ok(())
    }

    /// Add a wall between rows `y` and `y + 1` spanning columns `x_min..=x_max`.
    pub fn add_horizontal_wall(
        &mut self,
        y: i32,
        x_min: i32,
        x_max: i32,
        outer: bool,
    ) -> Result<()> {
        self.walls.push(Wall::horizontal(y, x_min, x_max, outer)?);
        Ok(())
    }

    /// Builder-style variant of [`Maze::add_vertical_wall`] for interior walls.
    pub fn with_vertical_wall(mut self, x: i32, y_min: i32, y_max: i32) -> Result<Self> {
        self.add_vertical_wall(x, y_min, y_max, false)?;
        Ok(self)
    }

    /// Builder-style variant of [`Maze::add_horizontal_wall`] for interior walls.
    pub fn with_horizontal_wall(mut self, y: i32, x_min: i32, x_max: i32) -> Result<Self> {
        self.add_horizontal_wall(y, x_min, x_max, false)?;
        Ok(self)
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    /// Number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        (self.length * self.height) as usize
    }

    /// All walls, in insertion order.
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Boundary walls only.
    pub fn outer_walls(&self) -> impl Iterator<Item = &Wall> {
        self.walls.iter().filter(|wall| wall.outer)
    }

    pub fn is_goal(&self, position: Position) -> bool {
        position == self.goal
    }

    pub fn contains(&self, position: Position) -> bool {
        (0..self.length).contains(&position.x) && (0..self.height).contains(&position.y)
    }

    /// Fail with [`Error::PositionOutOfBounds`] unless `position` is a grid cell.
    pub fn check_inside(&self, what: &'static str, position: Position) -> Result<()> {
        if self.contains(position) {
            Ok(())
        } else {
            Err(Error::PositionOutOfBounds {
                what,
                position,
                length: self.length,
                height: self.height,
            })
        }
    }

    /// Every cell, column by column (`x` outer, `y` inner).
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.length).flat_map(move |x| (0..self.height).map(move |y| Position::new(x, y)))
    }

    /// Whether the player may take `action` from `position`.
    ///
    /// `Stay` is always legal; a directional move is legal unless any wall,
    /// interior or outer, lies on the boundary it would cross.
    pub fn is_player_action_legal(&self, action: Action, position: Position) -> bool {
        action == Action::Stay || !self.walls.iter().any(|wall| wall.blocks(action, position))
    }

    /// Whether the pursuer may take `action` from `position`.
    ///
    /// Same rule as [`Maze::is_player_action_legal`], but only outer walls are
    /// consulted: the pursuer passes through interior walls.
    pub fn is_pursuer_action_legal(&self, action: Action, position: Position) -> bool {
        action == Action::Stay || !self.outer_walls().any(|wall| wall.blocks(action, position))
    }

    pub fn is_action_legal(&self, role: Role, action: Action, position: Position) -> bool {
        match role {
            Role::Player => self.is_player_action_legal(action, position),
            Role::Pursuer => self.is_pursuer_action_legal(action, position),
        }
    }

    /// Filter `candidates` down to the actions legal for `role` at `position`,
    /// preserving their order.
    pub fn feasible_actions(&self, candidates: &[Action], position: Position, role: Role) -> Vec<Action> {
        candidates
            .iter()
            .copied()
            .filter(|&action| self.is_action_legal(role, action, position))
            .collect()
    }
}

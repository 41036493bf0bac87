//! Maze geometry and movement rules
//!
//! A maze is a `length x height` grid with `(0, 0)` in the top-left corner,
//! `x` growing to the right and `y` growing downwards. Walls sit between
//! adjacent cells. Boundary walls are tagged *outer*; the pursuer only respects
//! outer walls, while the player is blocked by every wall.

pub mod model;
pub mod moves;
pub mod position;

pub use model::{Maze, Orientation, Wall};
pub use moves::MoveTable;
pub use position::{Action, Position, Role};

//! Shared mazes for the pursuit test suite.

#![allow(dead_code)]

use pursuit::{
    config::MazePreset,
    maze::{Maze, Position},
    types::JointState,
};

/// Open 4x4 maze with the goal at (1, 1).
pub fn open4() -> Maze {
    MazePreset::Open4.config().build_maze().unwrap()
}

/// The 6x5 reference maze with five interior walls.
pub fn reference_maze() -> Maze {
    MazePreset::Default.config().build_maze().unwrap()
}

pub fn state(xp: i32, yp: i32, xb: i32, yb: i32) -> JointState {
    JointState::new(Position::new(xp, yp), Position::new(xb, yb))
}

/// One-row corridor `(0,0) (1,0) (2,0)` with the goal in the middle.
pub fn corridor() -> Maze {
    Maze::new(3, 1, Position::new(1, 0)).unwrap()
}

//! Precomputed feasible moves per cell

use super::{
    model::Maze,
    position::{Action, Position, Role},
};

/// Feasible `(action, destination)` pairs for one role at every cell.
///
/// Built once from a maze and a candidate action set so that solvers do not
/// re-scan the wall list for every state they visit. Pairs keep the order of
/// the candidate set.
#[derive(Debug, Clone)]
pub struct MoveTable {
    role: Role,
    height: i32,
    cells: Vec<Vec<(Action, Position)>>,
}

impl MoveTable {
    pub fn new(maze: &Maze, candidates: &[Action], role: Role) -> Self {
        let cells = maze
            .positions()
            .map(|position| {
                maze.feasible_actions(candidates, position, role)
                    .into_iter()
                    .map(|action| (action, position.apply(action)))
                    .collect()
            })
            .collect();

        Self {
            role,
            height: maze.height(),
            cells,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Feasible moves from `position`, which must be a grid cell.
    pub fn moves(&self, position: Position) -> &[(Action, Position)] {
        &self.cells[(position.x * self.height + position.y) as usize]
    }

    /// Feasible actions from `position`, in candidate order.
    pub fn actions(&self, position: Position) -> impl Iterator<Item = Action> + '_ {
        self.moves(position).iter().map(|&(action, _)| action)
    }

    /// First cell with no feasible move, if any.
    pub fn first_dead_end(&self) -> Option<Position> {
        self.cells
            .iter()
            .position(Vec::is_empty)
            .map(|cell| Position::new(cell as i32 / self.height, cell as i32 % self.height))
    }
}

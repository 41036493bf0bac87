//! Serialization support for learned Q-tables.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use serde::{Deserialize, Serialize};

use super::{learner::QLearningSolver, q_table::QTable};
use crate::{
    Error, Result,
    maze::{Action, Maze},
    types::JointState,
};

/// A learning run frozen to disk: table, value history and the settings
/// needed to resume it, including the maze it was learned on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedQTable {
    pub version: u32,
    pub maze: Maze,
    pub discount: f64,
    pub initial: JointState,
    pub player_actions: Vec<Action>,
    pub pursuer_actions: Vec<Action>,
    pub table: QTable,
    pub value_history: Vec<f64>,
}

impl SavedQTable {
    pub const VERSION: u32 = 2;

    pub fn from_solver(solver: &QLearningSolver<'_>) -> Self {
        Self {
            version: Self::VERSION,
            maze: solver.maze().clone(),
            discount: solver.discount(),
            initial: solver.initial_state(),
            player_actions: solver.player_actions().to_vec(),
            pursuer_actions: solver.pursuer_actions().to_vec(),
            table: solver.table().clone(),
            value_history: solver.value_history().to_vec(),
        }
    }

    /// Rebuild a solver over `maze` that continues from the saved table.
    ///
    /// The value history restarts empty.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] unless `maze` has the same size, goal
    /// and walls as the maze the table was learned on.
    pub fn to_solver<'a>(&self, maze: &'a Maze) -> Result<QLearningSolver<'a>> {
        if self.version != Self::VERSION {
            return Err(Error::SerializationContext {
                operation: "restore Q-table".to_string(),
                message: format!(
                    "unsupported save format version {} (expected {})",
                    self.version,
                    Self::VERSION
                ),
            });
        }
        if self.maze != *maze {
            return Err(Error::InvalidConfiguration {
                message: "saved Q-table was learned on a different maze layout".to_string(),
            });
        }

        QLearningSolver::new(
            maze,
            &self.player_actions,
            &self.pursuer_actions,
            self.initial,
            self.discount,
        )?
        .with_table(self.table.clone())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {}", path.display()),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).map_err(|e| Error::SerializationContext {
            operation: "serialize Q-table to MessagePack".to_string(),
            message: e.to_string(),
        })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {}", path.display()),
            source,
        })?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).map_err(|e| Error::SerializationContext {
            operation: "deserialize Q-table from MessagePack".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::maze::Position;

    #[test]
    fn test_saved_table_resumes_learning() {
        let maze = Maze::new(3, 3, Position::new(2, 2)).unwrap();
        let start = JointState::new(Position::new(0, 0), Position::new(2, 0));
        let mut solver =
            QLearningSolver::new(&maze, &Action::ALL, &Action::ALL, start, 0.5).unwrap();
        solver.run(300, Some(11)).unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("q.msgpack");
        SavedQTable::from_solver(&solver).save_to_file(&path).unwrap();

        let loaded = SavedQTable::load_from_file(&path).unwrap();
        assert_eq!(loaded.value_history.len(), 300);

        let restored = loaded.to_solver(&maze).unwrap();
        assert_eq!(restored.table().total_visits(), 300);
        assert_eq!(restored.initial_value(), solver.initial_value());
    }

    #[test]
    fn test_rejects_table_for_same_size_other_layout() {
        let open = Maze::new(3, 3, Position::new(2, 2)).unwrap();
        let walled = open.clone().with_horizontal_wall(0, 0, 1).unwrap();
        let moved_goal = Maze::new(3, 3, Position::new(0, 2)).unwrap();
        let start = JointState::new(Position::new(0, 0), Position::new(2, 0));
        let mut solver =
            QLearningSolver::new(&open, &Action::ALL, &Action::ALL, start, 0.5).unwrap();
        solver.run(50, Some(3)).unwrap();

        let saved = SavedQTable::from_solver(&solver);
        assert_eq!(saved.maze, open);
        for other in [&walled, &moved_goal] {
            assert!(matches!(
                saved.to_solver(other),
                Err(Error::InvalidConfiguration { .. })
            ));
        }
        assert!(saved.to_solver(&open).is_ok());
    }

    #[test]
    fn test_rejects_table_for_other_maze() {
        let small = Maze::new(2, 2, Position::new(1, 1)).unwrap();
        let large = Maze::new(3, 3, Position::new(1, 1)).unwrap();
        let start = JointState::new(Position::new(0, 0), Position::new(1, 0));
        let solver = QLearningSolver::new(&small, &Action::ALL, &Action::ALL, start, 0.5).unwrap();

        let saved = SavedQTable::from_solver(&solver);
        assert!(matches!(
            saved.to_solver(&large),
            Err(Error::InvalidConfiguration { .. })
        ));
    }
}

//! Experiment configuration
//!
//! A single JSON document describes the maze, the Bellman run and the
//! Q-learning run. Every section falls back to the reference experiment, so
//! `{}` is a valid configuration file.

use std::{fmt, fs::File, io::BufReader, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    maze::{Action, Maze, Orientation, Position},
    q_learning::DEFAULT_Q_INIT,
    types::JointState,
};

/// An interior wall as written in a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallSpec {
    pub orientation: Orientation,
    pub at: i32,
    pub min: i32,
    pub max: i32,
}

impl WallSpec {
    pub const fn vertical(x: i32, y_min: i32, y_max: i32) -> Self {
        Self {
            orientation: Orientation::Vertical,
            at: x,
            min: y_min,
            max: y_max,
        }
    }

    pub const fn horizontal(y: i32, x_min: i32, x_max: i32) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            at: y,
            min: x_min,
            max: x_max,
        }
    }
}

/// Built-in maze layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MazePreset {
    /// 6x5 maze with five interior walls and the goal at (4, 4)
    #[default]
    Default,
    /// Open 4x4 maze with the goal at (1, 1)
    Open4,
}

impl MazePreset {
    const NAMES: &'static str = "default, open4";

    pub fn config(self) -> MazeConfig {
        match self {
            MazePreset::Default => MazeConfig {
                length: 6,
                height: 5,
                goal: Position::new(4, 4),
                walls: vec![
                    WallSpec::horizontal(3, 1, 4),
                    WallSpec::horizontal(1, 4, 5),
                    WallSpec::vertical(1, 0, 2),
                    WallSpec::vertical(3, 1, 2),
                    WallSpec::vertical(3, 4, 4),
                ],
                player_start: Position::new(0, 0),
                pursuer_start: Position::new(4, 4),
            },
            MazePreset::Open4 => MazeConfig {
                length: 4,
                height: 4,
                goal: Position::new(1, 1),
                walls: Vec::new(),
                player_start: Position::new(0, 0),
                pursuer_start: Position::new(3, 3),
            },
        }
    }
}

impl fmt::Display for MazePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazePreset::Default => write!(f, "default"),
            MazePreset::Open4 => write!(f, "open4"),
        }
    }
}

impl FromStr for MazePreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "reference" => Ok(MazePreset::Default),
            "open4" | "open" => Ok(MazePreset::Open4),
            other => Err(Error::ParsePreset {
                input: other.to_string(),
                expected: Self::NAMES.to_string(),
            }),
        }
    }
}

/// Maze geometry and the game's starting positions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub length: i32,
    pub height: i32,
    pub goal: Position,
    /// Interior walls; the boundary is always added.
    pub walls: Vec<WallSpec>,
    pub player_start: Position,
    pub pursuer_start: Position,
}

impl Default for MazeConfig {
    fn default() -> Self {
        MazePreset::Default.config()
    }
}

impl MazeConfig {
    pub fn build_maze(&self) -> Result<Maze> {
        let mut maze = Maze::new(self.length, self.height, self.goal)?;
        for wall in &self.walls {
            match wall.orientation {
                Orientation::Vertical => {
                    maze.add_vertical_wall(wall.at, wall.min, wall.max, false)?
                }
                Orientation::Horizontal => {
                    maze.add_horizontal_wall(wall.at, wall.min, wall.max, false)?
                }
            }
        }
        Ok(maze)
    }

    pub fn start(&self) -> JointState {
        JointState::new(self.player_start, self.pursuer_start)
    }
}

/// Finite-horizon solver settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BellmanConfig {
    pub horizon: usize,
    pub player_actions: Vec<Action>,
    pub pursuer_actions: Vec<Action>,
}

impl Default for BellmanConfig {
    fn default() -> Self {
        Self {
            horizon: 15,
            player_actions: Action::ALL.to_vec(),
            pursuer_actions: Action::ALL.to_vec(),
        }
    }
}

/// Q-learning run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    pub iterations: usize,
    pub discount: f64,
    pub q_init: f64,
    pub seed: Option<u64>,
    pub reset_probability: Option<f64>,
    /// The learner tracks the initial state with the pursuer here, and the
    /// player at the maze's player start.
    pub pursuer_start: Position,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            discount: 0.8,
            q_init: DEFAULT_Q_INIT,
            seed: None,
            reset_probability: None,
            pursuer_start: Position::new(3, 3),
        }
    }
}

/// Complete experiment configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub maze: MazeConfig,
    pub bellman: BellmanConfig,
    pub learning: LearningConfig,
}

impl ExperimentConfig {
    /// Defaults with the maze section replaced by a preset.
    pub fn preset(preset: MazePreset) -> Self {
        Self {
            maze: preset.config(),
            ..Self::default()
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config file {}", path.display()),
            source,
        })?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Initial joint state tracked by the learner.
    pub fn learning_start(&self) -> JointState {
        JointState::new(self.maze.player_start, self.learning.pursuer_start)
    }

    /// Check every section and return the maze it describes.
    ///
    /// # Errors
    ///
    /// Maze construction errors, off-grid starts, empty action sets, and
    /// [`Error::InvalidConfiguration`] for out-of-range learning settings.
    pub fn validate(&self) -> Result<Maze> {
        let maze = self.maze.build_maze()?;
        maze.check_inside("player start", self.maze.player_start)?;
        maze.check_inside("pursuer start", self.maze.pursuer_start)?;
        maze.check_inside("learning pursuer start", self.learning.pursuer_start)?;

        if self.bellman.player_actions.is_empty() {
            return Err(Error::EmptyActionSet {
                role: crate::maze::Role::Player,
            });
        }
        if self.bellman.pursuer_actions.is_empty() {
            return Err(Error::EmptyActionSet {
                role: crate::maze::Role::Pursuer,
            });
        }

        let learning = &self.learning;
        if !(learning.discount > 0.0 && learning.discount < 1.0) {
            return Err(invalid(format!(
                "discount {} must lie strictly between 0 and 1",
                learning.discount
            )));
        }
        if !learning.q_init.is_finite() {
            return Err(invalid(format!("q_init {} must be finite", learning.q_init)));
        }
        if let Some(p) = learning.reset_probability {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(format!("reset probability {p} must lie in [0, 1]")));
            }
        }
        if learning.iterations == 0 {
            return Err(invalid("iterations must be positive".to_string()));
        }

        Ok(maze)
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfiguration { message }
}

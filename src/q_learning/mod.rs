//! Tabular Q-learning from simulated experience
//!
//! The player and the pursuer both wander uniformly at random while every
//! joint move updates exactly one entry of a dense [`QTable`]. The update is
//! off-policy: the target bootstraps from the best estimated action in the
//! next state, so the table tracks the optimal action values even though the
//! behaviour policy is random.
//!
//! The step size for an entry is `1 / n`, where `n` counts updates of that
//! entry, and the reward rule differs from the Bellman solver's terminal
//! bonus: `-10` when caught, `+1` on the goal, `0` otherwise.
//!
//! ## Usage Example
//!
//! ```no_run
//! use pursuit::maze::{Action, Maze, Position};
//! use pursuit::q_learning::QLearningSolver;
//! use pursuit::types::JointState;
//!
//! let maze = Maze::new(4, 4, Position::new(1, 1))?;
//! let start = JointState::new(Position::new(0, 0), Position::new(3, 3));
//! let mut solver = QLearningSolver::new(&maze, &Action::ALL, &Action::ALL, start, 0.8)?;
//! solver.run(10_000, Some(7))?;
//! println!("V(start) ~ {}", solver.initial_value());
//! # Ok::<(), pursuit::Error>(())
//! ```

pub mod learner;
pub mod q_table;
pub mod serialization;

pub use learner::{CAPTURE_REWARD, GOAL_STEP_REWARD, QLearningSolver, reward, step_size};
pub use q_table::{DEFAULT_Q_INIT, QEntry, QTable};
pub use serialization::SavedQTable;

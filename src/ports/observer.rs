//! Observer port - abstraction for watching a learning run
//!
//! Observers collect data during Q-learning without coupling the update loop
//! to any output format.

use crate::{Result, simulation::Transition};

/// Observer trait for monitoring Q-learning
///
/// # Event Sequence
///
/// 1. `on_learning_start(total_iterations)` - Once at the beginning
/// 2. For each iteration:
///    - `on_update(...)` - After the Q-table entry has been updated
///    - `on_episode_reset(...)` - Only when the pipeline restarts the
///      trajectory from the initial state
/// 3. `on_learning_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use pursuit::{ports::LearningObserver, simulation::Transition};
///
/// struct CaptureCounter {
///     captures: usize,
/// }
///
/// impl LearningObserver for CaptureCounter {
///     fn on_update(
///         &mut self,
///         _iteration: usize,
///         transition: &Transition,
///         _reward: f64,
///         _initial_value: f64,
///     ) -> pursuit::Result<()> {
///         if transition.after.is_capture() {
///             self.captures += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait LearningObserver: Send {
    /// Called once before the first update.
    fn on_learning_start(&mut self, _total_iterations: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every update.
    ///
    /// # Parameters
    ///
    /// * `iteration` - 1-based update counter
    /// * `transition` - The simulated joint move that was learned from
    /// * `reward` - Reward applied to the update
    /// * `initial_value` - Value estimate of the initial joint state after the
    ///   update, i.e. the newest value-history entry
    fn on_update(
        &mut self,
        _iteration: usize,
        _transition: &Transition,
        _reward: f64,
        _initial_value: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when the trajectory restarts from the initial joint state.
    fn on_episode_reset(&mut self, _iteration: usize) -> Result<()> {
        Ok(())
    }

    /// Called once after the last update.
    fn on_learning_end(&mut self) -> Result<()> {
        Ok(())
    }
}

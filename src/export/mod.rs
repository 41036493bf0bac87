//! CSV export of solver output for external plotting
//!
//! Two tables are supported: the Q-learning value history (one row per
//! update) and the Bellman decision sequence of a single joint state (one row
//! per remaining-horizon step).

mod value_csv;

pub use value_csv::{DecisionRecord, ValueHistoryExporter, ValueRecord};

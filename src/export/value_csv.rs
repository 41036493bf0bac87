//! CSV writers built on the `csv` crate

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, bellman::PolicyTable, maze::Action, types::JointState};

/// One value-history row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRecord {
    /// 1-based update counter
    pub iteration: usize,
    pub value: f64,
}

/// One row of a joint state's Bellman decision sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub remaining: usize,
    pub action: Action,
    pub value: f64,
}

/// Exporter for value histories and decision sequences
pub struct ValueHistoryExporter;

impl ValueHistoryExporter {
    /// Write `history` with a header row `iteration,value`.
    pub fn write_history<P: AsRef<Path>>(path: P, history: &[f64]) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for (i, &value) in history.iter().enumerate() {
            writer.serialize(ValueRecord {
                iteration: i + 1,
                value,
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn read_history<P: AsRef<Path>>(path: P) -> Result<Vec<ValueRecord>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();
        for record in reader.deserialize() {
            records.push(record?);
        }
        Ok(records)
    }

    /// Write the decision sequence of `state`, from the terminal layer up to
    /// the full horizon.
    pub fn write_decisions<P: AsRef<Path>>(
        path: P,
        policy: &PolicyTable,
        state: JointState,
    ) -> Result<usize> {
        let mut writer = csv::Writer::from_path(path)?;
        let decisions = policy.decisions(state);
        for (remaining, decision) in decisions.iter().enumerate() {
            writer.serialize(DecisionRecord {
                remaining,
                action: decision.action,
                value: decision.value,
            })?;
        }
        writer.flush()?;
        Ok(decisions.len())
    }
}

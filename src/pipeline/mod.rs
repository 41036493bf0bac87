//! Learning pipeline abstractions
//!
//! This module provides:
//! - [`LearningPipeline`], which feeds simulated experience to a Q-learning
//!   solver, optionally restarting episodes at random
//! - Observer adapters recording progress, metrics and JSONL traces

pub mod learning;
pub mod observers;

pub use learning::{LearningPipeline, LearningResult, PipelineConfig};
pub use observers::{JsonlObserver, MetricsObserver, ProgressObserver, UpdateObservation};

pub use crate::ports::LearningObserver;

//! Ports (trait boundaries) for external collaborators.
//!
//! Learning runs report their progress through [`LearningObserver`]; progress
//! bars, trace files and plotting front-ends are adapters implementing it.

pub mod observer;

pub use observer::LearningObserver;

//! CLI infrastructure for the pursuit toolkit
//!
//! This module provides the command-line interface for solving a maze with
//! backward induction, learning action values from simulation, and playing a
//! solved policy against a random pursuer.

pub mod commands;
pub mod output;

//! Output formatting, progress spinners and maze rendering for the CLI

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    maze::{Maze, Position},
    types::JointState,
};

/// Create a spinner for long-running solver sweeps
pub fn create_spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("invalid spinner template")?,
    );
    pb.set_message(message.to_string());
    Ok(pb)
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Render `state` as one text row per maze row.
///
/// `P` marks the player, `B` the pursuer and `O` a capture; every cell is
/// followed by a `|`.
pub fn render_state(maze: &Maze, state: JointState) -> String {
    let mut out = String::new();
    for y in 0..maze.height() {
        for x in 0..maze.length() {
            let here = Position::new(x, y);
            let cell = if state.is_capture() && state.player == here {
                'O'
            } else if state.player == here {
                'P'
            } else if state.pursuer == here {
                'B'
            } else {
                ' '
            };
            out.push(cell);
            out.push('|');
        }
        out.push('\n');
    }
    out
}

//! Subcommands of the `pursuit` binary

pub mod learn;
pub mod play;
pub mod solve;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::Args;

use crate::{
    config::{ExperimentConfig, MazePreset},
    maze::{Action, Position},
    types::JointState,
};

/// Options shared by every subcommand for choosing the experiment
#[derive(Args, Debug, Clone)]
pub struct ExperimentArgs {
    /// JSON experiment configuration; missing sections use the defaults
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Built-in maze layout (default or open4), ignored when --config is given
    #[arg(long, default_value = "default")]
    pub preset: String,
}

impl ExperimentArgs {
    pub fn load(&self) -> Result<ExperimentConfig> {
        match &self.config {
            Some(path) => ExperimentConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display())),
            None => {
                let preset: MazePreset = self.preset.parse()?;
                Ok(ExperimentConfig::preset(preset))
            }
        }
    }
}

/// Parse a joint state written as `xp,yp,xb,yb`.
pub(crate) fn parse_state(value: &str, flag: &str) -> Result<JointState> {
    let coords = value
        .split(',')
        .map(|token| token.trim().parse::<i32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| anyhow!("Invalid value '{value}' for {flag}: {e}"))?;
    match coords.as_slice() {
        &[xp, yp, xb, yb] => Ok(JointState::new(Position::new(xp, yp), Position::new(xb, yb))),
        _ => bail!("Invalid value '{value}' for {flag} (expected xp,yp,xb,yb)"),
    }
}

pub(crate) fn parse_actions(value: &str, flag: &str) -> Result<Vec<Action>> {
    let actions =
        Action::parse_list(value).with_context(|| format!("Invalid value '{value}' for {flag}"))?;
    if actions.is_empty() {
        bail!("{flag} needs at least one action");
    }
    Ok(actions)
}

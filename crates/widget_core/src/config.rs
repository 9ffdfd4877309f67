//! Widget configuration, TOML-loadable, everything defaulted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Color;

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

/// Rating the engine is limited to.
pub const DEFAULT_ELO_TARGET: u32 = 1614;
/// Mid-range skill level accompanying the rating cap.
pub const DEFAULT_SKILL_LEVEL: u8 = 8;
/// Per-move think budget in milliseconds.
pub const DEFAULT_THINK_TIME_MS: u64 = 1200;
/// Pause before handing a position to the engine. Presentation only.
pub const DEFAULT_SEARCH_DELAY_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Engine binary to spawn.
    pub engine_path: PathBuf,
    pub elo_target: u32,
    pub skill_level: u8,
    pub think_time_ms: u64,
    pub search_delay_ms: u64,
    /// Side the human plays.
    pub player_color: Color,
    /// Public profile the ratings panel reads from; panel hidden when unset.
    pub profile_user: Option<String>,
    /// Game id for the embedded viewer; embed hidden when unset.
    pub featured_game: Option<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            engine_path: PathBuf::from("stockfish"),
            elo_target: DEFAULT_ELO_TARGET,
            skill_level: DEFAULT_SKILL_LEVEL,
            think_time_ms: DEFAULT_THINK_TIME_MS,
            search_delay_ms: DEFAULT_SEARCH_DELAY_MS,
            player_color: Color::White,
            profile_user: None,
            featured_game: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl WidgetConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

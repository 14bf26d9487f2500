//! Session configuration
//!
//! Chosen once before a match starts; loaded from JSON or built from the
//! command line.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::RACE_DURATION_SECS;
use crate::sim::body::Bounds;

/// Starting lives offered by the menu
pub const LIVES_PRESETS: [u32; 4] = [3, 5, 7, 20];
pub const MAX_LIVES: u32 = 99;

/// Game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Mode {
    /// One human ship against the meteor field
    #[default]
    Original,
    /// Human and cpu clear the field together
    Cooperative,
    /// Most kills before the clock runs out
    Race,
    /// Ship against ship, no meteors
    Versus,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Original, Mode::Cooperative, Mode::Race, Mode::Versus];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Original => "Original",
            Mode::Cooperative => "Cooperative",
            Mode::Race => "Race",
            Mode::Versus => "Versus",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "original" => Ok(Mode::Original),
            "cooperative" | "coop" => Ok(Mode::Cooperative),
            "race" => Ok(Mode::Race),
            "versus" | "vs" => Ok(Mode::Versus),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }

    /// Whether a cpu ship joins the human
    pub fn has_second_ship(&self) -> bool {
        *self != Mode::Original
    }
}

/// Difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "med" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }

    /// Meteors seeded on the first field
    pub fn starting_meteors(&self) -> u32 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("Starting lives must be within 1..={max}, got {0}", max = MAX_LIVES)]
    LivesOutOfRange(u32),

    #[error("Play area must have positive size, got {width}x{height}")]
    EmptyBounds { width: f32, height: f32 },

    #[error("Race duration must be positive, got {0}")]
    RaceDuration(f32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Everything a match needs before it starts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub mode: Mode,
    pub difficulty: Difficulty,
    /// Spare lives per ship
    pub lives: u32,
    pub bounds: Bounds,
    pub race_duration_secs: f32,
    /// Seat one is flown by a cpu brain (demo mode)
    pub autopilot: bool,
    pub audio_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Original,
            difficulty: Difficulty::Medium,
            lives: LIVES_PRESETS[0],
            bounds: Bounds::default(),
            race_duration_secs: RACE_DURATION_SECS,
            autopilot: false,
            audio_enabled: true,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded session config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_LIVES).contains(&self.lives) {
            return Err(ConfigError::LivesOutOfRange(self.lives));
        }
        let Bounds { width, height, .. } = self.bounds;
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::EmptyBounds { width, height });
        }
        if self.mode == Mode::Race && !(self.race_duration_secs > 0.0) {
            return Err(ConfigError::RaceDuration(self.race_duration_secs));
        }
        Ok(())
    }
}

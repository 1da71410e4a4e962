//! Game settings and preferences
//!
//! Persisted separately from game saves as a JSON file. Every field has a
//! default, so a partial file only overrides what it names.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::Playfield;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub width: i32,
    pub height: i32,

    // === Loop ===
    /// Frames per second the session loop paces itself to
    pub target_fps: u32,
    /// Stop after this many frames (headless runs); `None` runs until quit
    pub max_frames: Option<u64>,

    // === Save ===
    /// Where the session save is written
    pub save_path: PathBuf,
    /// Save whenever the game is paused
    pub autosave_on_pause: bool,

    // === Gameplay ===
    /// RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
    /// Let the demo pilot fly the ship
    pub autopilot: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,

            target_fps: TICK_RATE as u32,
            max_frames: None,

            save_path: PathBuf::from("save.json"),
            autosave_on_pause: true,

            seed: None,
            autopilot: false,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    pub fn playfield(&self) -> Playfield {
        Playfield::new(self.width, self.height)
    }

    /// Reject values the game cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.width < PLAYER_SIZE.x.max(ASTEROID_SIZE.x) {
            return Err(SettingsError::Invalid(format!(
                "width {} is narrower than the ship",
                self.width
            )));
        }
        if self.height < PLAYER_SIZE.y + PLAYER_SPAWN_OFFSET + ASTEROID_SIZE.y {
            return Err(SettingsError::Invalid(format!("height {} is too short", self.height)));
        }
        if self.target_fps == 0 {
            return Err(SettingsError::Invalid("target_fps must be positive".to_string()));
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved");
        Ok(())
    }
}

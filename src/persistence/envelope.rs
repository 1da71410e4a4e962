//! Versioned save envelope
//!
//! A save is a JSON object `{ "version": N, "data": { ... } }`. The version is
//! checked before the payload is decoded, and the payload is decoded against
//! an explicit schema that rejects missing, mistyped or unknown fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::PersistError;
use crate::sim::{Player, Playfield};

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SavedAsteroid {
    pub x: i32,
    pub y: i32,
    pub speed: i32,
}

/// Position-only record (power-ups and bullets move at fixed speeds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SavedPoint {
    pub x: i32,
    pub y: i32,
}

/// Everything needed to resume a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveData {
    pub score: u32,
    pub high_score: u32,
    pub lives: u8,
    pub player_x: i32,
    pub player_y: i32,
    pub asteroids: Vec<SavedAsteroid>,
    pub powerups: Vec<SavedPoint>,
    pub bullets: Vec<SavedPoint>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SaveEnvelope<T> {
    version: u32,
    data: T,
}

/// Serialize a save to its JSON envelope
pub fn encode(data: &SaveData) -> Result<String, PersistError> {
    let envelope = SaveEnvelope {
        version: SAVE_VERSION,
        data,
    };
    serde_json::to_string_pretty(&envelope)
        .map_err(|e| PersistError::CorruptSaveFile(format!("cannot encode save: {e}")))
}

/// Parse and validate a JSON envelope
pub fn decode(json: &str) -> Result<SaveData, PersistError> {
    let envelope: SaveEnvelope<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| corrupt(format!("not a save envelope: {e}")))?;

    if envelope.version != SAVE_VERSION {
        return Err(corrupt(format!(
            "unsupported save version {} (expected {})",
            envelope.version, SAVE_VERSION
        )));
    }

    let data: SaveData = serde_json::from_value(envelope.data)
        .map_err(|e| corrupt(format!("bad save payload: {e}")))?;
    validate(&data)?;
    Ok(data)
}

/// Range checks serde cannot express
fn validate(data: &SaveData) -> Result<(), PersistError> {
    if data.lives == 0 || data.lives > START_LIVES {
        return Err(corrupt(format!(
            "lives {} outside 1..={}",
            data.lives, START_LIVES
        )));
    }

    let speeds = ASTEROID_MIN_SPEED..=ASTEROID_MAX_SPEED;
    if let Some(bad) = data.asteroids.iter().find(|a| !speeds.contains(&a.speed)) {
        return Err(corrupt(format!(
            "asteroid speed {} outside {}..={}",
            bad.speed, ASTEROID_MIN_SPEED, ASTEROID_MAX_SPEED
        )));
    }

    Ok(())
}

/// Check a decoded save against the playfield it is about to be loaded into.
///
/// The ship must sit inside the field on its fixed row.
pub fn check_fits(data: &SaveData, playfield: Playfield) -> Result<(), PersistError> {
    let max_x = playfield.width - PLAYER_SIZE.x;
    if !(0..=max_x).contains(&data.player_x) {
        return Err(corrupt(format!(
            "player x {} outside 0..={}",
            data.player_x, max_x
        )));
    }

    let row = Player::spawn_pos(playfield).y;
    if data.player_y != row {
        return Err(corrupt(format!(
            "player y {} is off the ship row {}",
            data.player_y, row
        )));
    }

    Ok(())
}

fn corrupt(reason: String) -> PersistError {
    PersistError::CorruptSaveFile(reason)
}

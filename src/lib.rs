//! Void Runner - A vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Fixed-tick simulation (entities, collisions, world state)
//! - `session`: Start/Playing/Paused/GameOver state machine and frame loop
//! - `platform`: Renderer/audio/input/clock abstraction plus headless backends
//! - `persistence`: Versioned save/load of a session in flight
//! - `settings`: Player-facing configuration

pub mod audio;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{PersistError, SettingsError};
pub use session::{Screen, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::IVec2;

    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u64 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default playfield dimensions
    pub const PLAYFIELD_WIDTH: i32 = 800;
    pub const PLAYFIELD_HEIGHT: i32 = 600;

    /// Player ship
    pub const PLAYER_SIZE: IVec2 = IVec2::new(60, 60);
    pub const PLAYER_SPEED: i32 = 5;
    /// Player spawns centred this far above the bottom edge
    pub const PLAYER_SPAWN_OFFSET: i32 = 50;
    pub const START_LIVES: u8 = 3;

    /// Bullets travel straight up
    pub const BULLET_SIZE: IVec2 = IVec2::new(10, 30);
    pub const BULLET_SPEED: i32 = 10;

    /// Asteroids fall at a speed picked once at spawn
    pub const ASTEROID_SIZE: IVec2 = IVec2::new(50, 50);
    pub const ASTEROID_MIN_SPEED: i32 = 1;
    pub const ASTEROID_MAX_SPEED: i32 = 5;
    /// Milliseconds between asteroid spawns
    pub const ASTEROID_INTERVAL_MS: u64 = 1000;
    /// Score awarded per destroyed asteroid
    pub const ASTEROID_REWARD: u32 = 10;

    /// Shield power-ups fall slower than asteroids
    pub const POWERUP_SIZE: IVec2 = IVec2::new(30, 30);
    pub const POWERUP_SPEED: i32 = 2;
    /// Milliseconds between power-up spawns
    pub const POWERUP_INTERVAL_MS: u64 = 5000;
    /// Shield lifetime after collection
    pub const SHIELD_DURATION_MS: u64 = 3000;
}

/// Convert a tick count to simulation milliseconds.
///
/// Computed from the whole count so the clock never drifts from rounding.
#[inline]
pub fn ticks_to_ms(ticks: u64) -> u64 {
    ticks * 1000 / consts::TICK_RATE
}

//! Fixed-tick simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform
//! concerns:
//! - Fixed timestep only, time measured by the tick counter
//! - Randomness only through `RandomSource`
//! - No rendering, audio or input polling

pub mod collision;
pub mod entities;
pub mod random;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use entities::{Asteroid, Body, Bullet, EntityKind, Player, Playfield, PowerUp, Sprite};
pub use random::{RandomSource, seeded};
pub use state::{GameEvent, HitOutcome, World};
pub use tick::{TickInput, tick};

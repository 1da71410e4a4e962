//! Platform abstraction layer
//!
//! The session talks to the outside world only through these traits:
//! - Drawing (`Renderer`)
//! - Sound cues (`AudioSink`)
//! - Keyboard and window events (`InputSource`)
//! - Time (`Clock`)
//!
//! `headless` provides log-backed implementations for running without a window.

pub mod headless;

use std::collections::HashSet;

use glam::IVec2;

use crate::audio::Cue;
use crate::sim::Sprite;

pub use headless::{LogAudio, LogRenderer, ManualClock, ScriptedInput, SystemClock};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Start, fire, continue
    Space,
    /// Pause toggle
    P,
    /// Load from the start screen
    L,
    /// Quit from the game-over screen
    Q,
}

/// A discrete input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    /// Window closed / quit signal
    Close,
}

/// RGB text color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const WHITE: Color = Color(255, 255, 255);
    pub const RED: Color = Color(255, 0, 0);
    pub const GREEN: Color = Color(0, 255, 0);
}

pub trait Renderer {
    fn draw_background(&mut self);
    fn draw_entity(&mut self, sprite: &Sprite);
    /// Draw `text` centred on `pos`
    fn draw_text(&mut self, text: &str, pos: IVec2, color: Color);
    fn present(&mut self);
}

pub trait AudioSink {
    /// Fire-and-forget
    fn play_cue(&mut self, cue: Cue, volume: f32);
}

pub trait InputSource {
    /// Keys currently held
    fn keys_down(&self) -> HashSet<Key>;
    /// Discrete events since the last poll, oldest first
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

pub trait Clock {
    /// Monotonic milliseconds
    fn now_ticks(&self) -> u64;
    /// Wait out the rest of a frame; a no-op for simulated clocks
    fn sleep_ms(&mut self, ms: u64);
}

//! Headless platform: logs instead of drawing and playing, scripted input

use std::collections::HashSet;
use std::ops::Range;
use std::time::{Duration, Instant};

use glam::IVec2;

use super::{AudioSink, Clock, Color, InputEvent, InputSource, Key, Renderer};
use crate::audio::Cue;
use crate::sim::{EntityKind, Sprite};

/// Renderer that keeps the last frame's text and logs it periodically
#[derive(Debug, Default)]
pub struct LogRenderer {
    /// Frames presented so far
    pub frames: u64,
    /// Log the HUD every this many frames (0 = never)
    pub log_every: u64,
    pending_text: Vec<String>,
    pending_sprites: Vec<Sprite>,
    /// Text lines of the last presented frame
    pub last_text: Vec<String>,
    /// Sprites of the last presented frame
    pub last_sprites: Vec<Sprite>,
}

impl LogRenderer {
    pub fn new(log_every: u64) -> Self {
        Self {
            log_every,
            ..Default::default()
        }
    }

    /// True if the last frame showed a line containing `needle`
    pub fn showed(&self, needle: &str) -> bool {
        self.last_text.iter().any(|t| t.contains(needle))
    }
}

impl Renderer for LogRenderer {
    fn draw_background(&mut self) {
        self.pending_text.clear();
        self.pending_sprites.clear();
    }

    fn draw_entity(&mut self, sprite: &Sprite) {
        self.pending_sprites.push(*sprite);
    }

    fn draw_text(&mut self, text: &str, _pos: IVec2, _color: Color) {
        self.pending_text.push(text.to_string());
    }

    fn present(&mut self) {
        self.frames += 1;
        self.last_text = std::mem::take(&mut self.pending_text);
        self.last_sprites = std::mem::take(&mut self.pending_sprites);

        if self.log_every > 0 && self.frames.is_multiple_of(self.log_every) {
            let rocks = self
                .last_sprites
                .iter()
                .filter(|s| s.kind == EntityKind::Asteroid)
                .count();
            log::info!(
                "frame {}: {} | {} asteroids on field",
                self.frames,
                self.last_text.join(" | "),
                rocks
            );
        }
    }
}

/// Audio sink that logs and remembers every cue
#[derive(Debug, Default)]
pub struct LogAudio {
    pub played: Vec<Cue>,
}

impl AudioSink for LogAudio {
    fn play_cue(&mut self, cue: Cue, volume: f32) {
        log::debug!("cue {:?} at volume {:.2}", cue, volume);
        self.played.push(cue);
    }
}

/// Input replayed from a frame-indexed script
///
/// Each `poll_events` call is one frame. Presses fire on their frame; holds
/// cover a half-open frame range.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frame: u64,
    events: Vec<(u64, InputEvent)>,
    holds: Vec<(Range<u64>, Key)>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press_at(mut self, frame: u64, key: Key) -> Self {
        self.events.push((frame, InputEvent::KeyDown(key)));
        self
    }

    pub fn close_at(mut self, frame: u64) -> Self {
        self.events.push((frame, InputEvent::Close));
        self
    }

    pub fn hold(mut self, key: Key, frames: Range<u64>) -> Self {
        self.holds.push((frames, key));
        self
    }

    /// Frames polled so far
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl InputSource for ScriptedInput {
    fn keys_down(&self) -> HashSet<Key> {
        // Holds are evaluated against the frame just polled
        let current = self.frame.saturating_sub(1);
        self.holds
            .iter()
            .filter(|(range, _)| range.contains(&current))
            .map(|(_, key)| *key)
            .collect()
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        let current = self.frame;
        self.frame += 1;
        self.events
            .iter()
            .filter(|(frame, _)| *frame == current)
            .map(|(_, event)| *event)
            .collect()
    }
}

/// Wall clock for real-time runs
#[derive(Debug)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ticks(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn sleep_ms(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

/// Simulated clock that only moves when slept on or advanced
#[derive(Debug, Default)]
pub struct ManualClock {
    pub now: u64,
}

impl ManualClock {
    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }
}

impl Clock for ManualClock {
    fn now_ticks(&self) -> u64 {
        self.now
    }

    fn sleep_ms(&mut self, ms: u64) {
        self.advance(ms);
    }
}

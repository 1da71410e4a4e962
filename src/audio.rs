//! Sound cue mixing
//!
//! The game never touches an audio device. It names a cue and the
//! `AudioManager` forwards it to whatever `AudioSink` the platform supplies,
//! applying volume and mute.

use crate::platform::AudioSink;
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Bullet fired
    Fire,
    /// Asteroid shot down
    Explosion,
    /// Shield picked up
    PowerUp,
}

impl Cue {
    /// Cue for a simulation event, if it makes a sound
    pub fn for_event(event: GameEvent) -> Option<Cue> {
        match event {
            GameEvent::BulletFired => Some(Cue::Fire),
            GameEvent::AsteroidDestroyed => Some(Cue::Explosion),
            GameEvent::PowerUpCollected => Some(Cue::PowerUp),
            _ => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Manager configured from the player's settings
    pub fn from_settings(sink: S, settings: &Settings) -> Self {
        let mut audio = Self::new(sink);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, cue: Cue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play_cue(cue, vol);
    }

    /// Play the cues for a tick's events
    pub fn play_events(&mut self, events: &[GameEvent]) {
        for cue in events.iter().copied().filter_map(Cue::for_event) {
            self.play(cue);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

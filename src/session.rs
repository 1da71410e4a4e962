//! Session state machine and frame loop
//!
//! One loop drives every screen. Each frame polls input, applies screen
//! transitions, runs fixed-step simulation ticks while playing, and renders.
//! The idle screens (start, paused, game over) only render, so the simulation
//! clock and every timer measured against it stand still.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::IVec2;
use rand_pcg::Pcg32;

use crate::audio::AudioManager;
use crate::consts::*;
use crate::error::PersistError;
use crate::persistence::{self, SaveStore};
use crate::platform::{AudioSink, Clock, Color, InputEvent, InputSource, Key, Renderer};
use crate::settings::Settings;
use crate::sim::{self, GameEvent, TickInput, World};

/// Fixed tick length in microseconds
const TICK_US: u64 = 1_000_000 / TICK_RATE;
/// Longest frame gap fed to the accumulator (ms)
const MAX_FRAME_MS: u64 = 100;

/// Which screen the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Playing,
    Paused,
    GameOver,
}

/// Whether the loop keeps going after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// A game session: one world, its screen, and the save slot
pub struct Session<S: SaveStore> {
    world: World,
    screen: Screen,
    rng: Pcg32,
    settings: Settings,
    store: S,
    /// Microseconds of frame time not yet consumed by ticks
    accumulator_us: u64,
    /// Fire presses waiting for the next tick
    pending_fire: u32,
}

impl<S: SaveStore> Session<S> {
    pub fn new(settings: Settings, store: S) -> Self {
        let seed = settings.seed.unwrap_or_else(clock_seed);
        log::info!("Session seed {}", seed);
        Self {
            world: World::new(settings.playfield()),
            screen: Screen::Start,
            rng: sim::seeded(seed),
            settings,
            store,
            accumulator_us: 0,
            pending_fire: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run frames until the player quits, the window closes or the frame
    /// budget runs out. Returns the number of frames run.
    pub fn run(
        &mut self,
        input: &mut impl InputSource,
        renderer: &mut impl Renderer,
        audio: &mut AudioManager<impl AudioSink>,
        clock: &mut impl Clock,
    ) -> u64 {
        let frame_ms = 1000 / u64::from(self.settings.target_fps.max(1));
        let mut last = clock.now_ticks();
        let mut frames = 0;

        log::info!("Session loop starting at {} fps", self.settings.target_fps);
        loop {
            let frame_start = clock.now_ticks();
            let dt_ms = frame_start.saturating_sub(last);
            last = frame_start;

            let control = self.frame(input, renderer, audio, dt_ms);
            frames += 1;
            if control == Control::Exit {
                break;
            }
            if self.settings.max_frames.is_some_and(|max| frames >= max) {
                log::info!("Frame budget of {} reached", frames);
                break;
            }

            let spent = clock.now_ticks().saturating_sub(frame_start);
            if spent < frame_ms {
                clock.sleep_ms(frame_ms - spent);
            }
        }

        log::info!(
            "Session ended after {} frames (score {}, high score {})",
            frames,
            self.world.score,
            self.world.high_score
        );
        frames
    }

    /// Process one frame that took `dt_ms` since the previous one
    pub fn frame(
        &mut self,
        input: &mut impl InputSource,
        renderer: &mut impl Renderer,
        audio: &mut AudioManager<impl AudioSink>,
        dt_ms: u64,
    ) -> Control {
        for event in input.poll_events() {
            if self.handle_event(event) == Control::Exit {
                return Control::Exit;
            }
        }

        if self.screen == Screen::Playing {
            self.accumulator_us += dt_ms.min(MAX_FRAME_MS) * 1000;
            self.run_ticks(&*input, audio);
        }

        self.render(renderer);
        Control::Continue
    }

    fn run_ticks(&mut self, input: &impl InputSource, audio: &mut AudioManager<impl AudioSink>) {
        let held = input.keys_down();
        let mut substeps = 0;
        while self.accumulator_us >= TICK_US && substeps < MAX_SUBSTEPS {
            let tick_input = TickInput {
                left: held.contains(&Key::Left),
                right: held.contains(&Key::Right),
                fire_presses: self.pending_fire,
                autopilot: self.settings.autopilot,
            };
            // One-shot inputs only apply to the first substep
            self.pending_fire = 0;

            let events = sim::tick(&mut self.world, &tick_input, &mut self.rng);
            self.accumulator_us -= TICK_US;
            substeps += 1;

            audio.play_events(&events);
            if events.contains(&GameEvent::SessionOver) {
                self.enter_game_over();
                return;
            }
        }

        if substeps == MAX_SUBSTEPS {
            // Too far behind to catch up; drop the backlog
            self.accumulator_us = 0;
        }
    }

    fn handle_event(&mut self, event: InputEvent) -> Control {
        let key = match event {
            InputEvent::Close => {
                log::info!("Quit signal received");
                return Control::Exit;
            }
            InputEvent::KeyDown(key) => key,
        };

        match (self.screen, key) {
            (Screen::Start, Key::Space) => {
                let now = self.world.now_ms();
                self.world.reset(now);
                self.enter_playing();
            }
            (Screen::Start, Key::L) => self.load(),
            (Screen::Playing, Key::Space) => self.pending_fire += 1,
            (Screen::Playing, Key::P) => self.pause(),
            (Screen::Paused, Key::P) => {
                log::info!("Resumed");
                self.enter_playing();
            }
            (Screen::GameOver, Key::Space) => {
                let now = self.world.now_ms();
                self.world.reset(now);
                log::info!("New game");
                self.enter_playing();
            }
            (Screen::GameOver, Key::Q) => {
                // Leave the next session ready to go, high score included
                let now = self.world.now_ms();
                self.world.reset(now);
                self.save();
                return Control::Exit;
            }
            _ => {}
        }
        Control::Continue
    }

    fn enter_playing(&mut self) {
        self.screen = Screen::Playing;
        self.accumulator_us = 0;
        self.pending_fire = 0;
    }

    fn pause(&mut self) {
        self.screen = Screen::Paused;
        self.accumulator_us = 0;
        self.pending_fire = 0;
        log::info!("Paused at {} ms", self.world.now_ms());
        if self.settings.autosave_on_pause {
            self.save();
        }
    }

    fn enter_game_over(&mut self) {
        self.world.finish_session();
        self.screen = Screen::GameOver;
        self.accumulator_us = 0;
        self.pending_fire = 0;
        log::info!(
            "Game over: score {}, high score {}",
            self.world.score,
            self.world.high_score
        );
    }

    fn load(&mut self) {
        match persistence::load_world(&mut self.world, &self.store) {
            Ok(()) => self.enter_playing(),
            Err(PersistError::MissingSaveFile) => log::warn!("No saved game found"),
            Err(e @ PersistError::CorruptSaveFile(_)) => {
                log::warn!("Ignoring unreadable save (file left as is): {e}");
            }
            Err(e) => log::warn!("Could not load save: {e}"),
        }
    }

    fn save(&mut self) {
        if let Err(e) = persistence::save_world(&self.world, &mut self.store) {
            log::error!("Failed to save game: {e}");
        }
    }

    fn render(&self, renderer: &mut impl Renderer) {
        let w = self.world.playfield.width;
        let h = self.world.playfield.height;
        renderer.draw_background();

        match self.screen {
            Screen::Start => {
                renderer.draw_text("VOID RUNNER", IVec2::new(w / 2, h / 4), Color::WHITE);
                renderer.draw_text("Press SPACE to start", IVec2::new(w / 2, h / 2), Color::WHITE);
                renderer.draw_text("Press L to load game", IVec2::new(w / 2, h * 2 / 3), Color::WHITE);
            }
            Screen::Playing => {
                for sprite in self.world.sprites() {
                    renderer.draw_entity(&sprite);
                }
                self.draw_hud(renderer);
            }
            Screen::Paused => {
                renderer.draw_text("PAUSED", IVec2::new(w / 2, h / 2), Color::WHITE);
            }
            Screen::GameOver => {
                renderer.draw_text("GAME OVER", IVec2::new(w / 2, h / 4), Color::RED);
                renderer.draw_text(
                    &format!("Score: {}", self.world.score),
                    IVec2::new(w / 2, h / 2),
                    Color::WHITE,
                );
                renderer.draw_text(
                    &format!("High Score: {}", self.world.high_score),
                    IVec2::new(w / 2, h * 10 / 17),
                    Color::WHITE,
                );
                renderer.draw_text(
                    "Press SPACE to play again",
                    IVec2::new(w / 2, h * 5 / 7),
                    Color::WHITE,
                );
                renderer.draw_text("Press Q to quit", IVec2::new(w / 2, h * 4 / 5), Color::WHITE);
            }
        }

        renderer.present();
    }

    fn draw_hud(&self, renderer: &mut impl Renderer) {
        let w = self.world.playfield.width;
        renderer.draw_text(
            &format!("Score: {}", self.world.score),
            IVec2::new(w / 2, 10),
            Color::WHITE,
        );
        renderer.draw_text(
            &format!("High Score: {}", self.world.high_score),
            IVec2::new(w / 2, 50),
            Color::WHITE,
        );
        let lives_color = if self.world.player.shield_active() {
            Color::GREEN
        } else {
            Color::WHITE
        };
        renderer.draw_text(
            &format!("Lives: {}", self.world.lives),
            IVec2::new(w - 100, 10),
            lives_color,
        );
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

//! Void Runner entry point
//!
//! Runs a headless demo session: the autopilot flies the ship, frames are
//! logged instead of drawn, and the session is paced in real time.
//!
//! Usage: `void-runner [settings.json]` (set `RUST_LOG=info` to watch).

use std::path::PathBuf;

use void_runner::Session;
use void_runner::audio::AudioManager;
use void_runner::persistence::FileStore;
use void_runner::platform::{Key, LogAudio, LogRenderer, ScriptedInput, SystemClock};
use void_runner::settings::Settings;

/// Frame budget for a demo run when the settings give none (one minute)
const DEMO_FRAMES: u64 = 60 * 60;

fn main() {
    env_logger::init();
    log::info!("Void Runner (headless) starting...");

    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let mut settings = Settings::load_or_default(settings_path.as_deref());

    // No keyboard here, so the demo pilot always flies
    settings.autopilot = true;
    if settings.max_frames.is_none() {
        settings.max_frames = Some(DEMO_FRAMES);
    }

    let store = FileStore::new(&settings.save_path);
    let mut audio = AudioManager::from_settings(LogAudio::default(), &settings);
    let mut renderer = LogRenderer::new(u64::from(settings.target_fps));
    let mut clock = SystemClock::new();
    // Resume a saved game if there is one, otherwise start fresh
    let mut input = ScriptedInput::new()
        .press_at(0, Key::L)
        .press_at(1, Key::Space);

    let mut session = Session::new(settings, store);
    session.run(&mut input, &mut renderer, &mut audio, &mut clock);

    log::info!(
        "Final score {} (high score {}), {} cues played",
        session.world().score,
        session.world().high_score,
        audio.sink().played.len()
    );
}

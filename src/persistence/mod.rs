//! Save/load of a session in flight
//!
//! Features:
//! - Versioned JSON envelope with schema validation
//! - Atomic file writes (tmp then rename)
//! - Missing or corrupt saves reported to the caller, world left untouched

pub mod envelope;
pub mod store;

pub use envelope::{SAVE_VERSION, SaveData, SavedAsteroid, SavedPoint, check_fits, decode, encode};
pub use store::{FileStore, MemoryStore, SaveStore};

use glam::IVec2;

use crate::error::PersistError;
use crate::sim::{Asteroid, Bullet, PowerUp, World};

/// Capture the persistent parts of a world.
///
/// Shield state and spawn timers are not saved.
pub fn snapshot(world: &World) -> SaveData {
    SaveData {
        score: world.score,
        high_score: world.high_score,
        lives: world.lives,
        player_x: world.player.pos.x,
        player_y: world.player.pos.y,
        asteroids: world
            .asteroids
            .iter()
            .map(|a| SavedAsteroid {
                x: a.pos.x,
                y: a.pos.y,
                speed: a.speed,
            })
            .collect(),
        powerups: world
            .powerups
            .iter()
            .map(|p| SavedPoint { x: p.pos.x, y: p.pos.y })
            .collect(),
        bullets: world
            .bullets
            .iter()
            .map(|b| SavedPoint { x: b.pos.x, y: b.pos.y })
            .collect(),
    }
}

/// Rebuild a world's session from a save already checked with `check_fits`.
///
/// Spawn timers restart at the world's current time so a resumed session does
/// not immediately spawn a backlog. The high score never goes down.
pub fn restore(world: &mut World, data: &SaveData) {
    let now = world.now_ms();
    world.reset(now);

    world.score = data.score;
    world.high_score = world.high_score.max(data.high_score);
    world.lives = data.lives;

    world.player.pos = IVec2::new(data.player_x, data.player_y);

    world.asteroids = data
        .asteroids
        .iter()
        .map(|a| Asteroid::new(IVec2::new(a.x, a.y), a.speed))
        .collect();
    world.powerups = data
        .powerups
        .iter()
        .map(|p| PowerUp::new(IVec2::new(p.x, p.y)))
        .collect();
    world.bullets = data
        .bullets
        .iter()
        .map(|b| Bullet::new(IVec2::new(b.x, b.y)))
        .collect();
}

/// Write the world's session to `store`
pub fn save_world(world: &World, store: &mut impl SaveStore) -> Result<(), PersistError> {
    let json = encode(&snapshot(world))?;
    store.write(&json)?;
    log::info!(
        "Game saved (score {}, lives {}, {} asteroids)",
        world.score,
        world.lives,
        world.asteroids.len()
    );
    Ok(())
}

/// Replace the world's session with the one in `store`.
///
/// On any error the world is left exactly as it was.
pub fn load_world(world: &mut World, store: &impl SaveStore) -> Result<(), PersistError> {
    let json = store.read()?;
    let data = decode(&json)?;
    check_fits(&data, world.playfield)?;
    restore(world, &data);
    log::info!("Game loaded (score {}, lives {})", world.score, world.lives);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::{GameEvent, Playfield, TickInput, tick};
    use proptest::prelude::*;

    fn sorted(mut data: SaveData) -> SaveData {
        data.asteroids.sort_by_key(|a| (a.x, a.y, a.speed));
        data.powerups.sort_by_key(|p| (p.x, p.y));
        data.bullets.sort_by_key(|b| (b.x, b.y));
        data
    }

    #[test]
    fn test_load_missing_leaves_world_unchanged() {
        let mut world = World::new(Playfield::default());
        world.score = 30;
        let before = world.clone();
        let err = load_world(&mut world, &MemoryStore::new()).unwrap_err();
        assert!(matches!(err, PersistError::MissingSaveFile));
        assert_eq!(world, before);
    }

    #[test]
    fn test_load_corrupt_leaves_world_unchanged() {
        let mut world = World::new(Playfield::default());
        let before = world.clone();
        let store = MemoryStore {
            contents: Some("{\"version\":1,\"data\":{\"score\":-5}}".to_string()),
        };
        let err = load_world(&mut world, &store).unwrap_err();
        assert!(matches!(err, PersistError::CorruptSaveFile(_)));
        assert_eq!(world, before);
    }

    #[test]
    fn test_restore_keeps_higher_high_score() {
        let mut world = World::new(Playfield::default());
        world.high_score = 900;
        let mut data = snapshot(&World::new(Playfield::default()));
        data.high_score = 100;
        restore(&mut world, &data);
        assert_eq!(world.high_score, 900);
    }

    #[test]
    fn test_restore_resets_timers_and_shield() {
        let mut world = World::new(Playfield::default());
        world.time_ticks = 600;
        world.player.collect_shield(9000);
        let data = snapshot(&World::new(Playfield::default()));
        restore(&mut world, &data);
        assert!(!world.player.shield_active());
        assert_eq!(world.last_asteroid_spawn, 10_000);
        assert_eq!(world.last_powerup_spawn, 10_000);
    }

    fn save_with(data: &SaveData) -> MemoryStore {
        MemoryStore {
            contents: Some(encode(data).unwrap()),
        }
    }

    #[test]
    fn test_load_rejects_ship_off_field() {
        let mut data = snapshot(&World::new(Playfield::default()));
        data.player_x = 5000;
        data.player_y = -9999;

        let mut world = World::new(Playfield::default());
        let before = world.clone();
        let err = load_world(&mut world, &save_with(&data)).unwrap_err();
        assert!(matches!(err, PersistError::CorruptSaveFile(_)));
        assert_eq!(world, before);
    }

    #[test]
    fn test_loaded_huge_score_survives_a_hit() {
        let mut data = snapshot(&World::new(Playfield::default()));
        data.score = 4_294_967_290;
        data.asteroids = vec![SavedAsteroid { x: 100, y: 100, speed: 1 }];
        data.bullets = vec![SavedPoint { x: 110, y: 120 }];

        let mut world = World::new(Playfield::default());
        load_world(&mut world, &save_with(&data)).unwrap();
        let mut rng = crate::sim::seeded(3);
        let events = tick(&mut world, &TickInput::default(), &mut rng);

        assert!(events.contains(&GameEvent::AsteroidDestroyed));
        assert_eq!(world.score, u32::MAX);
    }

    fn arb_save() -> impl Strategy<Value = SaveData> {
        let asteroid = (0..750i32, -600..600i32, ASTEROID_MIN_SPEED..=ASTEROID_MAX_SPEED)
            .prop_map(|(x, y, speed)| SavedAsteroid { x, y, speed });
        let point = || (0..790i32, -600..600i32).prop_map(|(x, y)| SavedPoint { x, y });
        (
            any::<u32>(),
            any::<u32>(),
            1..=START_LIVES,
            0..=(PLAYFIELD_WIDTH - PLAYER_SIZE.x),
            prop::collection::vec(asteroid, 0..20),
            prop::collection::vec(point(), 0..10),
            prop::collection::vec(point(), 0..10),
        )
            .prop_map(|(score, high_score, lives, player_x, asteroids, powerups, bullets)| SaveData {
                score,
                high_score,
                lives,
                player_x,
                player_y: PLAYFIELD_HEIGHT - 80,
                asteroids,
                powerups,
                bullets,
            })
    }

    proptest! {
        #[test]
        fn prop_save_load_restores_world(data in arb_save()) {
            let mut original = World::new(Playfield::default());
            restore(&mut original, &data);

            let mut store = MemoryStore::new();
            save_world(&original, &mut store).unwrap();

            let mut loaded = World::new(Playfield::default());
            load_world(&mut loaded, &store).unwrap();

            prop_assert_eq!(sorted(snapshot(&loaded)), sorted(snapshot(&original)));
            prop_assert_eq!(loaded.player.pos, original.player.pos);
        }
    }
}

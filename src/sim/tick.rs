//! Fixed timestep simulation tick
//!
//! Core game loop step that advances the world by exactly one tick.

use super::collision::{Rect, overlapping_indices};
use super::entities::Body;
use super::random::RandomSource;
use super::state::{GameEvent, HitOutcome, World};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steer left (held)
    pub left: bool,
    /// Steer right (held)
    pub right: bool,
    /// Fire key presses since the last tick; one bullet each
    pub fire_presses: u32,
    /// Demo mode - the sim flies the ship itself
    pub autopilot: bool,
}

/// Advance the world by one fixed timestep.
///
/// Returns the events of the tick in the order they happened. When the last
/// life is lost the tick stops there and the final event is `SessionOver`.
pub fn tick(world: &mut World, input: &TickInput, rng: &mut impl RandomSource) -> Vec<GameEvent> {
    let mut events = Vec::new();

    world.time_ticks += 1;
    let now = world.now_ms();

    let input = if input.autopilot {
        autopilot_input(world)
    } else {
        input.clone()
    };

    // Movement, then one bullet per discrete fire press
    let width = world.playfield.width;
    world.player.apply_input(input.left, input.right, width);
    for _ in 0..input.fire_presses {
        let origin = world.player.rect().top_center();
        world.spawn_bullet(origin.x, origin.y);
        events.push(GameEvent::BulletFired);
    }

    world.advance_all(1);

    if world.asteroid_due(now) {
        world.spawn_asteroid(now, rng);
    }
    if world.power_up_due(now) {
        world.spawn_power_up(now, rng);
    }

    // Player vs asteroids: every overlapping rock is destroyed, one hit counts
    let player_rect = world.player.rect();
    let before = world.asteroids.len();
    world.asteroids.retain(|a| !a.rect().overlaps(&player_rect));
    if world.asteroids.len() < before {
        match world.apply_player_hit() {
            HitOutcome::Absorbed => {
                log::debug!("Shield absorbed asteroid hit");
                events.push(GameEvent::ShieldAbsorbed);
            }
            HitOutcome::LostLife => {
                log::info!("Life lost, {} remaining", world.lives);
                world.player.respawn(world.playfield);
                events.push(GameEvent::LifeLost);
            }
            HitOutcome::SessionOver => {
                log::info!("Last life lost (score {})", world.score);
                events.push(GameEvent::SessionOver);
                return events;
            }
        }
    }

    // Bullets vs asteroids: a bullet takes out everything it overlaps
    let mut bullet_idx = 0;
    while bullet_idx < world.bullets.len() {
        let bullet_rect = world.bullets[bullet_idx].rect();
        let rock_rects: Vec<Rect> = world.asteroids.iter().map(|a| a.rect()).collect();
        let hits = overlapping_indices(&bullet_rect, &rock_rects);
        if hits.is_empty() {
            bullet_idx += 1;
            continue;
        }
        for &idx in hits.iter().rev() {
            world.record_hit(idx);
            events.push(GameEvent::AsteroidDestroyed);
        }
        world.bullets.remove(bullet_idx);
    }

    // Player vs power-ups: collecting (re)starts the shield timer
    let player_rect = world.player.rect();
    let before = world.powerups.len();
    world.powerups.retain(|p| !p.rect().overlaps(&player_rect));
    let collected = before - world.powerups.len();
    if collected > 0 {
        world.player.collect_shield(now);
        for _ in 0..collected {
            events.push(GameEvent::PowerUpCollected);
        }
        log::debug!("Shield raised at {} ms", now);
    }

    if world.player.shield_expired(now) {
        world.player.clear_shield();
        events.push(GameEvent::ShieldExpired);
        log::debug!("Shield expired at {} ms", now);
    }

    events
}

/// Demo pilot: chase a power-up when nothing threatens, otherwise dodge the
/// closest falling rock and shoot whatever is lined up overhead.
fn autopilot_input(world: &World) -> TickInput {
    let ship = world.player.rect();
    let ship_x = ship.center().x;

    // Rocks that are on screen and overlap the ship's column
    let threat = world
        .asteroids
        .iter()
        .map(|a| a.rect())
        .filter(|r| r.bottom() > 0 && r.right() > ship.left() && r.left() < ship.right())
        .max_by_key(|r| r.bottom());

    let target_x = match threat {
        // Close rock overhead: step out from under it toward the roomier side
        Some(rock) if ship.top() - rock.bottom() < 150 => {
            let room_left = rock.left();
            let room_right = world.playfield.width - rock.right();
            if room_left > room_right {
                rock.left() - PLAYER_SIZE.x
            } else {
                rock.right() + PLAYER_SIZE.x
            }
        }
        _ => world
            .powerups
            .iter()
            .filter(|p| p.pos.y > 0)
            .max_by_key(|p| p.pos.y)
            .map(|p| p.rect().center().x)
            .unwrap_or(ship_x),
    };

    // Shoot at anything lined up, a few times a second
    let lined_up = threat.is_some();
    let fire_presses = if lined_up && world.time_ticks.is_multiple_of(12) {
        1
    } else {
        0
    };

    TickInput {
        left: target_x < ship_x - PLAYER_SPEED,
        right: target_x > ship_x + PLAYER_SPEED,
        fire_presses,
        autopilot: true,
    }
}

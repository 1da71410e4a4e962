//! World state and core simulation types
//!
//! Everything a running session owns lives in one `World` value, passed by
//! reference to the tick and the session loop.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::entities::{
    Asteroid, Body, Bullet, EntityKind, Player, Playfield, PowerUp, Sprite, advance_and_prune,
};
use super::random::RandomSource;
use crate::consts::*;
use crate::ticks_to_ms;

/// Result of the player being struck by an asteroid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// The shield took the hit and is now down
    Absorbed,
    /// A life was lost, at least one remains
    LostLife,
    /// The last life was lost
    SessionOver,
}

/// Something noteworthy that happened during a tick (drives audio and logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    BulletFired,
    AsteroidDestroyed,
    PowerUpCollected,
    ShieldAbsorbed,
    ShieldExpired,
    LifeLost,
    SessionOver,
}

/// Complete state of a session
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub playfield: Playfield,
    pub player: Player,
    pub asteroids: Vec<Asteroid>,
    pub powerups: Vec<PowerUp>,
    pub bullets: Vec<Bullet>,
    pub score: u32,
    /// Best score across sessions; only ever raised
    pub high_score: u32,
    pub lives: u8,
    /// Simulation time of the last asteroid spawn (ms)
    pub last_asteroid_spawn: u64,
    /// Simulation time of the last power-up spawn (ms)
    pub last_powerup_spawn: u64,
    /// Simulation tick counter; only advances while playing
    pub time_ticks: u64,
}

impl World {
    /// Fresh world with the clock and spawn timers at zero
    pub fn new(playfield: Playfield) -> Self {
        Self {
            playfield,
            player: Player::new(playfield),
            asteroids: Vec::new(),
            powerups: Vec::new(),
            bullets: Vec::new(),
            score: 0,
            high_score: 0,
            lives: START_LIVES,
            last_asteroid_spawn: 0,
            last_powerup_spawn: 0,
            time_ticks: 0,
        }
    }

    /// Current simulation time in milliseconds
    pub fn now_ms(&self) -> u64 {
        ticks_to_ms(self.time_ticks)
    }

    /// Spawn an asteroid above the visible area and restart its timer
    pub fn spawn_asteroid(&mut self, now: u64, rng: &mut impl RandomSource) {
        let x = rng.uniform_int(0, self.playfield.width - ASTEROID_SIZE.x);
        let y = rng.uniform_int(-self.playfield.height, -ASTEROID_SIZE.y);
        let speed = rng.uniform_int(ASTEROID_MIN_SPEED, ASTEROID_MAX_SPEED);
        self.asteroids.push(Asteroid::new(IVec2::new(x, y), speed));
        self.last_asteroid_spawn = now;
        log::debug!("Asteroid spawned at ({}, {}) speed {}", x, y, speed);
    }

    /// Spawn a shield power-up above the visible area and restart its timer
    pub fn spawn_power_up(&mut self, now: u64, rng: &mut impl RandomSource) {
        let x = rng.uniform_int(0, self.playfield.width - POWERUP_SIZE.x);
        let y = rng.uniform_int(-self.playfield.height, -POWERUP_SIZE.y);
        self.powerups.push(PowerUp::new(IVec2::new(x, y)));
        self.last_powerup_spawn = now;
        log::debug!("Power-up spawned at ({}, {})", x, y);
    }

    /// Fire a bullet whose base is centred on the given origin
    pub fn spawn_bullet(&mut self, origin_x: i32, origin_y: i32) {
        self.bullets.push(Bullet::fired_from(IVec2::new(origin_x, origin_y)));
    }

    pub fn asteroid_due(&self, now: u64) -> bool {
        now.saturating_sub(self.last_asteroid_spawn) >= ASTEROID_INTERVAL_MS
    }

    pub fn power_up_due(&self, now: u64) -> bool {
        now.saturating_sub(self.last_powerup_spawn) >= POWERUP_INTERVAL_MS
    }

    /// Move every non-player entity, then prune whatever left the playfield
    pub fn advance_all(&mut self, delta_ticks: u32) {
        let h = self.playfield.height;
        advance_and_prune(&mut self.bullets, delta_ticks, h);
        advance_and_prune(&mut self.asteroids, delta_ticks, h);
        advance_and_prune(&mut self.powerups, delta_ticks, h);
    }

    /// Start a new session: empty field, fresh ship, full lives.
    ///
    /// The high score carries over.
    pub fn reset(&mut self, now: u64) {
        self.asteroids.clear();
        self.powerups.clear();
        self.bullets.clear();
        self.player = Player::new(self.playfield);
        self.score = 0;
        self.lives = START_LIVES;
        self.last_asteroid_spawn = now;
        self.last_powerup_spawn = now;
    }

    /// A bullet destroyed the asteroid at `index`
    pub fn record_hit(&mut self, index: usize) {
        self.asteroids.remove(index);
        self.score = self.score.saturating_add(ASTEROID_REWARD);
    }

    /// The player was struck by one or more asteroids this tick
    pub fn apply_player_hit(&mut self) -> HitOutcome {
        if self.player.shield_active() {
            self.player.clear_shield();
            return HitOutcome::Absorbed;
        }

        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            HitOutcome::SessionOver
        } else {
            HitOutcome::LostLife
        }
    }

    /// Close out a session that just ended, folding its score into the high score
    pub fn finish_session(&mut self) {
        if self.score > self.high_score {
            log::info!("New high score: {} (was {})", self.score, self.high_score);
        }
        self.high_score = self.high_score.max(self.score);
    }

    /// Draw list: falling bodies and bullets first, ship on top
    pub fn sprites(&self) -> Vec<Sprite> {
        let mut sprites = Vec::with_capacity(
            self.asteroids.len() + self.powerups.len() + self.bullets.len() + 1,
        );
        sprites.extend(self.asteroids.iter().map(|a| sprite_of(a, EntityKind::Asteroid)));
        sprites.extend(self.powerups.iter().map(|p| sprite_of(p, EntityKind::PowerUp)));
        sprites.extend(self.bullets.iter().map(|b| sprite_of(b, EntityKind::Bullet)));
        sprites.push(self.player.sprite());
        sprites
    }
}

fn sprite_of(body: &impl Body, kind: EntityKind) -> Sprite {
    Sprite {
        kind,
        rect: body.rect(),
        shielded: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::tests::FixedRandom;

    #[test]
    fn test_new_world() {
        let world = World::new(Playfield::default());
        assert_eq!(world.lives, 3);
        assert_eq!(world.score, 0);
        assert!(world.asteroids.is_empty());
        assert_eq!(world.now_ms(), 0);
    }

    #[test]
    fn test_spawn_asteroid_uses_rng_draws() {
        let mut world = World::new(Playfield::default());
        let mut rng = FixedRandom::new(vec![120, -300, 4]);
        world.spawn_asteroid(1000, &mut rng);
        assert_eq!(world.asteroids, vec![Asteroid::new(IVec2::new(120, -300), 4)]);
        assert_eq!(world.last_asteroid_spawn, 1000);
        assert_eq!(
            rng.ranges,
            vec![(0, 750), (-600, -50), (ASTEROID_MIN_SPEED, ASTEROID_MAX_SPEED)]
        );
    }

    #[test]
    fn test_spawn_power_up_fixed_speed() {
        let mut world = World::new(Playfield::default());
        let mut rng = FixedRandom::new(vec![10, -40]);
        world.spawn_power_up(5000, &mut rng);
        assert_eq!(world.powerups.len(), 1);
        assert_eq!(world.powerups[0].speed, POWERUP_SPEED);
        assert_eq!(world.last_powerup_spawn, 5000);
        assert_eq!(rng.ranges, vec![(0, 770), (-600, -30)]);
    }

    #[test]
    fn test_spawn_timers() {
        let world = World::new(Playfield::default());
        assert!(!world.asteroid_due(999));
        assert!(world.asteroid_due(1000));
        assert!(!world.power_up_due(4999));
        assert!(world.power_up_due(5000));
    }

    #[test]
    fn test_record_hit_awards_score() {
        let mut world = World::new(Playfield::default());
        world.asteroids.push(Asteroid::new(IVec2::new(0, 0), 1));
        world.asteroids.push(Asteroid::new(IVec2::new(100, 0), 2));
        world.record_hit(0);
        assert_eq!(world.score, 10);
        assert_eq!(world.asteroids, vec![Asteroid::new(IVec2::new(100, 0), 2)]);
    }

    #[test]
    fn test_score_saturates() {
        let mut world = World::new(Playfield::default());
        world.score = u32::MAX - 5;
        world.asteroids.push(Asteroid::new(IVec2::new(0, 0), 1));
        world.record_hit(0);
        assert_eq!(world.score, u32::MAX);
    }

    #[test]
    fn test_player_hit_outcomes() {
        let mut world = World::new(Playfield::default());
        world.player.collect_shield(0);
        assert_eq!(world.apply_player_hit(), HitOutcome::Absorbed);
        assert_eq!(world.lives, 3);
        assert!(!world.player.shield_active());

        assert_eq!(world.apply_player_hit(), HitOutcome::LostLife);
        assert_eq!(world.apply_player_hit(), HitOutcome::LostLife);
        assert_eq!(world.apply_player_hit(), HitOutcome::SessionOver);
        assert_eq!(world.lives, 0);
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let mut world = World::new(Playfield::default());
        world.score = 150;
        world.lives = 0;
        world.bullets.push(Bullet::new(IVec2::new(1, 1)));
        world.finish_session();
        world.reset(7000);

        assert_eq!(world.high_score, 150);
        assert_eq!(world.score, 0);
        assert_eq!(world.lives, START_LIVES);
        assert!(world.bullets.is_empty());
        assert_eq!(world.last_asteroid_spawn, 7000);
        assert_eq!(world.last_powerup_spawn, 7000);
    }

    #[test]
    fn test_finish_session_never_lowers_high_score() {
        let mut world = World::new(Playfield::default());
        world.high_score = 500;
        world.score = 120;
        world.finish_session();
        assert_eq!(world.high_score, 500);
    }

    #[test]
    fn test_sprites_player_last() {
        let mut world = World::new(Playfield::default());
        world.asteroids.push(Asteroid::new(IVec2::new(0, 0), 1));
        world.player.collect_shield(0);
        let sprites = world.sprites();
        assert_eq!(sprites.len(), 2);
        assert_eq!(sprites[0].kind, EntityKind::Asteroid);
        assert!(sprites[1].shielded);
    }
}

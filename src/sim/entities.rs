//! Entity types and their per-tick motion rules
//!
//! Nothing here rotates, accelerates or deflects: every body moves in a
//! straight vertical line at a speed fixed when it was created. The player is
//! the exception and moves only in response to input.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// Playfield bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: i32,
    pub height: i32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        }
    }
}

impl Playfield {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Capabilities shared by every entity
pub trait Body {
    /// Collision rectangle at the current position
    fn rect(&self) -> Rect;

    /// Move by `delta_ticks` ticks worth of motion
    fn advance(&mut self, delta_ticks: u32);

    /// True once the entity has left the playfield
    fn is_expired(&self, bounds_h: i32) -> bool;
}

/// The closed set of entity variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Bullet,
    Asteroid,
    PowerUp,
}

/// What the renderer needs to draw one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub kind: EntityKind,
    pub rect: Rect,
    /// Player only: draw the shielded ship
    pub shielded: bool,
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub pos: IVec2,
    pub speed: i32,
    /// Simulation time (ms) the current shield was picked up; `None` when unshielded
    shield_started: Option<u64>,
}

impl Player {
    /// Create a player at its spawn point
    pub fn new(playfield: Playfield) -> Self {
        Self {
            pos: Self::spawn_pos(playfield),
            speed: PLAYER_SPEED,
            shield_started: None,
        }
    }

    /// Top-left position that centres the ship on (W/2, H - 50)
    pub fn spawn_pos(playfield: Playfield) -> IVec2 {
        IVec2::new(playfield.width / 2, playfield.height - PLAYER_SPAWN_OFFSET) - PLAYER_SIZE / 2
    }

    /// Put the ship back on its spawn point (after losing a life)
    pub fn respawn(&mut self, playfield: Playfield) {
        self.pos = Self::spawn_pos(playfield);
    }

    /// Steer horizontally, keeping the ship inside [0, width]
    ///
    /// Left takes priority when both directions are held.
    pub fn apply_input(&mut self, left: bool, right: bool, width: i32) {
        if left {
            self.pos.x -= self.speed;
        } else if right {
            self.pos.x += self.speed;
        }
        self.pos.x = self.pos.x.clamp(0, (width - PLAYER_SIZE.x).max(0));
    }

    pub fn shield_active(&self) -> bool {
        self.shield_started.is_some()
    }

    pub fn shield_started(&self) -> Option<u64> {
        self.shield_started
    }

    /// Raise the shield, restarting its timer if it is already up
    pub fn collect_shield(&mut self, now: u64) {
        self.shield_started = Some(now);
    }

    pub fn clear_shield(&mut self) {
        self.shield_started = None;
    }

    /// True when a shield is up and has run its full duration
    pub fn shield_expired(&self, now: u64) -> bool {
        self.shield_started
            .is_some_and(|start| now.saturating_sub(start) >= SHIELD_DURATION_MS)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, PLAYER_SIZE)
    }

    pub fn sprite(&self) -> Sprite {
        Sprite {
            kind: EntityKind::Player,
            rect: self.rect(),
            shielded: self.shield_active(),
        }
    }
}

/// A shot fired upward from the ship
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bullet {
    pub pos: IVec2,
    pub speed: i32,
}

impl Bullet {
    pub fn new(pos: IVec2) -> Self {
        Self {
            pos,
            speed: BULLET_SPEED,
        }
    }

    /// Bullet centred horizontally on `origin` with its base resting on it
    pub fn fired_from(origin: IVec2) -> Self {
        Self::new(IVec2::new(origin.x - BULLET_SIZE.x / 2, origin.y - BULLET_SIZE.y))
    }
}

impl Body for Bullet {
    fn rect(&self) -> Rect {
        Rect::new(self.pos, BULLET_SIZE)
    }

    fn advance(&mut self, delta_ticks: u32) {
        self.pos.y -= self.speed * delta_ticks as i32;
    }

    fn is_expired(&self, _bounds_h: i32) -> bool {
        self.pos.y < 0
    }
}

/// A falling rock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asteroid {
    pub pos: IVec2,
    pub speed: i32,
}

impl Asteroid {
    pub fn new(pos: IVec2, speed: i32) -> Self {
        Self { pos, speed }
    }
}

impl Body for Asteroid {
    fn rect(&self) -> Rect {
        Rect::new(self.pos, ASTEROID_SIZE)
    }

    fn advance(&mut self, delta_ticks: u32) {
        self.pos.y += self.speed * delta_ticks as i32;
    }

    fn is_expired(&self, bounds_h: i32) -> bool {
        self.pos.y > bounds_h
    }
}

/// A falling shield pickup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerUp {
    pub pos: IVec2,
    pub speed: i32,
}

impl PowerUp {
    pub fn new(pos: IVec2) -> Self {
        Self {
            pos,
            speed: POWERUP_SPEED,
        }
    }
}

impl Body for PowerUp {
    fn rect(&self) -> Rect {
        Rect::new(self.pos, POWERUP_SIZE)
    }

    fn advance(&mut self, delta_ticks: u32) {
        self.pos.y += self.speed * delta_ticks as i32;
    }

    fn is_expired(&self, bounds_h: i32) -> bool {
        self.pos.y > bounds_h
    }
}

/// Advance every body in `bodies`, then drop the ones that left the playfield
pub fn advance_and_prune<T: Body>(bodies: &mut Vec<T>, delta_ticks: u32, bounds_h: i32) {
    for body in bodies.iter_mut() {
        body.advance(delta_ticks);
    }
    bodies.retain(|body| !body.is_expired(bounds_h));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_player_spawns_centred() {
        let field = Playfield::default();
        let player = Player::new(field);
        assert_eq!(player.rect().center(), IVec2::new(400, 550));
        assert!(!player.shield_active());
    }

    #[test]
    fn test_left_wins_over_right() {
        let field = Playfield::default();
        let mut player = Player::new(field);
        let x = player.pos.x;
        player.apply_input(true, true, field.width);
        assert_eq!(player.pos.x, x - PLAYER_SPEED);
    }

    #[test]
    fn test_clamp_at_edges() {
        let field = Playfield::default();
        let mut player = Player::new(field);
        player.pos.x = 2;
        player.apply_input(true, false, field.width);
        assert_eq!(player.pos.x, 0);

        player.pos.x = field.width - PLAYER_SIZE.x - 1;
        player.apply_input(false, true, field.width);
        assert_eq!(player.rect().right(), field.width);
    }

    #[test]
    fn test_bullet_fired_from_top_center() {
        let bullet = Bullet::fired_from(IVec2::new(430, 520));
        let rect = bullet.rect();
        assert_eq!(rect.top_center().x, 430);
        assert_eq!(rect.bottom(), 520);
    }

    #[test]
    fn test_bullet_expires_above_top() {
        let mut bullet = Bullet::new(IVec2::new(100, 5));
        assert!(!bullet.is_expired(600));
        bullet.advance(1);
        assert!(bullet.is_expired(600));
    }

    #[test]
    fn test_falling_bodies_expire_below_bottom() {
        let mut asteroid = Asteroid::new(IVec2::new(0, 598), 3);
        let mut powerup = PowerUp::new(IVec2::new(0, 599));
        assert!(!asteroid.is_expired(600));
        asteroid.advance(1);
        powerup.advance(1);
        assert!(asteroid.is_expired(600));
        assert!(powerup.is_expired(600));
    }

    #[test]
    fn test_advance_scales_with_ticks() {
        let mut asteroid = Asteroid::new(IVec2::new(0, -100), 4);
        asteroid.advance(5);
        assert_eq!(asteroid.pos.y, -80);
    }

    #[test]
    fn test_advance_and_prune() {
        let mut asteroids = vec![
            Asteroid::new(IVec2::new(0, 599), 5),
            Asteroid::new(IVec2::new(0, 0), 5),
        ];
        advance_and_prune(&mut asteroids, 1, 600);
        assert_eq!(asteroids.len(), 1);
        assert_eq!(asteroids[0].pos.y, 5);
    }

    #[test]
    fn test_shield_refresh_restarts_timer() {
        let mut player = Player::new(Playfield::default());
        player.collect_shield(1000);
        player.collect_shield(2500);
        assert!(!player.shield_expired(5000));
        assert!(player.shield_expired(5500));
    }

    proptest! {
        #[test]
        fn prop_player_stays_inside_playfield(moves in prop::collection::vec((any::<bool>(), any::<bool>()), 0..400)) {
            let field = Playfield::default();
            let mut player = Player::new(field);
            for (left, right) in moves {
                player.apply_input(left, right, field.width);
                let rect = player.rect();
                prop_assert!(rect.left() >= 0);
                prop_assert!(rect.right() <= field.width);
            }
        }
    }
}

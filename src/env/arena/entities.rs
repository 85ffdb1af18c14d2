//! Arena entity records and their movement logic
//!
//! Plain data with small behavior methods: the player, pursuing enemies,
//! player bullets, floor power-ups, and the confetti particles used by the
//! win celebration. Owners (the engine and the wrapper) drive all mutation.

use crate::utils::math::normalized;

use super::types::PowerUpKind;

/// The player character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
    /// Remaining hit points; `<= 0` ends the episode
    pub hp: i32,
    /// Collision radius
    pub radius: f32,
    /// Current movement speed per tick (mutable under the speed boost)
    pub speed: f32,
    /// Damage dealt per bullet hit (mutable under the damage boost)
    pub damage: f32,
}

/// A pursuing enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
    /// Remaining hit points; fractional because bullet damage scales with
    /// the player's damage multiplier
    pub hp: f32,
    /// Collision radius
    pub radius: f32,
    /// Cleared exactly once, when hit points reach zero
    pub alive: bool,
    /// Whether the kill has been counted toward episode metrics
    pub counted: bool,
}

impl Enemy {
    /// Create a live enemy at a position
    pub fn new(x: f32, y: f32, hp: f32, radius: f32) -> Self {
        Self { x, y, hp, radius, alive: true, counted: false }
    }

    /// Take one fixed-speed pursuit step toward the player
    pub fn step_toward(&mut self, px: f32, py: f32, speed: f32) {
        let (dx, dy) = normalized(px - self.x, py - self.y);
        self.x += dx * speed;
        self.y += dy * speed;
    }
}

/// Who fired a bullet
///
/// Enemies do not fire in this design; the tag exists so collision code is
/// explicit about whose bullets damage whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletOwner {
    /// Fired by the player
    Player,
}

/// A bullet in flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
    /// X velocity per tick
    pub vx: f32,
    /// Y velocity per tick
    pub vy: f32,
    /// Collision radius
    pub radius: f32,
    /// Who fired it
    pub owner: BulletOwner,
    /// Cleared on expiry, leaving the arena, or hitting an enemy
    pub alive: bool,
}

impl Bullet {
    /// Create a live player bullet
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, radius: f32) -> Self {
        Self { x, y, vx, vy, radius, owner: BulletOwner::Player, alive: true }
    }

    /// Integrate position by velocity, expiring outside the arena bounds
    pub fn step(&mut self, width: f32, height: f32) {
        self.x += self.vx;
        self.y += self.vy;
        if self.x < 0.0 || self.x > width || self.y < 0.0 || self.y > height {
            self.alive = false;
        }
    }
}

/// A power-up on the arena floor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUp {
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
    /// Which boost it grants
    pub kind: PowerUpKind,
    /// Remaining ticks before it despawns
    pub ttl: u32,
}

/// A confetti particle for the win celebration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Confetti {
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
    /// X velocity per tick
    pub vx: f32,
    /// Y velocity per tick (gravity pulls this positive)
    pub vy: f32,
    /// RGB color
    pub color: [u8; 3],
    /// Remaining ticks to live
    pub life: u32,
}

impl Confetti {
    /// Advance one tick: integrate position, apply gravity, age out
    pub fn step(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += 0.2;
        self.life = self.life.saturating_sub(1);
    }
}

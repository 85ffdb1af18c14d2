//! Top-down arena shooter environment
//!
//! A bounded rectangular room, a player that moves and shoots, enemies that
//! home in on the player, and rooms that unlock as each enemy batch dies.
//! - Discrete 9-way action space: idle, 4 moves, 4 diagonal move-and-shoots
//! - Power-ups grant temporary speed/damage boosts
//! - Rewards: kills and exploration earn, damage and idling cost, persona
//!   profiles select which bonus terms apply
//! - Episode ends on player death or a fixed step budget

// Re-export main components
pub use config::{ArenaConfig, EnvConfig, RewardConfig};
pub use entities::{Bullet, BulletOwner, Confetti, Enemy, Player, PowerUp};
pub use environment::ArenaEnv;
pub use game::ArenaGame;
pub use metrics::EpisodeMetrics;
pub use types::{
    Action, BulletSnapshot, EnemySnapshot, GameView, Persona, PlayerSnapshot, PowerUpKind,
    Snapshot,
};

// Submodules
mod config;
mod entities;
mod environment;
mod game;
mod metrics;
pub mod render;
mod types;

/// Create an arena environment with the default configuration and persona
pub fn make_arena_env(persona: Persona) -> ArenaEnv {
    ArenaEnv::new(EnvConfig::default().persona(persona))
}

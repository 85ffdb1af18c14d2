//! # Gauntlet
//!
//! A deterministic, seedable top-down arena shooter used as a reinforcement
//! learning training ground: a player moves and shoots in a bounded room,
//! enemies home in on the player, and an agent is rewarded for surviving,
//! killing, exploring rooms, and collecting power-ups.
//!
//! The crate exposes the standard RL interface (reset/step with observation
//! vectors, rewards, and done flags); training, model inference, and
//! windowing are external collaborators that consume it.
//!
//! ## Quick Start
//!
//! ```rust
//! use gauntlet_rl::prelude::*;
//!
//! let mut env = ArenaEnv::new(EnvConfig::default());
//! let obs = env.reset(Some(42)).unwrap();
//! assert_eq!(obs.len(), 20);
//!
//! let result = env.step(0).unwrap();
//! assert!(!result.truncated);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Environment traits and implementations
pub mod env;

/// Utility functions and helpers
pub mod utils;

/// Prelude module for convenient imports
///
/// This module re-exports commonly used types and traits for convenience.
pub mod prelude {
    pub use crate::env::arena::{
        Action, ArenaConfig, ArenaEnv, ArenaGame, EnvConfig, EpisodeMetrics, Persona,
        RewardConfig,
    };
    pub use crate::env::{Environment, SpaceInfo, SpaceType, StepInfo, StepResult};
}

/// Current version of gauntlet-rl
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}

//! Arena configuration and tunable constants
//!
//! Two divergent configurations existed historically; this module is the
//! single source of truth. Defaults describe a 160x160 arena with a
//! 200-tick step budget. The reward *structure* is fixed by
//! [`super::ArenaEnv`]; every magnitude here is tunable.

use anyhow::{anyhow, Result};

use super::types::Persona;

/// Simulation engine parameters
///
/// Geometry, entity stats, and progression rules for one arena.
#[derive(Debug, Clone)]
pub struct ArenaConfig {
    /// Arena width in length units
    pub width: f32,

    /// Arena height in length units
    pub height: f32,

    /// Player collision radius
    pub player_radius: f32,

    /// Enemy collision radius
    pub enemy_radius: f32,

    /// Bullet collision radius
    pub bullet_radius: f32,

    /// Player movement per tick (baseline; the speed boost multiplies it)
    pub player_speed: f32,

    /// Enemy pursuit movement per tick
    pub enemy_speed: f32,

    /// Damage per bullet hit (baseline; the damage boost multiplies it)
    pub player_damage: f32,

    /// Bullet movement per tick
    pub bullet_speed: f32,

    /// Player hit points at episode start (also the health cap)
    pub player_max_hp: i32,

    /// Hit points of a freshly spawned enemy
    pub enemy_hp: f32,

    /// Distance the player is pushed along the separation vector on enemy
    /// contact, preventing sustained multi-hit stacking in place
    pub knockback: f32,

    /// Enemies spawned into the first room
    pub initial_enemies: usize,

    /// Base of the per-room spawn formula `base + room_index`
    pub room_enemy_base: usize,

    /// Total number of rooms in an episode
    pub max_rooms: usize,

    /// Minimum distance from the walls for enemy spawn positions
    pub spawn_margin: f32,

    /// Step budget; the episode terminates when it is exhausted
    pub max_steps: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 160.0,
            height: 160.0,
            player_radius: 6.0,
            enemy_radius: 6.0,
            bullet_radius: 2.0,
            player_speed: 3.0,
            enemy_speed: 1.2,
            player_damage: 1.0,
            bullet_speed: 6.0,
            player_max_hp: 10,
            enemy_hp: 3.0,
            knockback: 4.0,
            initial_enemies: 3,
            room_enemy_base: 2,
            max_rooms: 4,
            spawn_margin: 10.0,
            max_steps: 200,
        }
    }
}

impl ArenaConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(anyhow!("arena dimensions must be positive"));
        }
        if self.spawn_margin * 2.0 >= self.width || self.spawn_margin * 2.0 >= self.height {
            return Err(anyhow!("spawn_margin must leave room inside the arena"));
        }
        if self.player_max_hp <= 0 {
            return Err(anyhow!("player_max_hp must be positive"));
        }
        if self.enemy_hp <= 0.0 {
            return Err(anyhow!("enemy_hp must be positive"));
        }
        if self.player_speed <= 0.0 || self.enemy_speed <= 0.0 || self.bullet_speed <= 0.0 {
            return Err(anyhow!("entity speeds must be positive"));
        }
        if self.player_damage <= 0.0 {
            return Err(anyhow!("player_damage must be positive"));
        }
        if self.max_rooms == 0 {
            return Err(anyhow!("max_rooms must be positive"));
        }
        if self.max_steps == 0 {
            return Err(anyhow!("max_steps must be positive"));
        }
        Ok(())
    }

    /// Set arena dimensions
    pub fn dimensions(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the step budget
    pub fn max_steps(mut self, steps: usize) -> Self {
        self.max_steps = steps;
        self
    }

    /// Set the first-room enemy count
    pub fn initial_enemies(mut self, count: usize) -> Self {
        self.initial_enemies = count;
        self
    }

    /// Set the total room count
    pub fn max_rooms(mut self, rooms: usize) -> Self {
        self.max_rooms = rooms;
        self
    }

    /// Set enemy hit points
    pub fn enemy_hp(mut self, hp: f32) -> Self {
        self.enemy_hp = hp;
        self
    }
}

/// Reward-shaping magnitudes
///
/// Each field is the magnitude of one term in the fixed reward structure;
/// signs are applied where the terms are combined.
#[derive(Debug, Clone)]
pub struct RewardConfig {
    /// Per-tick penalty discouraging idling
    pub time_penalty: f32,

    /// Reward per enemy killed this tick
    pub kill_reward: f32,

    /// Penalty per hit point lost this tick
    pub damage_penalty: f32,

    /// Survivor persona: bonus on a zero-damage tick
    pub survivor_bonus: f32,

    /// Explorer persona: bonus per newly visited room
    pub explorer_bonus: f32,

    /// Bonus per unit of distance moved, above the movement threshold
    pub distance_factor: f32,

    /// Minimum distance moved in a tick to count as movement
    pub move_threshold: f32,

    /// Penalty when the tick's movement stays below the threshold
    pub idle_move_penalty: f32,

    /// Bonus for choosing a movement action
    pub move_action_bonus: f32,

    /// Bonus for choosing a shoot action
    pub shoot_action_bonus: f32,

    /// Penalty for touching the arena boundary
    pub bounds_penalty: f32,

    /// Bonus for staying safely inside the arena
    pub bounds_bonus: f32,

    /// Per-tick bonus while the speed boost is active
    pub speed_boost_bonus: f32,

    /// Bonus per kill this tick while the damage boost is active
    pub damage_boost_kill_bonus: f32,

    /// Per-tick survival trickle
    pub survival_bonus: f32,

    /// One-time bonus for picking up a speed power-up
    pub speed_pickup_bonus: f32,

    /// One-time bonus for picking up a damage power-up
    pub damage_pickup_bonus: f32,

    /// Score-only bonus per kill (display score, not reward)
    pub kill_score_bonus: f32,

    /// Symmetric clamp applied to the total reward each tick
    pub reward_clamp: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            time_penalty: 0.01,
            kill_reward: 0.6,
            damage_penalty: 0.4,
            survivor_bonus: 0.02,
            explorer_bonus: 0.4,
            distance_factor: 0.05,
            move_threshold: 1.0,
            idle_move_penalty: 0.01,
            move_action_bonus: 0.03,
            shoot_action_bonus: 0.01,
            bounds_penalty: 2.0,
            bounds_bonus: 0.02,
            speed_boost_bonus: 0.02,
            damage_boost_kill_bonus: 0.05,
            survival_bonus: 0.03,
            speed_pickup_bonus: 1.5,
            damage_pickup_bonus: 2.0,
            kill_score_bonus: 0.5,
            reward_clamp: 2.0,
        }
    }
}

impl RewardConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.reward_clamp <= 0.0 {
            return Err(anyhow!("reward_clamp must be positive"));
        }
        if self.move_threshold < 0.0 {
            return Err(anyhow!("move_threshold must be non-negative"));
        }
        Ok(())
    }
}

/// Environment wrapper parameters
///
/// Power-up and boost rules plus the embedded engine and reward
/// configurations.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Reward-shaping profile
    pub persona: Persona,

    /// Per-tick probability of spawning one power-up
    pub powerup_spawn_chance: f64,

    /// Minimum distance from the walls for power-up placement
    pub powerup_margin: f32,

    /// Inclusive lower bound of the randomized power-up time-to-live
    pub powerup_ttl_min: u32,

    /// Inclusive upper bound of the randomized power-up time-to-live
    pub powerup_ttl_max: u32,

    /// Boost duration in ticks; a repeat pickup refreshes to this value
    pub boost_duration: u32,

    /// Speed multiplier applied to the baseline while boosted
    pub speed_multiplier: f32,

    /// Damage multiplier applied to the baseline while boosted
    pub damage_multiplier: f32,

    /// Simulation engine parameters
    pub arena: ArenaConfig,

    /// Reward-shaping magnitudes
    pub reward: RewardConfig,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            persona: Persona::Survivor,
            powerup_spawn_chance: 0.01,
            powerup_margin: 50.0,
            powerup_ttl_min: 150,
            powerup_ttl_max: 300,
            boost_duration: 200,
            speed_multiplier: 1.5,
            damage_multiplier: 1.5,
            arena: ArenaConfig::default(),
            reward: RewardConfig::default(),
        }
    }
}

impl EnvConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters, including the embedded configs
    pub fn validate(&self) -> Result<()> {
        self.arena.validate()?;
        self.reward.validate()?;
        if !(0.0..=1.0).contains(&self.powerup_spawn_chance) {
            return Err(anyhow!("powerup_spawn_chance must be in [0, 1]"));
        }
        if self.powerup_ttl_min > self.powerup_ttl_max {
            return Err(anyhow!("powerup_ttl_min must not exceed powerup_ttl_max"));
        }
        if self.powerup_margin * 2.0 >= self.arena.width
            || self.powerup_margin * 2.0 >= self.arena.height
        {
            return Err(anyhow!("powerup_margin must leave room inside the arena"));
        }
        if self.boost_duration == 0 {
            return Err(anyhow!("boost_duration must be positive"));
        }
        if self.speed_multiplier <= 0.0 || self.damage_multiplier <= 0.0 {
            return Err(anyhow!("boost multipliers must be positive"));
        }
        Ok(())
    }

    /// Set the reward persona
    pub fn persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }

    /// Set the engine configuration
    pub fn arena(mut self, arena: ArenaConfig) -> Self {
        self.arena = arena;
        self
    }

    /// Set the reward configuration
    pub fn reward(mut self, reward: RewardConfig) -> Self {
        self.reward = reward;
        self
    }

    /// Set the per-tick power-up spawn probability
    pub fn powerup_spawn_chance(mut self, chance: f64) -> Self {
        self.powerup_spawn_chance = chance;
        self
    }

    /// Set the boost duration in ticks
    pub fn boost_duration(mut self, ticks: u32) -> Self {
        self.boost_duration = ticks;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_validate() {
        assert!(ArenaConfig::default().validate().is_ok());
        assert!(RewardConfig::default().validate().is_ok());
        assert!(EnvConfig::default().validate().is_ok());
    }

    #[test]
    fn test_arena_validation() {
        let config = ArenaConfig::new().dimensions(0.0, 160.0);
        assert!(config.validate().is_err());

        let config = ArenaConfig::new().max_steps(0);
        assert!(config.validate().is_err());

        let config = ArenaConfig::new().max_rooms(0);
        assert!(config.validate().is_err());

        // Margin swallowing the whole arena
        let mut config = ArenaConfig::new();
        config.spawn_margin = 80.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_validation() {
        let config = EnvConfig::new().powerup_spawn_chance(1.5);
        assert!(config.validate().is_err());

        let mut config = EnvConfig::new();
        config.powerup_ttl_min = 500;
        assert!(config.validate().is_err());

        let config = EnvConfig::new().boost_duration(0);
        assert!(config.validate().is_err());

        // A shrunken arena must invalidate the default power-up margin
        let config = EnvConfig::new().arena(ArenaConfig::new().dimensions(80.0, 80.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = EnvConfig::new()
            .persona(Persona::Explorer)
            .powerup_spawn_chance(0.05)
            .boost_duration(100)
            .arena(ArenaConfig::new().initial_enemies(1).max_rooms(2));

        assert_eq!(config.persona, Persona::Explorer);
        assert_eq!(config.powerup_spawn_chance, 0.05);
        assert_eq!(config.boost_duration, 100);
        assert_eq!(config.arena.initial_enemies, 1);
        assert_eq!(config.arena.max_rooms, 2);

        // Other values should remain default
        assert_eq!(config.arena.max_steps, 200);
        assert_eq!(config.reward.kill_reward, 0.6);
    }
}

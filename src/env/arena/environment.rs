//! Arena environment wrapper
//!
//! [`ArenaEnv`] owns an [`ArenaGame`] engine and layers on everything the
//! engine does not know about: power-up spawn/expiry, boost activation and
//! decay, reward shaping, episode metrics, win/death presentation state,
//! and observation vectorization. It exposes the standard RL interface
//! consumed by training and inference collaborators.

use anyhow::Result;
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::env::{EnvError, Environment, SpaceInfo, SpaceType, StepInfo, StepResult};
use crate::utils::math::distance;

use super::config::EnvConfig;
use super::entities::{Confetti, PowerUp};
use super::game::ArenaGame;
use super::metrics::EpisodeMetrics;
use super::render;
use super::types::{Action, GameView, Persona, PowerUpKind, Snapshot};

/// Length of the observation vector
pub const OBS_DIM: usize = 20;

/// Enemy slots in the observation vector
const ENEMY_SLOTS: usize = 3;

/// Power-up slots in the observation vector
const POWERUP_SLOTS: usize = 2;

/// Ticks the death fade-out lasts in presentation state
const DEATH_FADE_TICKS: usize = 75;

// Decorrelates the wrapper generator from the engine generator, which is
// seeded with the caller's seed directly.
const WRAPPER_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// The environment wrapper
///
/// Driving rule per `step`: engine tick first, then power-up spawn, boost
/// and TTL decay, kill counting, reward shaping, pickups, win/death
/// bookkeeping, metrics, and finally observation formatting.
#[derive(Debug, Clone)]
pub struct ArenaEnv {
    /// Wrapper parameters (persona, power-ups, boosts, rewards, engine)
    pub config: EnvConfig,
    /// The owned simulation engine
    pub game: ArenaGame,
    /// Power-ups currently on the floor
    pub powerups: Vec<PowerUp>,
    /// Remaining speed-boost ticks, if active
    pub speed_boost: Option<u32>,
    /// Remaining damage-boost ticks, if active
    pub damage_boost: Option<u32>,
    /// Confetti particles while the win celebration plays
    pub confetti: Vec<Confetti>,
    /// Episode counter
    pub episode: usize,
    rng: StdRng,
    initialized: bool,
    steps: usize,
    score: f32,
    base_speed: f32,
    base_damage: f32,
    last_pos: (f32, f32),
    prev_rooms: usize,
    death_tick: Option<usize>,
    win_tick: Option<usize>,
    metrics: EpisodeMetrics,
}

impl ArenaEnv {
    /// Create a new environment; call [`ArenaEnv::reset`] before stepping
    pub fn new(config: EnvConfig) -> Self {
        let game = ArenaGame::new(config.arena.clone(), 0);
        let base_speed = config.arena.player_speed;
        let base_damage = config.arena.player_damage;
        Self {
            config,
            game,
            powerups: Vec::new(),
            speed_boost: None,
            damage_boost: None,
            confetti: Vec::new(),
            episode: 0,
            rng: StdRng::from_entropy(),
            initialized: false,
            steps: 0,
            score: 0.0,
            base_speed,
            base_damage,
            last_pos: (0.0, 0.0),
            prev_rooms: 0,
            death_tick: None,
            win_tick: None,
            metrics: EpisodeMetrics::default(),
        }
    }

    /// Start a new episode and return the initial observation
    ///
    /// `Some(seed)` reseeds both the engine and the wrapper generators, so a
    /// seeded episode is reproducible end to end; `None` continues the
    /// current generator streams.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<Vec<f32>> {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed ^ WRAPPER_SEED_SALT);
        }
        let raw = self.game.reset(seed);

        self.powerups.clear();
        self.speed_boost = None;
        self.damage_boost = None;
        self.confetti.clear();
        self.steps = 0;
        self.score = 0.0;
        self.death_tick = None;
        self.win_tick = None;

        // Stat baselines are recorded exactly once per episode; boost expiry
        // restores these values, never a re-derived one
        self.base_speed = self.game.player.speed;
        self.base_damage = self.game.player.damage;

        self.last_pos = (raw.player.x, raw.player.y);
        self.prev_rooms = raw.rooms_visited.len();
        self.metrics = EpisodeMetrics::new(raw.rooms_visited.len());

        self.episode += 1;
        self.initialized = true;
        debug!("episode {} started ({:?} persona)", self.episode, self.config.persona);

        Ok(self.format_obs(&raw))
    }

    /// Advance one tick with a raw policy action index
    ///
    /// Out-of-range indices decode to a no-op rather than failing; an
    /// untrusted policy may emit anything during training.
    pub fn step(&mut self, action: i64) -> Result<StepResult<Vec<f32>>> {
        let action = Action::from_index(action);
        let (raw, engine_info, done) = self.game.step(action);
        self.steps += 1;

        if self.rng.gen_bool(self.config.powerup_spawn_chance) {
            self.spawn_powerup();
        }
        self.update_boosts();

        // Count each enemy's live->dead transition exactly once
        let kills = self.count_new_kills();
        self.metrics.enemies_killed += kills;

        let mut reward = self.shaped_reward(&raw, engine_info.damage_taken, kills, action);
        reward += self.handle_pickups(raw.player.x, raw.player.y);
        let clamp = self.config.reward.reward_clamp;
        let reward = reward.clamp(-clamp, clamp);

        self.score += reward + kills as f32 * self.config.reward.kill_score_bonus;

        if self.game.all_enemies_dead() && self.win_tick.is_none() {
            self.win_tick = Some(self.steps);
            self.spawn_confetti();
            debug!("all rooms cleared at tick {}", self.steps);
        }
        if done && raw.player.hp <= 0 && self.death_tick.is_none() {
            self.death_tick = Some(self.steps);
            self.metrics.deaths += 1;
            debug!("player died at tick {}", self.steps);
        }
        for c in &mut self.confetti {
            c.step();
        }
        self.confetti.retain(|c| c.life > 0);

        self.metrics.time_alive = self.steps;
        self.metrics.damage_taken += engine_info.damage_taken;
        self.metrics.rooms_visited = raw.rooms_visited.len();
        if action.shoots() {
            self.metrics.shots_fired += 1;
        }

        Ok(StepResult {
            observation: self.format_obs(&raw),
            reward,
            terminated: done,
            truncated: false,
            info: StepInfo {
                damage_taken: engine_info.damage_taken,
                enemies_killed: kills,
                enemies_alive: engine_info.enemies_alive,
            },
        })
    }

    /// Accumulated shaped reward this episode
    pub fn score(&self) -> f32 {
        self.score
    }

    /// The episode metrics accumulator
    ///
    /// Fails with a not-initialized error before the first reset.
    pub fn metrics(&self) -> Result<&EpisodeMetrics> {
        if !self.initialized {
            return Err(EnvError::NotInitialized { operation: "metrics()" }.into());
        }
        Ok(&self.metrics)
    }

    /// Serialize the episode metrics to a JSON record
    pub fn metrics_json(&self) -> Result<String> {
        self.metrics()?.to_json()
    }

    /// Save the episode metrics record to a JSON file
    pub fn save_metrics_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        self.metrics()?.save_json(path)
    }

    /// Drawable description of the current frame for an external renderer
    ///
    /// Fails with a not-initialized error before the first reset.
    pub fn game_view(&self) -> Result<GameView> {
        if !self.initialized {
            return Err(EnvError::NotInitialized { operation: "game_view()" }.into());
        }
        let death_fade = match self.death_tick {
            Some(tick) => {
                let elapsed = self.steps.saturating_sub(tick) as f32;
                (1.0 - elapsed / DEATH_FADE_TICKS as f32).clamp(0.0, 1.0)
            }
            None => 0.0,
        };
        Ok(GameView {
            snapshot: self.game.snapshot(),
            powerups: self.powerups.clone(),
            damage_boost: self.damage_boost.is_some(),
            speed_boost: self.speed_boost.is_some(),
            score: self.score,
            kills: self.metrics.enemies_killed,
            death_fade,
            won: self.win_tick.is_some(),
            confetti: self.confetti.clone(),
        })
    }

    /// Rasterize the current frame into a row-major RGB buffer
    ///
    /// The buffer spans the arena plus a side panel reserved for HUD text;
    /// see [`render::FRAME_EXTRA_WIDTH`] for the panel width.
    pub fn render(&self) -> Result<Vec<u8>> {
        let view = self.game_view()?;
        Ok(render::rasterize(&view, &self.config.arena))
    }

    // Scan for live->dead transitions not yet counted. The explicit
    // per-enemy flag makes kill counting idempotent across ticks.
    fn count_new_kills(&mut self) -> usize {
        let mut kills = 0;
        for enemy in self.game.enemies.iter_mut() {
            if !enemy.alive && !enemy.counted {
                enemy.counted = true;
                kills += 1;
            }
        }
        kills
    }

    fn shaped_reward(&mut self, raw: &Snapshot, damage: u32, kills: usize, action: Action) -> f32 {
        let rc = self.config.reward.clone();
        let mut r = -rc.time_penalty;

        // Combat terms
        r += kills as f32 * rc.kill_reward;
        r -= damage as f32 * rc.damage_penalty;

        // Persona-conditioned terms
        match self.config.persona {
            Persona::Survivor => {
                if damage == 0 {
                    r += rc.survivor_bonus;
                }
            }
            Persona::Explorer => {
                let rooms = raw.rooms_visited.len();
                if rooms > self.prev_rooms {
                    r += rc.explorer_bonus * (rooms - self.prev_rooms) as f32;
                    self.prev_rooms = rooms;
                }
            }
        }

        // Movement terms
        let (px, py) = (raw.player.x, raw.player.y);
        let moved = distance(self.last_pos.0, self.last_pos.1, px, py);
        self.last_pos = (px, py);
        if moved > rc.move_threshold {
            r += rc.distance_factor * moved;
        } else {
            r -= rc.idle_move_penalty;
        }
        if action.moves() {
            r += rc.move_action_bonus;
        } else if action.shoots() {
            r += rc.shoot_action_bonus;
        }

        // Boundary terms: positions are clamped, so "touching" means sitting
        // on an edge
        let arena = &self.config.arena;
        let at_bounds = px <= 0.0 || px >= arena.width || py <= 0.0 || py >= arena.height;
        if at_bounds {
            r -= rc.bounds_penalty;
        } else {
            r += rc.bounds_bonus;
        }

        // Active boost encouragement
        if self.speed_boost.is_some() {
            r += rc.speed_boost_bonus;
        }
        if self.damage_boost.is_some() {
            r += rc.damage_boost_kill_bonus * kills as f32;
        }

        // Survival trickle
        r + rc.survival_bonus
    }

    fn spawn_powerup(&mut self) {
        let kind = if self.rng.gen_bool(0.5) { PowerUpKind::Speed } else { PowerUpKind::Damage };
        let margin = self.config.powerup_margin;
        let x = self.rng.gen_range(margin..self.config.arena.width - margin);
        let y = self.rng.gen_range(margin..self.config.arena.height - margin);
        let ttl = self.rng.gen_range(self.config.powerup_ttl_min..=self.config.powerup_ttl_max);
        self.powerups.push(PowerUp { x, y, kind, ttl });
        debug!("{kind:?} power-up spawned at ({x:.1}, {y:.1}), ttl {ttl}");
    }

    // Decrement boost durations, restoring the recorded baselines exactly on
    // expiry, then age out power-ups whose TTL ran down.
    fn update_boosts(&mut self) {
        if let Some(remaining) = self.speed_boost.as_mut() {
            *remaining -= 1;
            if *remaining == 0 {
                self.game.player.speed = self.base_speed;
                self.speed_boost = None;
                debug!("speed boost expired");
            }
        }
        if let Some(remaining) = self.damage_boost.as_mut() {
            *remaining -= 1;
            if *remaining == 0 {
                self.game.player.damage = self.base_damage;
                self.damage_boost = None;
                debug!("damage boost expired");
            }
        }

        for p in &mut self.powerups {
            p.ttl = p.ttl.saturating_sub(1);
        }
        self.powerups.retain(|p| p.ttl > 0);
    }

    fn handle_pickups(&mut self, px: f32, py: f32) -> f32 {
        let pickup_radius = self.config.arena.player_radius * 2.0;
        let mut bonus = 0.0;
        let mut i = 0;
        while i < self.powerups.len() {
            let p = self.powerups[i];
            if distance(p.x, p.y, px, py) < pickup_radius {
                self.activate_boost(p.kind);
                bonus += match p.kind {
                    PowerUpKind::Speed => self.config.reward.speed_pickup_bonus,
                    PowerUpKind::Damage => self.config.reward.damage_pickup_bonus,
                };
                self.powerups.remove(i);
            } else {
                i += 1;
            }
        }
        bonus
    }

    // Activating an already-active boost refreshes its duration only; the
    // multiplier always applies to the recorded baseline, never to an
    // already-boosted value.
    fn activate_boost(&mut self, kind: PowerUpKind) {
        let duration = self.config.boost_duration;
        match kind {
            PowerUpKind::Speed => {
                if self.speed_boost.is_none() {
                    self.game.player.speed = self.base_speed * self.config.speed_multiplier;
                }
                self.speed_boost = Some(duration);
            }
            PowerUpKind::Damage => {
                if self.damage_boost.is_none() {
                    self.game.player.damage = self.base_damage * self.config.damage_multiplier;
                }
                self.damage_boost = Some(duration);
            }
        }
        debug!("{kind:?} boost active for {duration} ticks");
    }

    fn spawn_confetti(&mut self) {
        self.confetti.clear();
        let arena = &self.config.arena;
        for _ in 0..80 {
            let particle = Confetti {
                x: self.rng.gen_range(0.0..arena.width),
                y: self.rng.gen_range(0.0..arena.height),
                vx: self.rng.gen_range(-2.0..2.0),
                vy: self.rng.gen_range(-5.0..-1.0),
                color: [
                    self.rng.gen_range(100..=255),
                    self.rng.gen_range(100..=255),
                    self.rng.gen_range(100..=255),
                ],
                life: self.rng.gen_range(30..=60),
            };
            self.confetti.push(particle);
        }
    }

    fn format_obs(&self, raw: &Snapshot) -> Vec<f32> {
        let mut obs = vec![0.0_f32; OBS_DIM];

        // Player
        obs[0] = raw.player.x;
        obs[1] = raw.player.y;
        obs[2] = raw.player.hp as f32;

        // Enemy slots, stable list order, zero-padded
        for (i, enemy) in raw.enemies.iter().take(ENEMY_SLOTS).enumerate() {
            let base = 3 + i * 3;
            obs[base] = enemy.x;
            obs[base + 1] = enemy.y;
            obs[base + 2] = 1.0;
        }

        // Power-up slots
        for (i, powerup) in self.powerups.iter().take(POWERUP_SLOTS).enumerate() {
            let base = 12 + i * 3;
            obs[base] = powerup.x;
            obs[base + 1] = powerup.y;
            obs[base + 2] = 1.0;
        }

        // Boost flags
        obs[18] = if self.damage_boost.is_some() { 1.0 } else { 0.0 };
        obs[19] = if self.speed_boost.is_some() { 1.0 } else { 0.0 };

        obs
    }
}

impl Environment for ArenaEnv {
    type Observation = Vec<f32>;
    type Action = i64;

    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Observation> {
        self.reset(seed)
    }

    fn step(&mut self, action: Self::Action) -> Result<StepResult<Self::Observation>> {
        self.step(action)
    }

    fn observation_space(&self) -> SpaceInfo {
        SpaceInfo { shape: vec![OBS_DIM], dtype: SpaceType::Continuous }
    }

    fn action_space(&self) -> SpaceInfo {
        SpaceInfo { shape: vec![], dtype: SpaceType::Discrete(Action::COUNT) }
    }
}

//! Simulation engine for one arena
//!
//! [`ArenaGame`] owns every entity and advances one discrete time step per
//! call: player movement, bullet spawning, enemy pursuit, collision
//! resolution, and room progression. All randomness (spawn positions) flows
//! through a single seeded generator owned by the instance, so equal seeds
//! and action sequences produce bit-identical trajectories.

use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::env::StepInfo;
use crate::utils::math::{circles_overlap, clamp_to_rect, normalized};

use super::config::ArenaConfig;
use super::entities::{Bullet, BulletOwner, Enemy, Player};
use super::types::{Action, BulletSnapshot, EnemySnapshot, PlayerSnapshot, Snapshot};

/// The simulation engine
///
/// A pure function of (state, action, rng): one `step` call resolves the
/// fixed phase order — move player, spawn bullet, move enemies, move
/// bullets, bullet-vs-enemy hits, enemy-vs-player contact — then room
/// progression and termination.
#[derive(Debug, Clone)]
pub struct ArenaGame {
    /// Engine parameters
    pub config: ArenaConfig,
    /// The player character
    pub player: Player,
    /// Every enemy spawned into the current room, dead ones included
    pub enemies: Vec<Enemy>,
    /// Live player bullets
    pub bullets: Vec<Bullet>,
    /// Ticks elapsed this episode
    pub steps: usize,
    /// Current room index
    pub current_room: usize,
    /// Rooms visited so far, in visit order
    pub rooms_visited: Vec<usize>,
    rng: StdRng,
}

impl ArenaGame {
    /// Create a new engine and run the initial reset
    pub fn new(config: ArenaConfig, seed: u64) -> Self {
        let player = Player {
            x: config.width / 2.0,
            y: config.height / 2.0,
            hp: config.player_max_hp,
            radius: config.player_radius,
            speed: config.player_speed,
            damage: config.player_damage,
        };
        let mut game = Self {
            config,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            steps: 0,
            current_room: 0,
            rooms_visited: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        };
        game.reset(Some(seed));
        game
    }

    /// Reset to the initial state and return the first snapshot
    ///
    /// `Some(seed)` reseeds the engine generator; `None` keeps the current
    /// generator state, so consecutive unseeded episodes differ.
    pub fn reset(&mut self, seed: Option<u64>) -> Snapshot {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.player = Player {
            x: self.config.width / 2.0,
            y: self.config.height / 2.0,
            hp: self.config.player_max_hp,
            radius: self.config.player_radius,
            speed: self.config.player_speed,
            damage: self.config.player_damage,
        };
        self.bullets.clear();
        self.enemies.clear();
        self.steps = 0;
        self.current_room = 0;
        self.rooms_visited = vec![0];
        let initial = self.config.initial_enemies;
        self.spawn_enemies(initial);
        debug!("arena reset: {} enemies in room 0", self.enemies.len());
        self.snapshot()
    }

    /// Advance one tick
    ///
    /// Returns the post-tick snapshot, the per-tick counters, and the done
    /// flag (player death or step budget exhaustion).
    pub fn step(&mut self, action: Action) -> (Snapshot, StepInfo, bool) {
        self.steps += 1;

        // (a) Move player, normalized so diagonals are not faster
        let (dx, dy) = action.delta();
        let (nx, ny) = normalized(dx, dy);
        if nx != 0.0 || ny != 0.0 {
            let (px, py) = clamp_to_rect(
                self.player.x + nx * self.player.speed,
                self.player.y + ny * self.player.speed,
                self.config.width,
                self.config.height,
            );
            self.player.x = px;
            self.player.y = py;
        }

        // (b) Spawn one bullet on shoot actions
        if action.shoots() {
            let (sx, sy) = if nx != 0.0 || ny != 0.0 { (nx, ny) } else { (0.0, -1.0) };
            self.bullets.push(Bullet::new(
                self.player.x,
                self.player.y,
                sx * self.config.bullet_speed,
                sy * self.config.bullet_speed,
                self.config.bullet_radius,
            ));
        }

        // (c) Enemy pursuit
        let (px, py) = (self.player.x, self.player.y);
        for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
            enemy.step_toward(px, py, self.config.enemy_speed);
        }

        // (d) Integrate bullets, expiring outside the arena
        for bullet in self.bullets.iter_mut().filter(|b| b.alive) {
            bullet.step(self.config.width, self.config.height);
        }

        // (e) Bullet-vs-enemy hits; a bullet is consumed by its first hit
        let mut kills = 0;
        for bullet in self.bullets.iter_mut().filter(|b| b.alive) {
            if bullet.owner != BulletOwner::Player {
                continue;
            }
            for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
                if circles_overlap(bullet.x, bullet.y, bullet.radius, enemy.x, enemy.y, enemy.radius)
                {
                    enemy.hp -= self.player.damage;
                    bullet.alive = false;
                    if enemy.hp <= 0.0 {
                        enemy.alive = false;
                        kills += 1;
                    }
                    break;
                }
            }
        }

        // (f) Enemy-vs-player contact: 1 HP per colliding enemy plus
        // knockback along the separation vector
        let mut damage: u32 = 0;
        for enemy in &self.enemies {
            if !enemy.alive {
                continue;
            }
            if circles_overlap(
                enemy.x,
                enemy.y,
                enemy.radius,
                self.player.x,
                self.player.y,
                self.player.radius,
            ) {
                damage += 1;
                let (kx, ky) = normalized(self.player.x - enemy.x, self.player.y - enemy.y);
                self.player.x += kx * self.config.knockback;
                self.player.y += ky * self.config.knockback;
            }
        }
        let (px, py) =
            clamp_to_rect(self.player.x, self.player.y, self.config.width, self.config.height);
        self.player.x = px;
        self.player.y = py;
        self.player.hp = (self.player.hp - damage as i32).max(0);

        self.bullets.retain(|b| b.alive);

        let info = StepInfo {
            damage_taken: damage,
            enemies_killed: kills,
            enemies_alive: self.living_enemies(),
        };

        // Room progression: clearing a room (while rooms remain) spawns the
        // next batch within the same tick
        if info.enemies_alive == 0 && self.current_room < self.config.max_rooms - 1 {
            self.current_room += 1;
            self.rooms_visited.push(self.current_room);
            let batch = self.config.room_enemy_base + self.current_room;
            self.spawn_enemies(batch);
            debug!("room {} entered: {} enemies spawned", self.current_room, batch);
        }

        let done = self.player.hp <= 0 || self.steps >= self.config.max_steps;
        (self.snapshot(), info, done)
    }

    /// Count enemies still alive
    pub fn living_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    /// Whether every enemy of the current room is dead
    pub fn all_enemies_dead(&self) -> bool {
        self.enemies.iter().all(|e| !e.alive)
    }

    /// Current state as the canonical snapshot (live entities only)
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: PlayerSnapshot { x: self.player.x, y: self.player.y, hp: self.player.hp },
            enemies: self
                .enemies
                .iter()
                .filter(|e| e.alive)
                .map(|e| EnemySnapshot { x: e.x, y: e.y, hp: e.hp })
                .collect(),
            bullets: self
                .bullets
                .iter()
                .filter(|b| b.alive)
                .map(|b| BulletSnapshot { x: b.x, y: b.y })
                .collect(),
            rooms_visited: self.rooms_visited.clone(),
            room: self.current_room,
            steps: self.steps,
        }
    }

    /// Spawn a batch of enemies at seeded-random positions
    ///
    /// Dead enemies from the cleared room stay in the list so the wrapper's
    /// kill accounting can still see them; new episodes clear the list.
    fn spawn_enemies(&mut self, n: usize) {
        let margin = self.config.spawn_margin;
        for _ in 0..n {
            let x = self.rng.gen_range(margin..self.config.width - margin);
            let y = self.rng.gen_range(margin..self.config.height - margin);
            self.enemies.push(Enemy::new(x, y, self.config.enemy_hp, self.config.enemy_radius));
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn test_game() -> ArenaGame {
        ArenaGame::new(ArenaConfig::default(), 7)
    }

    #[test]
    fn test_reset_state() {
        let game = test_game();
        assert_eq!(game.player.x, 80.0);
        assert_eq!(game.player.y, 80.0);
        assert_eq!(game.player.hp, 10);
        assert_eq!(game.enemies.len(), 3);
        assert_eq!(game.current_room, 0);
        assert_eq!(game.rooms_visited, vec![0]);
        assert!(game.bullets.is_empty());
    }

    #[test]
    fn test_enemies_spawn_inside_margin() {
        let game = test_game();
        for enemy in &game.enemies {
            assert!(enemy.x >= 10.0 && enemy.x <= 150.0, "enemy x out of margin: {}", enemy.x);
            assert!(enemy.y >= 10.0 && enemy.y <= 150.0, "enemy y out of margin: {}", enemy.y);
        }
    }

    #[test]
    fn test_movement_is_normalized() {
        let mut game = test_game();
        game.enemies.clear(); // avoid contact knockback interfering

        game.step(Action::MoveRight);
        assert_approx_eq!(game.player.x, 83.0, 1e-5);
        assert_approx_eq!(game.player.y, 80.0, 1e-5);

        let mut game = test_game();
        game.enemies.clear();
        game.step(Action::ShootDownRight);
        let dist = crate::utils::math::distance(80.0, 80.0, game.player.x, game.player.y);
        assert_approx_eq!(dist, 3.0, 1e-4);
    }

    #[test]
    fn test_player_stays_in_bounds() {
        let mut game = test_game();
        game.enemies.clear();
        for _ in 0..100 {
            game.step(Action::MoveLeft);
        }
        assert_eq!(game.player.x, 0.0, "player must clamp at the left wall");
        assert!(game.player.y >= 0.0 && game.player.y <= 160.0);
    }

    #[test]
    fn test_shoot_action_spawns_one_bullet() {
        let mut game = test_game();
        game.enemies.clear();
        game.step(Action::ShootUpRight);
        assert_eq!(game.bullets.len(), 1);

        // Bullet speed is fixed regardless of direction
        let b = game.bullets[0];
        let speed = (b.vx * b.vx + b.vy * b.vy).sqrt();
        assert_approx_eq!(speed, 6.0, 1e-4);

        game.step(Action::MoveUp);
        assert_eq!(game.bullets.len(), 1, "move actions must not fire");
    }

    #[test]
    fn test_bullet_kill_consumes_bullet() {
        let mut game = test_game();
        game.enemies.clear();
        // One weak enemy due east, outside contact range, with a bullet
        // already in flight toward it
        game.enemies.push(Enemy::new(120.0, 80.0, 1.0, 6.0));
        game.bullets.push(Bullet::new(80.0, 80.0, 6.0, 0.0, 2.0));

        let mut killed = 0;
        for _ in 0..10 {
            let (_, info, _) = game.step(Action::Idle);
            killed += info.enemies_killed;
            if killed > 0 {
                break;
            }
        }
        assert_eq!(killed, 1, "a 1 HP enemy must die to a single bullet");
        assert!(game.bullets.is_empty(), "the bullet must be consumed by the hit");
    }

    #[test]
    fn test_bullet_damage_uses_player_multiplier() {
        let mut game = test_game();
        game.enemies.clear();
        game.player.damage = 1.5;
        game.enemies.push(Enemy::new(120.0, 80.0, 3.0, 6.0));
        game.bullets.push(Bullet::new(80.0, 80.0, 6.0, 0.0, 2.0));

        for _ in 0..10 {
            if game.enemies[0].hp < 3.0 {
                break;
            }
            game.step(Action::Idle);
        }
        assert_approx_eq!(game.enemies[0].hp, 1.5, 1e-5);

        // A second boosted hit finishes it: 3.0 - 1.5 - 1.5 = 0
        game.bullets.push(Bullet::new(80.0, 80.0, 6.0, 0.0, 2.0));
        let mut killed = 0;
        for _ in 0..10 {
            let (_, info, _) = game.step(Action::Idle);
            killed += info.enemies_killed;
            if killed > 0 {
                break;
            }
        }
        assert_eq!(killed, 1);
        assert!(!game.enemies[0].alive);
    }

    #[test]
    fn test_contact_damage_and_knockback() {
        let mut game = test_game();
        game.enemies.clear();
        game.enemies.push(Enemy::new(82.0, 80.0, 3.0, 6.0));

        let hp_before = game.player.hp;
        let (_, info, _) = game.step(Action::Idle);

        assert_eq!(info.damage_taken, 1);
        assert_eq!(game.player.hp, hp_before - 1);
        // Knockback pushes the player away along the separation vector
        assert!(game.player.x < 80.0, "player must be pushed left, got {}", game.player.x);
    }

    #[test]
    fn test_health_floors_at_zero() {
        let mut game = test_game();
        game.player.hp = 1;
        game.enemies.clear();
        // Three enemies stacked on the player
        for _ in 0..3 {
            game.enemies.push(Enemy::new(80.0, 80.0, 3.0, 6.0));
        }
        let (_, info, done) = game.step(Action::Idle);
        assert!(done, "death must end the episode");
        assert_eq!(game.player.hp, 0, "health must never go below zero");
        assert!(info.damage_taken >= 1);
    }

    #[test]
    fn test_room_progression_and_spawn_formula() {
        let mut game = test_game();
        for enemy in &mut game.enemies {
            enemy.alive = false;
            enemy.hp = 0.0;
        }

        let (_, info, _) = game.step(Action::Idle);
        assert_eq!(info.enemies_alive, 0, "info reflects the cleared room");
        assert_eq!(game.current_room, 1);
        assert_eq!(game.rooms_visited, vec![0, 1]);
        // base 2 + room 1 = 3 fresh enemies
        assert_eq!(game.living_enemies(), 3);
    }

    #[test]
    fn test_no_progression_past_last_room() {
        let mut game = ArenaGame::new(ArenaConfig::default().max_rooms(1), 7);
        for enemy in &mut game.enemies {
            enemy.alive = false;
        }
        game.step(Action::Idle);
        assert_eq!(game.current_room, 0);
        assert_eq!(game.living_enemies(), 0);
        assert!(game.all_enemies_dead());
    }

    #[test]
    fn test_step_budget_terminates() {
        // Single empty room: nothing can kill the player, so the cap alone
        // must end the episode, at exactly the configured budget
        let mut game = ArenaGame::new(ArenaConfig::default().max_rooms(1), 7);
        game.enemies.clear();
        let mut done = false;
        let mut ticks = 0;
        while !done && ticks < 1000 {
            let (_, _, d) = game.step(Action::Idle);
            done = d;
            ticks += 1;
        }
        assert!(done);
        assert_eq!(game.steps, 200);
    }

    #[test]
    fn test_engine_determinism() {
        let actions = [0_i64, 3, 8, 8, 1, 5, 4, 2, 6, 0, 7, 8];
        let run = |seed: u64| {
            let mut game = ArenaGame::new(ArenaConfig::default(), seed);
            let mut snapshots = Vec::new();
            for &a in actions.iter().cycle().take(60) {
                let (snap, _, _) = game.step(Action::from_index(a));
                snapshots.push(snap);
            }
            snapshots
        };
        assert_eq!(run(123), run(123), "equal seeds must give identical trajectories");
        assert_ne!(run(123), run(124), "different seeds must diverge");
    }

    #[test]
    fn test_reset_reproduces_initial_layout() {
        let mut game = ArenaGame::new(ArenaConfig::default(), 99);
        let first: Vec<(f32, f32)> = game.enemies.iter().map(|e| (e.x, e.y)).collect();
        game.step(Action::MoveUp);
        let again = game.reset(Some(99));
        let second: Vec<(f32, f32)> = game.enemies.iter().map(|e| (e.x, e.y)).collect();
        assert_eq!(first, second);
        assert_eq!(again.steps, 0);
    }

    #[test]
    fn test_out_of_range_action_is_noop() {
        let mut game = test_game();
        game.enemies.clear();
        let (snap, _, _) = game.step(Action::from_index(42));
        assert_eq!(snap.player.x, 80.0);
        assert_eq!(snap.player.y, 80.0);
        assert!(game.bullets.is_empty());
    }
}

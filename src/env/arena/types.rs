//! Basic types for the arena environment
//!
//! This module defines the discrete action space, reward personas, power-up
//! kinds, and the canonical snapshot structures shared by the engine and the
//! wrapper.

/// Discrete player action
///
/// Nine actions: idle, four axis moves, and four diagonal move-and-shoot
/// combos. Shooting always happens while moving diagonally; the bullet
/// travels along the same diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Do nothing
    Idle,
    /// Move left
    MoveLeft,
    /// Move right
    MoveRight,
    /// Move up
    MoveUp,
    /// Move down
    MoveDown,
    /// Move up-left and shoot up-left
    ShootUpLeft,
    /// Move up-right and shoot up-right
    ShootUpRight,
    /// Move down-left and shoot down-left
    ShootDownLeft,
    /// Move down-right and shoot down-right
    ShootDownRight,
}

impl Action {
    /// Number of discrete actions
    pub const COUNT: usize = 9;

    /// Create action from a policy's action index
    ///
    /// Out-of-range indices decode to [`Action::Idle`]: an untrusted policy
    /// may emit unexpected indices during training, and a no-op is safer
    /// than a panic mid-rollout.
    pub fn from_index(action: i64) -> Self {
        match action {
            1 => Action::MoveLeft,
            2 => Action::MoveRight,
            3 => Action::MoveUp,
            4 => Action::MoveDown,
            5 => Action::ShootUpLeft,
            6 => Action::ShootUpRight,
            7 => Action::ShootDownLeft,
            8 => Action::ShootDownRight,
            _ => Action::Idle,
        }
    }

    /// Movement delta before normalization
    pub fn delta(self) -> (f32, f32) {
        match self {
            Action::Idle => (0.0, 0.0),
            Action::MoveLeft => (-1.0, 0.0),
            Action::MoveRight => (1.0, 0.0),
            Action::MoveUp => (0.0, -1.0),
            Action::MoveDown => (0.0, 1.0),
            Action::ShootUpLeft => (-1.0, -1.0),
            Action::ShootUpRight => (1.0, -1.0),
            Action::ShootDownLeft => (-1.0, 1.0),
            Action::ShootDownRight => (1.0, 1.0),
        }
    }

    /// Whether this action fires a bullet
    pub fn shoots(self) -> bool {
        matches!(
            self,
            Action::ShootUpLeft
                | Action::ShootUpRight
                | Action::ShootDownLeft
                | Action::ShootDownRight
        )
    }

    /// Whether this action is a pure movement action
    pub fn moves(self) -> bool {
        matches!(
            self,
            Action::MoveLeft | Action::MoveRight | Action::MoveUp | Action::MoveDown
        )
    }
}

/// Reward-shaping profile
///
/// Selects which persona-conditioned bonus terms apply on top of the shared
/// reward structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Persona {
    /// Rewards zero-damage ticks
    #[default]
    Survivor,
    /// Rewards newly visited rooms
    Explorer,
}

impl std::str::FromStr for Persona {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "survivor" => Ok(Persona::Survivor),
            "explorer" => Ok(Persona::Explorer),
            other => Err(anyhow::anyhow!("unknown persona: {other}")),
        }
    }
}

/// Power-up type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Temporary multiplicative speed boost
    Speed,
    /// Temporary multiplicative damage boost
    Damage,
}

/// Player state inside a [`Snapshot`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
    /// Remaining hit points
    pub hp: i32,
}

/// Live enemy inside a [`Snapshot`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySnapshot {
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
    /// Remaining hit points
    pub hp: f32,
}

/// Live bullet inside a [`Snapshot`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletSnapshot {
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
}

/// The engine's native state representation, pre-vectorization
///
/// One canonical structure shared by the engine and the wrapper; only live
/// entities appear.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Player position and health
    pub player: PlayerSnapshot,
    /// Live enemies
    pub enemies: Vec<EnemySnapshot>,
    /// Live bullets
    pub bullets: Vec<BulletSnapshot>,
    /// Indices of rooms visited so far, in visit order
    pub rooms_visited: Vec<usize>,
    /// Current room index
    pub room: usize,
    /// Ticks elapsed this episode
    pub steps: usize,
}

/// Drawable description of the current frame
///
/// Everything an external renderer needs: entity positions, HUD values, and
/// transient presentation state. [`super::render::rasterize`] consumes this
/// to produce the RGB buffer of the built-in software renderer.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Engine snapshot of the world
    pub snapshot: Snapshot,
    /// Power-ups currently on the floor
    pub powerups: Vec<super::PowerUp>,
    /// Whether the damage boost is active
    pub damage_boost: bool,
    /// Whether the speed boost is active
    pub speed_boost: bool,
    /// Accumulated shaped reward
    pub score: f32,
    /// Enemies killed this episode
    pub kills: usize,
    /// Death fade-out intensity in `[0, 1]`; 0 when alive
    pub death_fade: f32,
    /// Whether the win celebration is active
    pub won: bool,
    /// Confetti particles for the win celebration
    pub confetti: Vec<super::Confetti>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_from_index() {
        assert_eq!(Action::from_index(0), Action::Idle);
        assert_eq!(Action::from_index(1), Action::MoveLeft);
        assert_eq!(Action::from_index(4), Action::MoveDown);
        assert_eq!(Action::from_index(8), Action::ShootDownRight);
    }

    #[test]
    fn test_out_of_range_action_is_noop() {
        assert_eq!(Action::from_index(-1), Action::Idle);
        assert_eq!(Action::from_index(9), Action::Idle);
        assert_eq!(Action::from_index(i64::MAX), Action::Idle);
    }

    #[test]
    fn test_action_classification() {
        assert!(!Action::Idle.moves());
        assert!(!Action::Idle.shoots());
        assert!(Action::MoveUp.moves());
        assert!(!Action::MoveUp.shoots());
        assert!(Action::ShootUpLeft.shoots());
        assert!(!Action::ShootUpLeft.moves());
    }

    #[test]
    fn test_shoot_actions_have_diagonal_deltas() {
        for action in [
            Action::ShootUpLeft,
            Action::ShootUpRight,
            Action::ShootDownLeft,
            Action::ShootDownRight,
        ] {
            let (dx, dy) = action.delta();
            assert_ne!(dx, 0.0);
            assert_ne!(dy, 0.0);
        }
    }

    #[test]
    fn test_persona_parsing() {
        assert_eq!("survivor".parse::<Persona>().unwrap(), Persona::Survivor);
        assert_eq!("Explorer".parse::<Persona>().unwrap(), Persona::Explorer);
        assert!("speedrunner".parse::<Persona>().is_err());
    }
}

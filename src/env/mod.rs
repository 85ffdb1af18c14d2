//! Environment traits and implementations
//!
//! This module defines the core environment interface and provides
//! the built-in arena shooter environment.

use anyhow::Result;

/// Core trait for RL environments
pub trait Environment {
    /// Observation type
    type Observation;

    /// Action type
    type Action;

    /// Reset the environment and return initial observation
    ///
    /// Passing `Some(seed)` reseeds every random generator the instance owns,
    /// making the episode reproducible; `None` keeps the current generators.
    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Observation>;

    /// Step the environment with an action
    fn step(&mut self, action: Self::Action) -> Result<StepResult<Self::Observation>>;

    /// Get the observation space dimensions
    fn observation_space(&self) -> SpaceInfo;

    /// Get the action space dimensions
    fn action_space(&self) -> SpaceInfo;
}

/// Result of an environment step
#[derive(Debug, Clone)]
pub struct StepResult<O> {
    /// Next observation
    pub observation: O,

    /// Reward received
    pub reward: f32,

    /// Whether the episode terminated
    pub terminated: bool,

    /// Whether the episode was truncated
    pub truncated: bool,

    /// Additional info
    pub info: StepInfo,
}

/// Space information for observations and actions
#[derive(Debug, Clone)]
pub struct SpaceInfo {
    /// Shape of the space
    pub shape: Vec<usize>,

    /// Data type
    pub dtype: SpaceType,
}

/// Space data types
#[derive(Debug, Clone, Copy)]
pub enum SpaceType {
    /// Discrete space with n options
    Discrete(usize),

    /// Continuous space (Box)
    Continuous,

    /// Multi-discrete space
    MultiDiscrete,
}

/// Additional step information
///
/// Per-tick counters surfaced alongside the observation so an external
/// training loop can log combat outcomes without parsing the observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepInfo {
    /// Hit points the player lost this tick
    pub damage_taken: u32,

    /// Enemies that died this tick (each enemy is reported exactly once
    /// per episode)
    pub enemies_killed: usize,

    /// Enemies still alive after this tick
    pub enemies_alive: usize,
}

/// Errors surfaced to callers instead of being silently absorbed
///
/// Out-of-range actions are deliberately *not* errors — an untrusted policy
/// may emit unexpected indices during training, so they decode to a no-op.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    /// An operation that needs episode state was requested before `reset`
    #[error("environment not initialized: call reset() before {operation}")]
    NotInitialized {
        /// The operation that was attempted
        operation: &'static str,
    },
}

// Built-in environments will go in submodules
pub mod arena;
pub mod pool;

//! Vectorized environment pool for parallel execution
//!
//! This module provides parallel environment execution using Rayon.
//! Inspired by EnvPool (<https://arxiv.org/abs/2206.10558>), it steps
//! multiple independent environment instances concurrently. Instances
//! share nothing: each owns its entity set and its seeded generators, so
//! pooling whole replicas preserves per-instance determinism.
//!
//! # Example
//!
//! ```rust
//! use gauntlet_rl::env::pool::EnvPool;
//! use gauntlet_rl::env::arena::{ArenaEnv, EnvConfig};
//!
//! // Create pool with 4 parallel environments
//! let mut pool = EnvPool::new(|| ArenaEnv::new(EnvConfig::default()), 4);
//!
//! // Reset all environments with per-instance derived seeds
//! let observations = pool.reset(Some(42)).unwrap();
//! assert_eq!(observations.len(), 4);
//!
//! // Step all environments in parallel
//! let actions = vec![0, 1, 8, 3]; // One action per environment
//! let results = pool.step(&actions).unwrap();
//! assert_eq!(results.len(), 4);
//! ```

use anyhow::Result;
use rayon::prelude::*;

use crate::env::{Environment, SpaceInfo, StepResult};

/// A pool of environments for parallel execution
///
/// EnvPool manages multiple environment instances and executes operations
/// across them in parallel using Rayon's thread pool.
///
/// # Performance
///
/// For N environments with average step time T:
/// - Sequential: O(N * T)
/// - Parallel: O(max(T)) ≈ O(T) when N ≤ num_cores
pub struct EnvPool<E: Environment> {
    /// Vector of environment instances
    envs: Vec<E>,

    /// Number of environments
    num_envs: usize,
}

impl<E> EnvPool<E>
where
    E: Environment<Observation = Vec<f32>, Action = i64> + Send,
{
    /// Create a new environment pool
    ///
    /// # Arguments
    ///
    /// * `env_fn` - Factory function to create environment instances
    /// * `num_envs` - Number of parallel environments
    pub fn new<F>(env_fn: F, num_envs: usize) -> Self
    where
        F: Fn() -> E,
    {
        let envs = (0..num_envs).map(|_| env_fn()).collect();
        Self { envs, num_envs }
    }

    /// Reset all environments in parallel
    ///
    /// With `Some(base_seed)`, environment `i` is reseeded with
    /// `base_seed + i`, so pooled rollouts are reproducible while each
    /// instance still sees a distinct episode.
    pub fn reset(&mut self, base_seed: Option<u64>) -> Result<Vec<Vec<f32>>> {
        self.envs
            .par_iter_mut()
            .enumerate()
            .map(|(i, env)| env.reset(base_seed.map(|s| s + i as u64)))
            .collect()
    }

    /// Step all environments in parallel with given actions
    ///
    /// # Panics
    ///
    /// Panics if the number of actions doesn't match the number of
    /// environments.
    pub fn step(&mut self, actions: &[i64]) -> Result<Vec<StepResult<Vec<f32>>>> {
        assert_eq!(
            actions.len(),
            self.num_envs,
            "Number of actions must match number of environments"
        );

        self.envs
            .par_iter_mut()
            .zip(actions.par_iter())
            .map(|(env, &action)| env.step(action))
            .collect()
    }

    /// Get the number of environments in the pool
    pub fn num_envs(&self) -> usize {
        self.num_envs
    }

    /// Get observation space information from first environment
    pub fn observation_space(&self) -> SpaceInfo {
        self.envs[0].observation_space()
    }

    /// Get action space information from first environment
    pub fn action_space(&self) -> SpaceInfo {
        self.envs[0].action_space()
    }

    /// Reset a specific environment by index
    pub fn reset_env(&mut self, env_id: usize, seed: Option<u64>) -> Result<Vec<f32>> {
        self.envs[env_id].reset(seed)
    }

    /// Step all environments and return structured result
    ///
    /// This is a convenience method that unpacks individual StepResults
    /// into a single PoolStepResult with parallel vectors.
    pub fn step_structured(&mut self, actions: &[i64]) -> Result<PoolStepResult<Vec<f32>>> {
        let results = self.step(actions)?;

        let mut observations = Vec::with_capacity(self.num_envs);
        let mut rewards = Vec::with_capacity(self.num_envs);
        let mut terminated = Vec::with_capacity(self.num_envs);
        let mut truncated = Vec::with_capacity(self.num_envs);

        for result in results {
            observations.push(result.observation);
            rewards.push(result.reward);
            terminated.push(result.terminated);
            truncated.push(result.truncated);
        }

        Ok(PoolStepResult { observations, rewards, terminated, truncated })
    }
}

/// Result of stepping an environment pool
///
/// Contains observations, rewards, and done flags for all environments.
#[derive(Debug, Clone)]
pub struct PoolStepResult<O> {
    /// Observations for each environment
    pub observations: Vec<O>,

    /// Rewards for each environment
    pub rewards: Vec<f32>,

    /// Termination flags for each environment
    pub terminated: Vec<bool>,

    /// Truncation flags for each environment
    pub truncated: Vec<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::arena::{ArenaEnv, EnvConfig};

    fn make_env() -> ArenaEnv {
        ArenaEnv::new(EnvConfig::default())
    }

    #[test]
    fn test_pool_creation() {
        let pool = EnvPool::new(make_env, 4);
        assert_eq!(pool.num_envs(), 4);
    }

    #[test]
    fn test_pool_reset() {
        let mut pool = EnvPool::new(make_env, 4);
        let observations = pool.reset(Some(0)).unwrap();

        assert_eq!(observations.len(), 4);
        for obs in observations {
            assert_eq!(obs.len(), 20);
        }
    }

    #[test]
    fn test_pool_seeds_are_distinct() {
        let mut pool = EnvPool::new(make_env, 2);
        let observations = pool.reset(Some(100)).unwrap();

        // Same spawn point for the player, different enemy layouts
        assert_eq!(observations[0][0..3], observations[1][0..3]);
        assert_ne!(observations[0], observations[1], "derived seeds must differ per instance");
    }

    #[test]
    fn test_pool_step() {
        let mut pool = EnvPool::new(make_env, 4);
        pool.reset(Some(0)).unwrap();

        let actions = vec![0, 1, 8, 3];
        let results = pool.step(&actions).unwrap();

        assert_eq!(results.len(), 4);
        for result in results {
            assert_eq!(result.observation.len(), 20);
            assert!(!result.truncated);
        }
    }

    #[test]
    fn test_pool_step_structured() {
        let mut pool = EnvPool::new(make_env, 4);
        pool.reset(Some(0)).unwrap();

        let actions = vec![0, 1, 0, 1];
        let result = pool.step_structured(&actions).unwrap();

        assert_eq!(result.observations.len(), 4);
        assert_eq!(result.rewards.len(), 4);
        assert_eq!(result.terminated.len(), 4);
        assert_eq!(result.truncated.len(), 4);
    }

    #[test]
    #[should_panic(expected = "Number of actions must match number of environments")]
    fn test_pool_step_wrong_action_count() {
        let mut pool = EnvPool::new(make_env, 4);
        pool.reset(Some(0)).unwrap();

        let actions = vec![0, 1]; // Wrong number of actions
        pool.step(&actions).unwrap();
    }

    #[test]
    fn test_pool_multiple_steps() {
        let mut pool = EnvPool::new(make_env, 4);
        pool.reset(Some(0)).unwrap();

        for _ in 0..10 {
            let actions = vec![0, 1, 0, 1];
            let results = pool.step(&actions).unwrap();
            assert_eq!(results.len(), 4);
        }
    }

    #[test]
    fn test_pool_reset_env() {
        let mut pool = EnvPool::new(make_env, 4);
        pool.reset(Some(0)).unwrap();
        pool.step(&[1, 1, 1, 1]).unwrap();

        let obs = pool.reset_env(2, Some(7)).unwrap();
        assert_eq!(obs.len(), 20);
        assert_eq!(obs[0], 80.0, "reset instance starts back at the center");
    }

    #[test]
    fn test_pool_spaces() {
        let pool = EnvPool::new(make_env, 4);
        assert_eq!(pool.observation_space().shape, vec![20]);
        assert_eq!(pool.action_space().shape, Vec::<usize>::new());
    }
}

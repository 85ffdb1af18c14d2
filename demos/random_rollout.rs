//! Drive the arena environment with a random policy and dump the results
//!
//! Useful as a smoke test of the reset/step contract and as a template for
//! wiring the environment into an external training loop:
//!
//! ```text
//! cargo run --example random_rollout
//! ```

use anyhow::Result;
use gauntlet_rl::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn main() -> Result<()> {
    env_logger::init();

    let seed = 42_u64;
    let config = EnvConfig::default().persona(Persona::Explorer);
    config.validate()?;

    let mut env = ArenaEnv::new(config);
    let mut policy_rng = StdRng::seed_from_u64(seed);

    let mut obs = env.reset(Some(seed))?;
    println!("Initial observation: {obs:?}");
    println!();

    let mut total_reward = 0.0_f32;
    let mut ticks = 0;

    loop {
        let action = policy_rng.gen_range(0..9_i64);
        let result = env.step(action)?;
        total_reward += result.reward;
        ticks += 1;

        if ticks <= 5 {
            println!("Step {ticks}:");
            println!("  Action: {action}");
            println!("  Reward: {:.3}", result.reward);
            println!("  Enemies alive: {}", result.info.enemies_alive);
            println!("  Terminated: {}", result.terminated);
            println!();
        }

        obs = result.observation;

        if result.terminated {
            break;
        }
    }

    println!("Episode finished after {ticks} ticks");
    println!("  Total reward: {total_reward:.2}");
    println!("  Final score:  {:.2}", env.score());
    println!("  Final observation: {obs:?}");
    println!();
    println!("Episode metrics record:");
    println!("{}", env.metrics_json()?);

    Ok(())
}

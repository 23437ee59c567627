//! Episode loop, trial bookkeeping, and the optional hyperparameter
//! driver for the tail-sampling policy controller.
//!
//! This crate drives the closed loop that `sampler-core` provides the
//! domain logic for: sample an action from the policy-gradient agent,
//! materialize and roll out a collector configuration, wait for the
//! rollout to become ready, fetch the *previous* episode's traces,
//! score them, and update the agent. It threads the previous
//! experiment identifier explicitly through loop state rather than a
//! mutable field, so the causal separation between episodes is
//! enforceable by construction.
//!
//! ```rust,no_run
//! use sampler_loop::{EpisodeLoop, LoopConfig, LoopDependencies};
//!
//! # async fn run(deps: LoopDependencies) -> sampler_loop::Result<()> {
//! let config = LoopConfig::default();
//! let engine = EpisodeLoop::new(config, deps, "./trial-output");
//! let history = engine.run_trial(0, vec![0.5, 0.5, 0.5]).await?;
//! println!("mean reward: {}", history.mean_reward());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dependencies;
pub mod episode;
pub mod error;
pub mod health;
pub mod hyperdrive;
pub mod loop_engine;

pub use config::{EnvironmentConfig, LoopConfig};
pub use dependencies::LoopDependencies;
pub use episode::{EpisodeRecord, TrialHistory};
pub use error::{LoopError, Result};
pub use health::TrialStats;
pub use hyperdrive::{HyperSearchConfig, HyperSearchResult, HyperparameterDriver};
pub use loop_engine::{EpisodeLoop, SENTINEL_IDENTIFIER};

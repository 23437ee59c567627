//! Policy-gradient agent.
//!
//! Per-template independent Bernoulli probabilities, updated by
//! REINFORCE with an exponential moving-average baseline.

use crate::error::AgentError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

const THETA_MIN: f64 = 0.01;
const THETA_MAX: f64 = 0.99;

#[derive(Clone, Copy, Debug)]
pub struct AgentConfig {
    pub baseline_decay: f64,
    pub learning_rate: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentConfig {
    pub fn new() -> Self {
        Self {
            baseline_decay: 0.9,
            learning_rate: 0.1,
        }
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }
}

/// Saved/loaded agent state: theta vector plus the baseline, so a
/// resumed trial continues the moving average rather than restarting
/// it cold.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentState {
    pub theta: Vec<f64>,
    pub baseline: f64,
}

pub struct ReinforceAgent {
    config: AgentConfig,
    theta: Vec<f64>,
    baseline: f64,
    last_action: Vec<u8>,
}

impl ReinforceAgent {
    /// Build an agent from a seed vector (one probability per catalog
    /// entry; callers default to 0.5 per entry when no seed is given).
    pub fn from_seed(seed: Vec<f64>, config: AgentConfig) -> Self {
        let theta = seed.into_iter().map(clamp).collect::<Vec<_>>();
        let n = theta.len();
        Self {
            config,
            theta,
            baseline: 0.0,
            last_action: vec![0; n],
        }
    }

    pub fn catalog_len(&self) -> usize {
        self.theta.len()
    }

    pub fn theta(&self) -> &[f64] {
        &self.theta
    }

    /// Sample an action vector. Never returns all-zero: if every
    /// independent draw comes up zero, one index is chosen uniformly at
    /// random and forced on.
    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<u8> {
        let mut action: Vec<u8> = self
            .theta
            .iter()
            .map(|&p| if rng.gen::<f64>() < p { 1 } else { 0 })
            .collect();

        if action.iter().all(|&bit| bit == 0) && !action.is_empty() {
            let idx = rng.gen_range(0..action.len());
            action[idx] = 1;
        }

        self.last_action = action.clone();
        action
    }

    /// REINFORCE update with moving baseline. `reward` is the scalar
    /// from the reward function; called once per episode, including
    /// episode 1 with reward 0 (the previous-id sentinel case).
    pub fn update(&mut self, reward: f64) {
        self.baseline = self.config.baseline_decay * self.baseline
            + (1.0 - self.config.baseline_decay) * reward;
        let advantage = reward - self.baseline;

        for (theta_i, &action_i) in self.theta.iter_mut().zip(self.last_action.iter()) {
            let grad = action_i as f64 - *theta_i;
            *theta_i = clamp(*theta_i + self.config.learning_rate * advantage * grad);
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AgentError> {
        let state = AgentState {
            theta: self.theta.clone(),
            baseline: self.baseline,
        };
        let json = serde_json::to_string_pretty(&state)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(
        path: impl AsRef<Path>,
        catalog_len: usize,
        config: AgentConfig,
    ) -> Result<Self, AgentError> {
        let json = std::fs::read_to_string(path)?;
        let state: AgentState = serde_json::from_str(&json)?;
        if state.theta.len() != catalog_len {
            return Err(AgentError::SeedLengthMismatch {
                seed_len: state.theta.len(),
                catalog_len,
            });
        }
        Ok(Self {
            config,
            last_action: vec![0; state.theta.len()],
            theta: state.theta,
            baseline: state.baseline,
        })
    }
}

fn clamp(x: f64) -> f64 {
    x.clamp(THETA_MIN, THETA_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn clamp_keeps_theta_in_range_after_many_updates() {
        let mut agent = ReinforceAgent::from_seed(vec![0.5, 0.5, 0.5], AgentConfig::new());
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            agent.sample(&mut rng);
            agent.update(100.0);
        }
        for &t in agent.theta() {
            assert!((0.01..=0.99).contains(&t));
        }
    }

    #[test]
    fn sample_never_all_zero() {
        let mut agent =
            ReinforceAgent::from_seed(vec![0.01, 0.01, 0.01, 0.01], AgentConfig::new());
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let action = agent.sample(&mut rng);
            assert!(action.iter().any(|&b| b == 1));
        }
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theta.json");

        let mut agent = ReinforceAgent::from_seed(vec![0.3, 0.7], AgentConfig::new());
        let mut rng = StdRng::seed_from_u64(3);
        agent.sample(&mut rng);
        agent.update(0.5);
        agent.save(&path).unwrap();

        let loaded = ReinforceAgent::load(&path, 2, AgentConfig::new()).unwrap();
        assert_eq!(loaded.theta(), agent.theta());
    }

    #[test]
    fn load_rejects_mismatched_catalog_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theta.json");
        let agent = ReinforceAgent::from_seed(vec![0.5, 0.5], AgentConfig::new());
        agent.save(&path).unwrap();

        let err = ReinforceAgent::load(&path, 3, AgentConfig::new()).unwrap_err();
        assert!(matches!(err, AgentError::SeedLengthMismatch { .. }));
    }
}

//! Configuration for the episode loop.

use sampler_core::{AgentConfig, CanonConfig, CollectorConfig, RewardConfig};
use std::time::Duration;

/// Environment/orchestration knobs: trace-store host/index, namespace,
/// workload and config-map object names. These are plain data — the
/// host orchestrator and trace-store clients that consume them live
/// outside this crate; this struct only carries the values the real
/// clients would be constructed with.
#[derive(Clone, Debug)]
pub struct EnvironmentConfig {
    pub trace_store_host: String,
    pub trace_store_index: String,
    pub namespace: String,
    pub workload_name: String,
    pub config_map_name: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            trace_store_host: "http://elasticsearch:9200".to_string(),
            trace_store_index: "jaeger-span-*".to_string(),
            namespace: "default".to_string(),
            workload_name: "collector".to_string(),
            config_map_name: "collector-config".to_string(),
        }
    }
}

/// Top-level episode loop configuration: episode/trial counts, the
/// settle sleep, and the canonicalization/reward/agent/collector
/// sub-configs.
#[derive(Clone, Debug)]
pub struct LoopConfig {
    /// Episodes per trial.
    pub episodes_per_trial: usize,
    /// Independent trials to run.
    pub trials: usize,
    /// Sleep after each episode to let traces accumulate under the
    /// current identifier before the next episode's fetch.
    pub settle: Duration,
    /// Rényi entropy order (`ENTROPY_ALPHA`); 1.0 is Shannon.
    pub entropy_alpha: f64,
    pub reward: RewardConfig,
    pub canon: CanonConfig,
    pub agent: AgentConfig,
    pub collector: CollectorConfig,
    pub environment: EnvironmentConfig,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            episodes_per_trial: 20,
            trials: 1,
            settle: Duration::from_secs(60),
            entropy_alpha: 1.0,
            reward: RewardConfig::default(),
            canon: CanonConfig::default(),
            agent: AgentConfig::default(),
            collector: CollectorConfig::default(),
            environment: EnvironmentConfig::default(),
        }
    }
}

impl LoopConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_episodes_per_trial(mut self, n: usize) -> Self {
        self.episodes_per_trial = n;
        self
    }

    pub fn with_trials(mut self, k: usize) -> Self {
        self.trials = k;
        self
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Apply environment-variable overrides: `ENTROPY_ALPHA`,
    /// `QUANTIZE_MS`, `QUANTIZE_KEYS` (CSV), trace-store host/index,
    /// namespace, workload/config-map names. A single `std::env::var`
    /// pass applied over the defaults — not a config-file-parsing
    /// framework (see DESIGN.md for why `config`/`toml` were dropped
    /// from the dependency stack).
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("ENTROPY_ALPHA") {
            if let Ok(parsed) = v.parse() {
                self.entropy_alpha = parsed;
            }
        }
        if let Ok(v) = std::env::var("QUANTIZE_MS") {
            if let Ok(parsed) = v.parse() {
                self.canon = self.canon.clone().with_quantize_ms(parsed);
            }
        }
        if let Ok(v) = std::env::var("QUANTIZE_KEYS") {
            let keys: Vec<String> = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !keys.is_empty() {
                self.canon = self.canon.clone().with_quantize_keys(keys);
            }
        }
        if let Ok(v) = std::env::var("TRACE_STORE_HOST") {
            self.environment.trace_store_host = v;
        }
        if let Ok(v) = std::env::var("TRACE_STORE_INDEX") {
            self.environment.trace_store_index = v;
        }
        if let Ok(v) = std::env::var("COLLECTOR_NAMESPACE") {
            self.environment.namespace = v;
        }
        if let Ok(v) = std::env::var("COLLECTOR_WORKLOAD_NAME") {
            self.environment.workload_name = v;
        }
        if let Ok(v) = std::env::var("COLLECTOR_CONFIGMAP_NAME") {
            self.environment.config_map_name = v;
        }
        self
    }

    /// Validate episode/trial counts and the entropy order.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.episodes_per_trial == 0 {
            return Err(crate::error::LoopError::Configuration(
                "episodes_per_trial must be greater than 0".to_string(),
            ));
        }
        if self.trials == 0 {
            return Err(crate::error::LoopError::Configuration(
                "trials must be greater than 0".to_string(),
            ));
        }
        if self.entropy_alpha < 0.0 {
            return Err(crate::error::LoopError::Configuration(
                "entropy_alpha must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

//! Hyperparameter driver (optional outer loop).
//!
//! A small hand-rolled random search over the reward's scalar
//! coefficients `(alpha, beta)` that nests a short `EpisodeLoop` trial
//! per proposal and maximizes mean reward.

use crate::config::LoopConfig;
use crate::dependencies::LoopDependencies;
use crate::error::{LoopError, Result};
use crate::loop_engine::EpisodeLoop;
use rand::Rng;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug)]
pub struct HyperSearchConfig {
    /// Number of (alpha, beta) proposals to evaluate.
    pub proposals: usize,
    /// Episodes per nested trial.
    pub episodes_per_proposal: usize,
    pub alpha_range: (f64, f64),
    pub beta_range: (f64, f64),
}

impl Default for HyperSearchConfig {
    fn default() -> Self {
        Self {
            proposals: 30,
            episodes_per_proposal: 10,
            alpha_range: (0.1, 3.0),
            beta_range: (0.1, 3.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HyperSearchResult {
    pub alpha: f64,
    pub beta: f64,
    pub mean_reward: f64,
}

/// Outer loop: proposes `(alpha, beta)`, runs a short nested trial with
/// those coefficients, and keeps the best-scoring proposal.
pub struct HyperparameterDriver {
    base_config: LoopConfig,
    search: HyperSearchConfig,
    output_dir: PathBuf,
}

impl HyperparameterDriver {
    pub fn new(base_config: LoopConfig, search: HyperSearchConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_config,
            search,
            output_dir: output_dir.into(),
        }
    }

    /// Run the search. `deps_factory` constructs fresh dependencies per
    /// proposal (a production caller would reuse live client handles;
    /// tests typically hand back fresh fakes per call).
    pub async fn search(
        &self,
        deps_factory: impl Fn() -> LoopDependencies,
        seed: Vec<f64>,
    ) -> Result<HyperSearchResult> {
        let mut rng = rand::thread_rng();
        let mut best: Option<HyperSearchResult> = None;

        for proposal in 0..self.search.proposals {
            let alpha = rng.gen_range(self.search.alpha_range.0..=self.search.alpha_range.1);
            let beta = rng.gen_range(self.search.beta_range.0..=self.search.beta_range.1);

            let mut config = self.base_config.clone();
            config.reward.alpha = alpha;
            config.reward.beta = beta;
            config.episodes_per_trial = self.search.episodes_per_proposal;

            let proposal_dir = self.output_dir.join(format!("proposal_{proposal}"));
            let episode_loop = EpisodeLoop::new(config, deps_factory(), proposal_dir);
            let history = episode_loop.run_trial(proposal, seed.clone()).await?;
            let mean_reward = history.mean_reward();

            tracing::info!(proposal, alpha, beta, mean_reward, "hyperparameter proposal scored");

            if best.as_ref().is_none_or(|b| mean_reward > b.mean_reward) {
                best = Some(HyperSearchResult { alpha, beta, mean_reward });
            }
        }

        best.ok_or_else(|| LoopError::Configuration("no proposals evaluated".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sampler_core::{FetchError, OrchestratorClient, PolicyCatalog, RolloutError, Span, TraceStoreClient};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    struct UniformTraceStore;

    #[async_trait]
    impl TraceStoreClient for UniformTraceStore {
        async fn scroll(
            &self,
            identifier: &str,
            _cursor: Option<String>,
        ) -> std::result::Result<(Vec<Span>, Option<String>), FetchError> {
            if identifier == crate::loop_engine::SENTINEL_IDENTIFIER {
                return Ok((vec![], None));
            }
            let spans = (0..20)
                .map(|i| Span {
                    trace_id: Some(format!("t{i}")),
                    span_id: "root".to_string(),
                    parent_refs: vec![],
                    start_unix_nanos: 0,
                    service: format!("svc{}", i % 3),
                    operation: "op".to_string(),
                    tags: Default::default(),
                })
                .collect();
            Ok((spans, None))
        }
    }

    struct ImmediatelyReadyOrchestrator;

    #[async_trait]
    impl OrchestratorClient for ImmediatelyReadyOrchestrator {
        async fn push_config(&self, _document: &str) -> std::result::Result<(), RolloutError> {
            Ok(())
        }
        async fn patch_workload(&self, _identifier: &str) -> std::result::Result<(), RolloutError> {
            Ok(())
        }
        async fn replica_status(&self) -> std::result::Result<(u32, u32), RolloutError> {
            Ok((1, 1))
        }
    }

    fn catalog() -> PolicyCatalog {
        PolicyCatalog::new(vec![json!({"name": "p0", "type": "status_code"})])
    }

    #[tokio::test]
    async fn search_returns_the_best_scoring_proposal() {
        let base_config = LoopConfig::default().with_settle(Duration::from_millis(0));
        let search = HyperSearchConfig {
            proposals: 3,
            episodes_per_proposal: 2,
            alpha_range: (0.5, 0.5),
            beta_range: (0.1, 0.1),
        };
        let dir = tempfile::tempdir().unwrap();
        let driver = HyperparameterDriver::new(base_config, search, dir.path());

        let result = driver
            .search(
                || {
                    LoopDependencies::new(
                        Arc::new(UniformTraceStore),
                        Arc::new(ImmediatelyReadyOrchestrator),
                        catalog(),
                    )
                },
                vec![0.5],
            )
            .await
            .unwrap();

        assert_eq!(result.alpha, 0.5);
        assert_eq!(result.beta, 0.1);
    }
}

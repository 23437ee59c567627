//! Episode loop.
//!
//! Drives the per-trial sample -> actuate -> observe -> update cycle:
//! `sample -> build -> push_config -> patch_workload -> wait_ready ->
//! fetch(previous_id) -> canonicalize -> entropy -> reward -> update ->
//! sleep`, threading the "previous identifier" explicitly through loop
//! state rather than mutating a field in place, so the happens-before
//! ordering across episodes is enforceable by construction.

use crate::config::LoopConfig;
use crate::dependencies::LoopDependencies;
use crate::episode::{EpisodeRecord, TrialHistory};
use crate::error::Result;
use crate::health::TrialStats;
use sampler_core::{build_config, canonicalize, entropy, reward, ReinforceAgent, RolloutController, TraceFetcher};
use std::path::PathBuf;
use std::sync::Arc;

/// Sentinel "previous identifier" for episode 1: no traces have been
/// produced yet, so the fetch yields the empty list and the loop still
/// performs `agent.update(0)` so the baseline evolves smoothly — this
/// is designed behavior, not an edge case to special-case away.
pub const SENTINEL_IDENTIFIER: &str = "init";

/// Owns one trial's agent, fetcher and rollout controller, and drives
/// the episode sequence end to end. A fresh `EpisodeLoop::run_trial`
/// call gets a fresh agent: a new trial always starts cold.
pub struct EpisodeLoop {
    config: LoopConfig,
    deps: LoopDependencies,
    output_dir: PathBuf,
}

impl EpisodeLoop {
    pub fn new(config: LoopConfig, deps: LoopDependencies, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            deps,
            output_dir: output_dir.into(),
        }
    }

    /// Run one trial to completion. On any episode error
    /// (`TraceStoreUnavailable`/`OrchestratorError`) the trial aborts
    /// but the partial history accumulated so far is still persisted
    /// before the error is returned.
    pub async fn run_trial(&self, trial: usize, seed: Vec<f64>) -> Result<TrialHistory> {
        let mut agent = ReinforceAgent::from_seed(seed, self.config.agent);
        let fetcher = TraceFetcher::new(Arc::clone(&self.deps.trace_store));
        let mut rollout = RolloutController::new(Arc::clone(&self.deps.orchestrator));
        let mut rng = rand::thread_rng();

        let mut history = TrialHistory::new(trial);
        let mut previous_id = SENTINEL_IDENTIFIER.to_string();

        tracing::info!(trial, episodes = self.config.episodes_per_trial, "starting trial");

        for episode in 1..=self.config.episodes_per_trial {
            let outcome = self
                .run_episode(episode, &previous_id, &mut agent, &fetcher, &mut rollout, &mut rng)
                .await;

            match outcome {
                Ok((current_id, record)) => {
                    history.push(record);
                    previous_id = current_id;
                }
                Err(err) => {
                    tracing::error!(trial, episode, error = %err, "episode failed, aborting trial");
                    self.persist(trial, &history, &agent)?;
                    return Err(err);
                }
            }

            tokio::time::sleep(self.config.settle).await;
        }

        tracing::info!(
            trial,
            mean_reward = history.mean_reward(),
            "trial complete"
        );
        self.persist(trial, &history, &agent)?;
        Ok(history)
    }

    /// Run `self.config.trials` independent trials, each from the same
    /// seed; trials are independent Monte-Carlo replicates, so one
    /// trial's failure does not stop the others.
    pub async fn run_trials(&self, seed: Vec<f64>) -> Vec<Result<TrialStats>> {
        let mut results = Vec::with_capacity(self.config.trials);
        for trial in 0..self.config.trials {
            let outcome = self.run_trial(trial, seed.clone()).await;
            results.push(match outcome {
                Ok(history) => Ok(TrialStats::from_history(&history, false)),
                Err(err) => Err(err),
            });
        }
        results
    }

    async fn run_episode(
        &self,
        episode: usize,
        previous_id: &str,
        agent: &mut ReinforceAgent,
        fetcher: &TraceFetcher,
        rollout: &mut RolloutController,
        rng: &mut impl rand::Rng,
    ) -> Result<(String, EpisodeRecord)> {
        let action = agent.sample(rng);
        let selected = self.deps.catalog.select(&action);
        let (document, current_id) = build_config(&selected, &self.config.collector)?;

        tracing::info!(episode, identifier = %current_id, "rolling out configuration");
        rollout.roll(&document, &current_id).await?;

        let spans = fetcher.fetch_spans(previous_id).await?;
        let signatures = canonicalize(&spans, &self.config.canon);
        let sigs: Vec<&str> = signatures.values().map(String::as_str).collect();
        let trace_count = sigs.len();
        let h = entropy(sigs, self.config.entropy_alpha);
        let r = reward(h, trace_count, &self.config.reward);

        tracing::info!(
            episode,
            previous_identifier = previous_id,
            entropy = h,
            trace_count,
            reward = r,
            "episode scored"
        );

        // Applied even for episode 1's sentinel/zero-trace case: the
        // baseline must still evolve.
        agent.update(r);

        let record = EpisodeRecord {
            episode,
            previous_identifier: previous_id.to_string(),
            reward: r,
            entropy: h,
            trace_count,
            action,
        };

        Ok((current_id, record))
    }

    fn persist(&self, trial: usize, history: &TrialHistory, agent: &ReinforceAgent) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        history.save(&self.output_dir)?;
        let theta_path = self.output_dir.join(format!("theta_trial_{trial}.json"));
        agent.save(theta_path)?;
        Ok(())
    }
}

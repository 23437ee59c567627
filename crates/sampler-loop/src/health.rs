//! Statistics summarizing an episode loop's progress.
//!
//! Fitted to a trial's fixed-length episode sequence rather than an
//! unbounded running loop: there is no `Running`/`Paused`/`Error` state
//! machine here, just a summary of one trial's progress and whether it
//! completed or aborted (an aborted trial still persists its partial
//! history).

use crate::episode::TrialHistory;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrialStats {
    pub trial: usize,
    pub episodes_completed: usize,
    pub mean_reward: f64,
    pub mean_entropy: f64,
    pub last_reward: Option<f64>,
    /// Set when the trial ended early on `TraceStoreUnavailable` or
    /// `OrchestratorError` rather than exhausting its episode budget.
    pub aborted: bool,
}

impl TrialStats {
    pub fn from_history(history: &TrialHistory, aborted: bool) -> Self {
        let episodes_completed = history.episodes.len();
        let mean_entropy = if episodes_completed == 0 {
            0.0
        } else {
            history.episodes.iter().map(|e| e.entropy).sum::<f64>() / episodes_completed as f64
        };

        Self {
            trial: history.trial,
            episodes_completed,
            mean_reward: history.mean_reward(),
            mean_entropy,
            last_reward: history.episodes.last().map(|e| e.reward),
            aborted,
        }
    }
}

//! Episode and trial bookkeeping.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One episode's record: episode index, previous identifier, reward,
/// entropy, trace count, and action vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: usize,
    pub previous_identifier: String,
    pub reward: f64,
    pub entropy: f64,
    pub trace_count: usize,
    pub action: Vec<u8>,
}

/// Append-only history for one trial, persisted at trial end.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrialHistory {
    pub trial: usize,
    pub episodes: Vec<EpisodeRecord>,
}

impl TrialHistory {
    pub fn new(trial: usize) -> Self {
        Self {
            trial,
            episodes: Vec::new(),
        }
    }

    pub fn push(&mut self, record: EpisodeRecord) {
        self.episodes.push(record);
    }

    pub fn mean_reward(&self) -> f64 {
        if self.episodes.is_empty() {
            return 0.0;
        }
        self.episodes.iter().map(|e| e.reward).sum::<f64>() / self.episodes.len() as f64
    }

    /// Persist this trial's history as a JSON array; the file name
    /// embeds the trial index.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let path = dir.as_ref().join(format!("episodes_trial_{}.json", self.trial));
        let json = serde_json::to_string_pretty(&self.episodes)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a previously persisted trial's episode records back.
    pub fn load(dir: impl AsRef<Path>, trial: usize) -> Result<Self> {
        let path = dir.as_ref().join(format!("episodes_trial_{trial}.json"));
        let json = std::fs::read_to_string(path)?;
        let episodes: Vec<EpisodeRecord> = serde_json::from_str(&json)?;
        Ok(Self { trial, episodes })
    }
}

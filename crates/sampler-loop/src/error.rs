//! Error types for the episode loop.
//!
//! Follows the same narrow-enum-per-concern pattern as
//! `sampler_core::error`, composed into one umbrella `LoopError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoopError {
    #[error(transparent)]
    Fetch(#[from] sampler_core::FetchError),
    #[error(transparent)]
    ConfigBuild(#[from] sampler_core::ConfigBuildError),
    #[error(transparent)]
    Rollout(#[from] sampler_core::RolloutError),
    #[error(transparent)]
    Agent(#[from] sampler_core::AgentError),
    #[error(transparent)]
    Catalog(#[from] sampler_core::CatalogError),
    #[error("io error persisting trial output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to (de)serialize episode history: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid loop configuration: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, LoopError>;

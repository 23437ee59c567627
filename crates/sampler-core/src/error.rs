//! Error types for the controller core.
//!
//! Each module gets its own narrow error enum; `SamplerError` is the
//! umbrella type the episode loop actually propagates.

use thiserror::Error;

/// Failures reading spans from the trace store.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("trace store unavailable: {0}")]
    TraceStoreUnavailable(String),
}

/// Failures building a collector configuration document.
#[derive(Debug, Error)]
pub enum ConfigBuildError {
    #[error("failed to serialize collector config: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Failures pushing configuration or waiting on rollout.
#[derive(Debug, Error)]
pub enum RolloutError {
    #[error("orchestrator error: {0}")]
    Orchestrator(String),
}

/// Failures loading or saving agent state.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("failed to (de)serialize agent state: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("failed to read or write agent state file: {0}")]
    Io(#[from] std::io::Error),
    #[error("seed length {seed_len} does not match catalog length {catalog_len}")]
    SeedLengthMismatch { seed_len: usize, catalog_len: usize },
}

/// Failures loading the policy catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read or parse policy catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse policy catalog json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("policy catalog is empty")]
    Empty,
}

/// Top-level error the episode loop surfaces to its caller.
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    ConfigBuild(#[from] ConfigBuildError),
    #[error(transparent)]
    Rollout(#[from] RolloutError),
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("io error persisting trial output: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SamplerError>;

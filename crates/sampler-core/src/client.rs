//! Abstract collaborator interfaces.
//!
//! The host orchestrator and the trace store are not implemented in
//! this crate: it depends only on these two traits. Production code
//! wires real clients in; tests wire fakes.

use crate::error::{FetchError, RolloutError};
use crate::span::Span;
use async_trait::async_trait;

/// Read access to the trace store.
#[async_trait]
pub trait TraceStoreClient: Send + Sync {
    /// Pull one page of spans tagged `experiment_hash = identifier`,
    /// starting a new scroll cursor if `cursor` is `None`. Returns the
    /// page of spans and the cursor to pass on the next call, or `None`
    /// once the scroll is exhausted.
    async fn scroll(
        &self,
        identifier: &str,
        cursor: Option<String>,
    ) -> std::result::Result<(Vec<Span>, Option<String>), FetchError>;
}

/// Orchestrator operations the rollout controller needs: upsert a
/// config object, patch a workload's pod template, and read replica
/// counts.
#[async_trait]
pub trait OrchestratorClient: Send + Sync {
    /// Create or replace the named configuration object.
    async fn push_config(&self, document: &str) -> std::result::Result<(), RolloutError>;

    /// Stamp the workload's pod template with `config-hash = identifier`,
    /// triggering a rolling restart.
    async fn patch_workload(&self, identifier: &str) -> std::result::Result<(), RolloutError>;

    /// Current (desired, available) replica counts for the workload.
    async fn replica_status(&self) -> std::result::Result<(u32, u32), RolloutError>;
}

//! Dependency injection for the episode loop.
//!
//! Bundles the two external-collaborator traits plus the policy
//! catalog into a single value the `EpisodeLoop` owns, rather than
//! threading them through as ambient globals.

use sampler_core::{OrchestratorClient, PolicyCatalog, TraceStoreClient};
use std::sync::Arc;

pub struct LoopDependencies {
    pub trace_store: Arc<dyn TraceStoreClient>,
    pub orchestrator: Arc<dyn OrchestratorClient>,
    pub catalog: PolicyCatalog,
}

impl LoopDependencies {
    pub fn new(
        trace_store: Arc<dyn TraceStoreClient>,
        orchestrator: Arc<dyn OrchestratorClient>,
        catalog: PolicyCatalog,
    ) -> Self {
        Self {
            trace_store,
            orchestrator,
            catalog,
        }
    }
}

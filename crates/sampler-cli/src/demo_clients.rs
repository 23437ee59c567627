//! Stand-in `TraceStoreClient`/`OrchestratorClient` implementations.
//!
//! Real trace-store and orchestrator endpoints are out of scope here:
//! this binary wires these in so `sampler run`/`sampler search` have
//! something to drive end to end without a live collector deployment.
//! Swap these out for real HTTP clients at this seam when one exists.

use async_trait::async_trait;
use rand::Rng;
use sampler_core::{FetchError, OrchestratorClient, RolloutError, Span, TagValue, TraceStoreClient};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// Generates a synthetic batch of spans per `scroll` call: a mix of a
/// handful of repeating route/status shapes so canonicalization and
/// entropy estimation have something non-degenerate to chew on.
pub struct SyntheticTraceStore {
    pub batch_size: usize,
    pub distinct_routes: usize,
}

impl SyntheticTraceStore {
    pub fn new(batch_size: usize, distinct_routes: usize) -> Self {
        Self {
            batch_size,
            distinct_routes: distinct_routes.max(1),
        }
    }
}

#[async_trait]
impl TraceStoreClient for SyntheticTraceStore {
    async fn scroll(
        &self,
        identifier: &str,
        _cursor: Option<String>,
    ) -> Result<(Vec<Span>, Option<String>), FetchError> {
        if identifier == sampler_loop::SENTINEL_IDENTIFIER {
            return Ok((vec![], None));
        }

        let mut rng = rand::thread_rng();
        let mut spans = Vec::with_capacity(self.batch_size);
        for i in 0..self.batch_size {
            let route = format!("route-{}", i % self.distinct_routes);
            let mut tags = HashMap::new();
            tags.insert("route".to_string(), TagValue::Text(route.clone()));
            tags.insert(
                "status_code".to_string(),
                TagValue::Number(if rng.gen_bool(0.9) { 200.0 } else { 500.0 }),
            );
            tags.insert(
                "duration_ms".to_string(),
                TagValue::Number(rng.gen_range(10.0..400.0)),
            );
            spans.push(Span {
                trace_id: Some(format!("synthetic-{identifier}-{i}")),
                span_id: "root".to_string(),
                parent_refs: vec![],
                start_unix_nanos: i as i64,
                service: "frontend".to_string(),
                operation: route,
                tags,
            });
        }
        Ok((spans, None))
    }
}

/// Reports ready after a fixed number of polls, so `rollout.roll`
/// exercises its poll loop without needing a live replica set.
pub struct FixedDelayOrchestrator {
    polls_until_ready: u32,
    poll_count: AtomicU32,
}

impl FixedDelayOrchestrator {
    pub fn new(polls_until_ready: u32) -> Self {
        Self {
            polls_until_ready,
            poll_count: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl OrchestratorClient for FixedDelayOrchestrator {
    async fn push_config(&self, _document: &str) -> Result<(), RolloutError> {
        Ok(())
    }

    async fn patch_workload(&self, _identifier: &str) -> Result<(), RolloutError> {
        Ok(())
    }

    async fn replica_status(&self) -> Result<(u32, u32), RolloutError> {
        let count = self.poll_count.fetch_add(1, Ordering::SeqCst);
        if count >= self.polls_until_ready {
            Ok((1, 1))
        } else {
            Ok((1, 0))
        }
    }
}

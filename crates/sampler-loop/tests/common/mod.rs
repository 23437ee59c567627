//! Shared fakes for the episode loop's end-to-end scenario tests.
//!
//! Hand-written fake `TraceStoreClient`/`OrchestratorClient`
//! implementations, matching the rest of this codebase's preference
//! for small purpose-built mocks over a generic mocking crate.

use async_trait::async_trait;
use sampler_core::{FetchError, OrchestratorClient, RolloutError, Span, TagValue, TraceStoreClient};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// One repeatable trace shape: the `variant` tag is the only thing that
/// differs between groups, so the canonicalizer sees `count` identical
/// copies of the same structure per group.
pub struct TraceGroup {
    pub variant: String,
    pub count: usize,
}

/// Returns the empty span list for the sentinel identifier, and a fixed
/// set of trace groups for every other identifier, so tests can control
/// both the distinct-structure count and the total trace count.
pub struct FixedBatchTraceStore {
    pub groups: Vec<TraceGroup>,
}

impl FixedBatchTraceStore {
    pub fn uniform(trace_count: usize) -> Self {
        Self {
            groups: vec![TraceGroup {
                variant: "uniform".to_string(),
                count: trace_count,
            }],
        }
    }

    pub fn distinct_structures(distinct: usize) -> Self {
        Self {
            groups: (0..distinct)
                .map(|i| TraceGroup {
                    variant: format!("structure-{i}"),
                    count: 1,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl TraceStoreClient for FixedBatchTraceStore {
    async fn scroll(
        &self,
        identifier: &str,
        _cursor: Option<String>,
    ) -> Result<(Vec<Span>, Option<String>), FetchError> {
        if identifier == sampler_loop::SENTINEL_IDENTIFIER {
            return Ok((vec![], None));
        }
        let mut spans = Vec::new();
        let mut counter = 0usize;
        for group in &self.groups {
            for _ in 0..group.count {
                let mut tags = HashMap::new();
                tags.insert("route".to_string(), TagValue::Text(group.variant.clone()));
                spans.push(Span {
                    trace_id: Some(format!("trace-{counter}")),
                    span_id: "root".to_string(),
                    parent_refs: vec![],
                    start_unix_nanos: counter as i64,
                    service: "frontend".to_string(),
                    operation: group.variant.clone(),
                    tags,
                });
                counter += 1;
            }
        }
        Ok((spans, None))
    }
}

/// Orchestrator fake that reports ready after a configurable number of
/// polls, counting polls across the whole fake's lifetime.
pub struct SteppedOrchestrator {
    pub polls_until_ready: u32,
    poll_count: AtomicU32,
}

impl SteppedOrchestrator {
    pub fn new(polls_until_ready: u32) -> Self {
        Self {
            polls_until_ready,
            poll_count: AtomicU32::new(0),
        }
    }

    pub fn immediately_ready() -> Self {
        Self::new(0)
    }
}

#[async_trait]
impl OrchestratorClient for SteppedOrchestrator {
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

//! Trace canonicalizer.
//!
//! Groups spans by trace id, rebuilds the parent/child tree, walks it
//! depth-first in a deterministic order, and hashes the resulting
//! string into a signature. Children are stored as span-id references
//! into the trace's own span map, never as back-pointers, so the
//! structure is a pure tree with no ownership cycles.

use crate::span::{Span, TagValue};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Clone, Debug)]
pub struct CanonConfig {
    /// Tag keys stripped before serialization.
    pub blacklist: HashSet<String>,
    /// Tag keys whose numeric values are bucketed to the nearest
    /// `quantize_ms` milliseconds before serialization.
    pub quantize_keys: HashSet<String>,
    /// Bucket width in milliseconds.
    pub quantize_ms: f64,
}

impl Default for CanonConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CanonConfig {
    pub fn new() -> Self {
        Self {
            blacklist: [
                "status_code",
                "thread.id",
                "net.peer.port",
                "user.id",
                "order.id",
                "http.status_code",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            quantize_keys: [
                "duration_ms",
                "latency_ms",
                "http.duration_ms",
                "db.duration_ms",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            quantize_ms: 200.0,
        }
    }

    pub fn with_blacklist(mut self, keys: impl IntoIterator<Item = String>) -> Self {
        self.blacklist = keys.into_iter().collect();
        self
    }

    pub fn with_quantize_keys(mut self, keys: impl IntoIterator<Item = String>) -> Self {
        self.quantize_keys = keys.into_iter().collect();
        self
    }

    pub fn with_quantize_ms(mut self, ms: f64) -> Self {
        self.quantize_ms = ms;
        self
    }

    fn quantize(&self, bucket_ms: f64, value: f64) -> f64 {
        (value / bucket_ms).round() * bucket_ms
    }
}

/// Canonicalize a span multiset into `trace_id -> signature`.
pub fn canonicalize(spans: &[Span], config: &CanonConfig) -> BTreeMap<String, String> {
    let mut by_trace: BTreeMap<String, Vec<&Span>> = BTreeMap::new();
    for span in spans {
        if let Some(trace_id) = &span.trace_id {
            by_trace.entry(trace_id.clone()).or_default().push(span);
        }
    }

    by_trace
        .into_iter()
        .map(|(trace_id, trace_spans)| {
            let canonical = canonicalize_trace(&trace_spans, config);
            let mut hasher = Sha256::new();
            hasher.update(canonical.as_bytes());
            (trace_id, hex::encode(hasher.finalize()))
        })
        .collect()
}

fn canonicalize_trace(spans: &[&Span], config: &CanonConfig) -> String {
    let by_id: HashMap<&str, &Span> = spans.iter().map(|s| (s.span_id.as_str(), *s)).collect();

    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut roots: Vec<&str> = Vec::new();
    for span in spans {
        match span.parent_id() {
            Some(parent_id) if by_id.contains_key(parent_id) => {
                children.entry(parent_id).or_default().push(&span.span_id);
            }
            _ => roots.push(&span.span_id),
        }
    }

    let sort_siblings = |ids: &mut Vec<&str>| {
        ids.sort_by(|a, b| {
            let sa = by_id[a].start_unix_nanos;
            let sb = by_id[b].start_unix_nanos;
            sa.cmp(&sb).then_with(|| a.cmp(b))
        });
    };
    sort_siblings(&mut roots);
    for ids in children.values_mut() {
        sort_siblings(ids);
    }

    let mut out = String::new();
    for root in &roots {
        walk(root, 0, &by_id, &children, config, &mut out);
    }
    out
}

fn walk(
    span_id: &str,
    depth: usize,
    by_id: &HashMap<&str, &Span>,
    children: &HashMap<&str, Vec<&str>>,
    config: &CanonConfig,
    out: &mut String,
) {
    let span = by_id[span_id];
    let indent = "  ".repeat(depth);

    let mut tags: Vec<(&String, &TagValue)> = span
        .tags
        .iter()
        .filter(|(k, _)| !config.blacklist.contains(k.as_str()))
        .collect();
    tags.sort_by(|a, b| a.0.cmp(b.0));

    out.push_str(&indent);
    out.push_str(&span.service);
    out.push(':');
    out.push_str(&span.operation);
    for (key, value) in tags {
        out.push('|');
        out.push_str(key);
        out.push('=');
        match value {
            TagValue::Number(n) if config.quantize_keys.contains(key.as_str()) => {
                let bucketed = config.quantize(config.quantize_ms, *n);
                out.push_str(&TagValue::Number(bucketed).to_string());
            }
            other => out.push_str(&other.to_string()),
        }
    }
    out.push('\n');

    if let Some(kids) = children.get(span_id) {
        for child in kids {
            walk(child, depth + 1, by_id, children, config, out);
        }
    }
}

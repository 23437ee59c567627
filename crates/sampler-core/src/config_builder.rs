//! Config builder.
//!
//! Renders the collector configuration document and stamps it with a
//! fresh experiment identifier. The document shape (key names, nesting)
//! is pinned by the external collector's own config contract; only
//! `num_traces`, `expected_new_traces_per_sec`, `decision_wait` and the
//! trace sink endpoint are configurable.

use crate::error::ConfigBuildError;
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Clone, Debug)]
pub struct CollectorConfig {
    pub otlp_http_endpoint: String,
    pub decision_wait: String,
    pub num_traces: u32,
    pub expected_new_traces_per_sec: u32,
    pub trace_sink_endpoint: String,
    pub prometheus_endpoint: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectorConfig {
    pub fn new() -> Self {
        Self {
            otlp_http_endpoint: "0.0.0.0:4321".to_string(),
            decision_wait: "10s".to_string(),
            num_traces: 2_000,
            expected_new_traces_per_sec: 100,
            trace_sink_endpoint: "http://jaeger:4318".to_string(),
            prometheus_endpoint: "0.0.0.0:9464".to_string(),
        }
    }
}

#[derive(Serialize)]
struct Receivers {
    otlp: OtlpReceiver,
}

#[derive(Serialize)]
struct OtlpReceiver {
    protocols: OtlpProtocols,
}

#[derive(Serialize)]
struct OtlpProtocols {
    http: HttpProtocol,
}

#[derive(Serialize)]
struct HttpProtocol {
    endpoint: String,
}

#[derive(Serialize)]
struct Processors {
    tail_sampling: TailSampling,
    attributes: Attributes,
}

#[derive(Serialize)]
struct TailSampling {
    decision_wait: String,
    num_traces: u32,
    expected_new_traces_per_sec: u32,
    policies: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct Attributes {
    actions: Vec<AttributeAction>,
}

#[derive(Serialize)]
struct AttributeAction {
    key: String,
    value: String,
    action: String,
}

#[derive(Serialize)]
struct Exporters {
    debug: DebugExporter,
    otlphttp: OtlpHttpExporter,
    prometheus: PrometheusExporter,
}

#[derive(Serialize)]
struct DebugExporter {
    verbosity: String,
}

#[derive(Serialize)]
struct OtlpHttpExporter {
    endpoint: String,
}

#[derive(Serialize)]
struct PrometheusExporter {
    endpoint: String,
}

#[derive(Serialize)]
struct Service {
    pipelines: Pipelines,
}

#[derive(Serialize)]
struct Pipelines {
    traces: Pipeline,
    metrics: Pipeline,
}

#[derive(Serialize)]
struct Pipeline {
    receivers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    processors: Option<Vec<String>>,
    exporters: Vec<String>,
}

#[derive(Serialize)]
struct Document {
    receivers: Receivers,
    processors: Processors,
    exporters: Exporters,
    service: Service,
}

/// Compute the 8-hex-digit experiment identifier from the canonical
/// JSON serialization of `selected_policies` plus the current
/// wall-clock.
fn experiment_identifier(selected_policies: &[serde_json::Value]) -> String {
    let canonical = serde_json::to_string(&sorted_value(selected_policies))
        .expect("Vec<Value> always serializes");
    let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or(0).to_string();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hasher.update(timestamp.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..8].to_string()
}

/// Re-encode a JSON value with object keys sorted, so serialization is
/// stable regardless of input key order.
fn sorted_value(policies: &[serde_json::Value]) -> serde_json::Value {
    serde_json::Value::Array(policies.iter().map(sort_keys).collect())
}

fn sort_keys(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut sorted = serde_json::Map::new();
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                sorted.insert(key.clone(), sort_keys(&map[key]));
            }
            serde_json::Value::Object(sorted)
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(sort_keys).collect())
        }
        other => other.clone(),
    }
}

/// Build the collector configuration document and its fresh
/// experiment identifier.
pub fn build(
    selected_policies: &[serde_json::Value],
    config: &CollectorConfig,
) -> Result<(String, String), ConfigBuildError> {
    let identifier = experiment_identifier(selected_policies);

    let document = Document {
        receivers: Receivers {
            otlp: OtlpReceiver {
                protocols: OtlpProtocols {
                    http: HttpProtocol {
                        endpoint: config.otlp_http_endpoint.clone(),
                    },
                },
            },
        },
        processors: Processors {
            tail_sampling: TailSampling {
                decision_wait: config.decision_wait.clone(),
                num_traces: config.num_traces,
                expected_new_traces_per_sec: config.expected_new_traces_per_sec,
                policies: selected_policies.to_vec(),
            },
            attributes: Attributes {
                actions: vec![AttributeAction {
                    key: "experiment_hash".to_string(),
                    value: identifier.clone(),
                    action: "insert".to_string(),
                }],
            },
        },
        exporters: Exporters {
            debug: DebugExporter {
                verbosity: "detailed".to_string(),
            },
            otlphttp: OtlpHttpExporter {
                endpoint: config.trace_sink_endpoint.clone(),
            },
            prometheus: PrometheusExporter {
                endpoint: config.prometheus_endpoint.clone(),
            },
        },
        service: Service {
            pipelines: Pipelines {
                traces: Pipeline {
                    receivers: vec!["otlp".to_string()],
                    processors: Some(vec!["tail_sampling".to_string(), "attributes".to_string()]),
                    exporters: vec!["otlphttp".to_string()],
                },
                metrics: Pipeline {
                    receivers: vec!["otlp".to_string()],
                    processors: None,
                    exporters: vec!["prometheus".to_string()],
                },
            },
        },
    };

    let yaml = serde_yaml::to_string(&document)?;
    Ok((yaml, identifier))
}

//! Span and tag types shared by the fetcher and canonicalizer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tag value as carried on a span. The canonicalizer only cares
/// whether a value is numeric (for quantization) or not.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for TagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            TagValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One span as pulled from the trace store.
///
/// `parent_refs` holds every `CHILD_OF`-style parent reference found on
/// the span, in the order the store returned them; only the first is
/// used.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Span {
    pub trace_id: Option<String>,
    pub span_id: String,
    pub parent_refs: Vec<String>,
    pub start_unix_nanos: i64,
    pub service: String,
    pub operation: String,
    pub tags: HashMap<String, TagValue>,
}

impl Span {
    /// First `CHILD_OF` parent reference, if any.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_refs.first().map(String::as_str)
    }
}

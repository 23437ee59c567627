//! Policy catalog.
//!
//! The catalog is an ordered sequence of opaque tail-sampling policy
//! templates loaded once from an external JSON document. Only the
//! ordinal index matters to the agent; the template body is copied
//! verbatim into generated configurations.

use crate::error::CatalogError;
use serde_json::json;
use std::path::Path;

/// Catalog of policy templates plus the mandatory default fallback
/// template appended to every selected policy set.
#[derive(Clone, Debug)]
pub struct PolicyCatalog {
    templates: Vec<serde_json::Value>,
    default_fallback: serde_json::Value,
}

impl PolicyCatalog {
    /// Build a catalog from already-parsed templates, using the
    /// built-in default fallback (a low-rate probabilistic sampler).
    pub fn new(templates: Vec<serde_json::Value>) -> Self {
        Self {
            templates,
            default_fallback: default_fallback_template(),
        }
    }

    /// Override the default fallback template.
    pub fn with_default_fallback(mut self, fallback: serde_json::Value) -> Self {
        self.default_fallback = fallback;
        self
    }

    /// Load the catalog from a JSON array file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let templates: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
        if templates.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self::new(templates))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn templates(&self) -> &[serde_json::Value] {
        &self.templates
    }

    /// Materialize the selected policy set from an action vector: every
    /// template whose bit is 1, plus the default fallback appended
    /// unconditionally.
    pub fn select(&self, action: &[u8]) -> Vec<serde_json::Value> {
        let mut selected: Vec<serde_json::Value> = self
            .templates
            .iter()
            .zip(action)
            .filter(|(_, &bit)| bit == 1)
            .map(|(template, _)| template.clone())
            .collect();
        selected.push(self.default_fallback.clone());
        selected
    }
}

fn default_fallback_template() -> serde_json::Value {
    json!({
        "name": "default-probabilistic-policy",
        "type": "probabilistic",
        "probabilistic": { "sampling_percentage": 10.0 }
    })
}

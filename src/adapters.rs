//! Output adapters over the canonical pipeline result
//!
//! Two views for two transports: the HTTP surface returns the canonical
//! result untouched, the RPC surface needs a flat string-to-string map to
//! satisfy its fixed response schema.

use serde_json::Value;
use std::collections::HashMap;

/// Identity view for the HTTP surface.
pub fn to_json(result: &Value) -> Value {
    result.clone()
}

/// Canonical, locale-independent textual rendering of a JSON value.
///
/// Strings render bare (no surrounding quotes); everything else renders as
/// its compact JSON text, so nested structures stay machine-readable.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Flatten the canonical result for the RPC response schema.
///
/// Objects keep every key with stringified values; any other shape collapses
/// to a single `result` entry.
pub fn to_flat_map(result: &Value) -> HashMap<String, String> {
    match result.as_object() {
        Some(map) => map
            .iter()
            .map(|(key, value)| (key.clone(), stringify(value)))
            .collect(),
        None => HashMap::from([("result".to_string(), stringify(result))]),
    }
}

//! Response normalization for the two known Airia envelope shapes
//!
//! The upstream API has answered in two structurally incompatible formats
//! over its lifetime. Both wrap the actual pipeline result as a JSON-encoded
//! string that has to be re-parsed. Classification is ordered: a string
//! `result` field wins outright, the `output` tree is only probed when no
//! such field exists, and anything else is unrecognized.

use serde_json::Value;

use crate::error::{GatewayError, Result};

/// The two recognized envelope shapes, reduced to their embedded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// Newer format: a JSON-encoded string under a top-level `result` field.
    Result(String),
    /// Older format: `output[0].content[0].text` holds the JSON-encoded string.
    Output(String),
}

/// How to treat an embedded `result` string that is not valid JSON.
///
/// The two front-ends genuinely disagree here: the HTTP surface re-raises the
/// parse failure, the RPC surface keeps the raw string as the result. Kept as
/// two named policies until the owners decide which one is the bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePolicy {
    /// Embedded-string parse failure is an error (HTTP surface).
    Strict,
    /// Embedded-string parse failure falls back to the literal string (RPC surface).
    Lenient,
}

/// Classify a decoded upstream body into one of the known shapes.
///
/// First match wins; an envelope carrying a string `result` is never
/// inspected for `output`. A `result` field of any other type falls through
/// to the `output` probe.
pub fn classify(envelope: &Value) -> Result<Envelope> {
    if let Some(raw) = envelope.get("result").and_then(Value::as_str) {
        return Ok(Envelope::Result(raw.to_string()));
    }

    if let Some(text) = envelope
        .get("output")
        .and_then(Value::as_array)
        .and_then(|output| output.first())
        .and_then(|first| first.get("content"))
        .and_then(Value::as_array)
        .and_then(|content| content.first())
        .and_then(|first| first.get("text"))
        .and_then(Value::as_str)
    {
        return Ok(Envelope::Output(text.to_string()));
    }

    Err(GatewayError::UnrecognizedFormat {
        envelope: envelope.clone(),
    })
}

/// Extract and re-parse the embedded payload, yielding the canonical result.
///
/// The result may be any JSON value; callers must not assume an object.
pub fn normalize(envelope: &Value, policy: ParsePolicy) -> Result<Value> {
    match classify(envelope)? {
        Envelope::Result(raw) => match serde_json::from_str(&raw) {
            Ok(parsed) => Ok(parsed),
            Err(_) if policy == ParsePolicy::Lenient => Ok(Value::String(raw)),
            Err(err) => Err(GatewayError::Normalization {
                message: err.to_string(),
            }),
        },
        // No lenient fallback for the older shape on either surface
        Envelope::Output(text) => {
            serde_json::from_str(&text).map_err(|err| GatewayError::Normalization {
                message: err.to_string(),
            })
        }
    }
}

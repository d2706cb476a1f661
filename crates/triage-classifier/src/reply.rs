//! Turning the model's reply text into a [`Classification`].

use serde_json::Value;
use triage_core::{Category, Classification, Priority};

use crate::error::RemoteFailure;

/// Strip surrounding whitespace and an optional Markdown code fence.
///
/// Handles both a fence tagged as JSON (```` ```json ````) and an untagged
/// one. Text without a leading fence is only trimmed.
pub fn extract_json_payload(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body
        .strip_prefix("json")
        .or_else(|| body.strip_prefix("JSON"))
        .unwrap_or(body)
        .trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a reply into a classification.
///
/// Fails only when the payload is not a JSON object. Individual fields that
/// are missing, not strings, or outside the taxonomy fall back to
/// `general` / `low` independently.
pub fn parse_reply(raw: &str) -> Result<Classification, RemoteFailure> {
    let value: Value = serde_json::from_str(extract_json_payload(raw))?;
    let object = value.as_object().ok_or(RemoteFailure::NotAnObject)?;

    let category = object
        .get("category")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Category>().ok())
        .unwrap_or_default();
    let priority = object
        .get("priority")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Priority>().ok())
        .unwrap_or_default();

    Ok(Classification::new(category, priority))
}

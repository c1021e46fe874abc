//! Cleanup applied to raw model text before it is handed to callers.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::GeneratorError;

/// Fields whose schema type is a JSON-encoded string holding an object
/// (keyword to number). The schema language has no map type, so the model
/// returns these as text and they are decoded here.
pub const KEYWORD_MAP_FIELDS: [&str; 2] = ["searchVolume", "keywordDifficulty"];

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)\s*```\s*$").expect("valid fence regex")
});

/// Remove a surrounding Markdown code fence (```` ```json ... ``` ````), if
/// any, and trim whitespace.
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    match FENCE_RE.captures(text).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => text.trim(),
    }
}

/// Parse model text into JSON after fence removal.
///
/// If the cleaned text does not parse, the outermost `{ ... }` span is tried
/// once before giving up, which recovers from stray prose around the object.
///
/// # Errors
///
/// Returns [`GeneratorError::InvalidResponse`] carrying the original parse
/// error when neither attempt yields JSON.
pub fn parse_structured(text: &str, context: &str) -> Result<Value, GeneratorError> {
    let cleaned = strip_code_fences(text);
    match serde_json::from_str::<Value>(cleaned) {
        Ok(value) => Ok(value),
        Err(source) => {
            if let Some(value) = outermost_object(cleaned) {
                tracing::debug!(context, "recovered JSON object from surrounding text");
                return Ok(value);
            }
            Err(GeneratorError::InvalidResponse {
                context: context.to_string(),
                source,
            })
        }
    }
}

fn outermost_object(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

/// Decode string-encoded keyword maps anywhere in `value`.
///
/// A field listed in [`KEYWORD_MAP_FIELDS`] that holds a string is parsed; if
/// the string is not a JSON object, or the field holds some other non-object
/// value, it is replaced with `{}` and a warning is logged. Objects pass
/// through untouched.
pub fn repair_keyword_maps(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for field in KEYWORD_MAP_FIELDS {
                if let Some(slot) = map.get_mut(field) {
                    repair_map_field(field, slot);
                }
            }
            for child in map.values_mut() {
                repair_keyword_maps(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                repair_keyword_maps(item);
            }
        }
        _ => {}
    }
}

fn repair_map_field(field: &str, slot: &mut Value) {
    let repaired = match slot {
        Value::Object(_) => return,
        Value::String(raw) => match serde_json::from_str::<Value>(strip_code_fences(raw)) {
            Ok(parsed @ Value::Object(_)) => parsed,
            Ok(_) | Err(_) => {
                tracing::warn!(field, "keyword map is not a JSON object, using empty map");
                Value::Object(Map::new())
            }
        },
        Value::Null => Value::Object(Map::new()),
        _ => {
            tracing::warn!(field, "keyword map has unexpected type, using empty map");
            Value::Object(Map::new())
        }
    };
    *slot = repaired;
}

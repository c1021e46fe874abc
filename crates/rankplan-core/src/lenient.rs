//! Tolerant deserializers for model-authored fields.
//!
//! Generated JSON routinely drifts from the declared schema: scores arrive as
//! `"85"` or `85.5`, volumes as `"1,200"`, maps as JSON-encoded strings. These
//! helpers accept the common drift and fall back to a neutral value instead of
//! failing the whole record.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Best-effort integer extraction from a JSON value.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, ',' | '_' | '+') && !c.is_whitespace())
                .collect();
            cleaned
                .parse::<i64>()
                .ok()
                .or_else(|| cleaned.parse::<f64>().ok().map(|f| f.round() as i64))
        }
        _ => None,
    }
}

// clamp guarantees the value fits
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_percent(raw: i64) -> u8 {
    raw.clamp(0, 100) as u8
}

/// Integer score bounded to `0..=100`; anything unreadable becomes `0`.
pub(crate) fn score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_i64(&value).map_or(0, clamp_percent))
}

/// Non-negative count; anything unreadable becomes `0`.
#[allow(clippy::cast_sign_loss)]
pub(crate) fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_i64(&value).map_or(0, |v| v.max(0) as u64))
}

/// Small positive integer such as a day offset or priority rank.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn small_int<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_i64(&value).map_or(0, |v| v.clamp(0, i64::from(u32::MAX)) as u32))
}

/// Floating point value that may arrive as a string (`"3.5%"`, `"$1,200"`).
pub(crate) fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
                .collect();
            cleaned.parse::<f64>().unwrap_or(0.0)
        }
        _ => 0.0,
    })
}

fn object_to_int_map(value: Value, clamp: bool) -> BTreeMap<String, i64> {
    let object = match value {
        Value::Object(map) => map,
        // Second line of defence: the generator layer normally decodes
        // string-encoded maps before the record is typed.
        Value::String(s) => match serde_json::from_str::<Value>(&s) {
            Ok(Value::Object(map)) => map,
            _ => return BTreeMap::new(),
        },
        _ => return BTreeMap::new(),
    };

    object
        .into_iter()
        .filter_map(|(keyword, raw)| {
            let v = value_to_i64(&raw)?;
            let v = if clamp {
                i64::from(clamp_percent(v))
            } else {
                v.max(0)
            };
            Some((keyword, v))
        })
        .collect()
}

/// keyword → non-negative integer map (search volume).
pub(crate) fn int_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(object_to_int_map(value, false))
}

/// keyword → `0..=100` map (keyword difficulty).
pub(crate) fn percent_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(object_to_int_map(value, true))
}

/// List of strings that tolerates a single string or `null`.
pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    })
}

/// String that tolerates `null` and non-string scalars.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::Result;
use crate::inventory::types::{PropertyBag, PropertyValue};

/// Parse `ConvertTo-Json` output into property bags.
///
/// PowerShell emits a bare object for one-element pipelines and nothing at
/// all for empty ones, so all three shapes are accepted.
pub fn parse_objects(raw: &str) -> Result<Vec<PropertyBag>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(trimmed)?;
    let bags = match value {
        Value::Array(items) => items.iter().map(reflect).collect(),
        Value::Null => Vec::new(),
        other => vec![reflect(&other)],
    };
    Ok(bags)
}

/// Flatten every top-level property of a JSON object into a bag.
/// Anything that is not an object has no properties.
pub fn reflect(value: &Value) -> PropertyBag {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, v)| (key.clone(), to_property_value(v)))
            .collect(),
        _ => PropertyBag::new(),
    }
}

/// Rename every key with a namespace tag, e.g. `Caption` -> `OS_Caption`.
pub fn prefixed(bag: PropertyBag, prefix: &str) -> PropertyBag {
    bag.into_iter()
        .map(|(key, value)| (format!("{}{}", prefix, key), value))
        .collect()
}

fn to_property_value(value: &Value) -> PropertyValue {
    match value {
        Value::Null => PropertyValue::Null,
        Value::Bool(b) => PropertyValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                PropertyValue::Integer(i)
            } else if let Some(u) = n.as_u64() {
                PropertyValue::Unsigned(u)
            } else {
                PropertyValue::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => match parse_legacy_date(s) {
            Some(ts) => PropertyValue::Timestamp(ts),
            None => PropertyValue::Text(s.clone()),
        },
        // Nested objects stay readable as their compact JSON text
        nested => PropertyValue::Text(nested.to_string()),
    }
}

/// Windows PowerShell serializes `DateTime` as `/Date(<millis>[+-zzzz])/`.
fn parse_legacy_date(s: &str) -> Option<DateTime<Utc>> {
    let inner = s.strip_prefix("/Date(")?.strip_suffix(")/")?;
    let digits_end = inner
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '+' || *c == '-')
        .map(|(i, _)| i)
        .unwrap_or(inner.len());
    let millis: i64 = inner[..digits_end].parse().ok()?;
    DateTime::from_timestamp_millis(millis)
}

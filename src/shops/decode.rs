// Shop payload decoding.
// Maps wire entries field by field onto shop records, reporting the path of any type mismatch.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{HoneyError, Result};

use super::types::ShopRecord;

/// Key holding the entry array in the remote envelope.
pub const RECORD_KEY: &str = "record";

/// Decode the remote envelope `{"record": [...]}`.
pub fn decode_envelope(bytes: &[u8]) -> Result<Vec<ShopRecord>> {
    let value = parse(bytes)?;
    let root = as_object(&value, "$")?;
    let record = root
        .get(RECORD_KEY)
        .ok_or_else(|| missing(RECORD_KEY))?;
    decode_entries(record, RECORD_KEY, Utc::now())
}

/// Decode a bare entry array, as stored in the local snapshot.
pub fn decode_snapshot(bytes: &[u8]) -> Result<Vec<ShopRecord>> {
    let value = parse(bytes)?;
    decode_entries(&value, "", Utc::now())
}

fn parse(bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|e| HoneyError::Malformed(e.to_string()))
}

fn decode_entries(value: &Value, path: &str, fetched_at: DateTime<Utc>) -> Result<Vec<ShopRecord>> {
    let entries = value
        .as_array()
        .ok_or_else(|| mismatch(display_path(path), "array", value))?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| decode_entry(entry, &format!("{path}[{index}]"), fetched_at))
        .collect()
}

fn decode_entry(value: &Value, path: &str, fetched_at: DateTime<Utc>) -> Result<ShopRecord> {
    let entry = as_object(value, path)?;

    let name = required_str(entry, path, "name")?;
    if name.trim().is_empty() {
        return Err(HoneyError::Malformed(format!("empty shop name at {path}.name")));
    }

    let map_link = match entry.get("map").filter(|v| !v.is_null()) {
        Some(_) => required_str(entry, path, "map")?,
        None => required_str(entry, path, "google_maps_link")?,
    };

    Ok(ShopRecord {
        name,
        details: required_str(entry, path, "description")?,
        picture: optional_str(entry, path, "picture")?,
        rating: required_f64(entry, path, "rating")?,
        address: required_str(entry, path, "address")?,
        coordinates: coordinates(entry.get("coordinates"), &format!("{path}.coordinates"))?,
        map_link,
        website: required_str(entry, path, "website")?,
        fetched_at,
    })
}

/// Normalize either `[lat, lon]` or `{lat, lng}` into `[lat, lon]`.
fn coordinates(value: Option<&Value>, path: &str) -> Result<Vec<f64>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => {
            let mut pair = items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    item.as_f64()
                        .ok_or_else(|| mismatch(format!("{path}[{index}]"), "number", item))
                })
                .collect::<Result<Vec<f64>>>()?;
            pair.truncate(2);
            Ok(pair)
        }
        Some(Value::Object(obj)) => {
            let lat = required_f64(obj, path, "lat")?;
            let lon = if obj.contains_key("lng") {
                required_f64(obj, path, "lng")?
            } else {
                required_f64(obj, path, "lon")?
            };
            Ok(vec![lat, lon])
        }
        Some(other) => Err(mismatch(path.to_string(), "array or object", other)),
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| mismatch(display_path(path), "object", value))
}

fn required_str(obj: &Map<String, Value>, path: &str, key: &str) -> Result<String> {
    let field = field_path(path, key);
    match obj.get(key) {
        None => Err(missing(&field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(mismatch(field, "string", other)),
    }
}

fn optional_str(obj: &Map<String, Value>, path: &str, key: &str) -> Result<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(mismatch(field_path(path, key), "string", other)),
    }
}

fn required_f64(obj: &Map<String, Value>, path: &str, key: &str) -> Result<f64> {
    let field = field_path(path, key);
    match obj.get(key) {
        None => Err(missing(&field)),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| mismatch(field, "number", value)),
    }
}

fn field_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() { "$".to_string() } else { path.to_string() }
}

fn missing(path: &str) -> HoneyError {
    HoneyError::Malformed(format!("missing field `{path}`"))
}

fn mismatch(path: String, expected: &'static str, found: &Value) -> HoneyError {
    let actual = type_name(found);
    tracing::warn!(%path, expected, actual, "shop payload type mismatch");
    HoneyError::SchemaMismatch {
        path,
        expected,
        actual,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! JSON-safe encoding of event field maps.
//!
//! Timestamps become tagged objects:
//!
//! ```json
//! { "_timestamp": true, "_seconds": 100, "_nanoseconds": 0, "_dateString": "1970-01-01T00:01:40.000Z" }
//! ```
//!
//! `_dateString` is informational; `_seconds` and `_nanoseconds` are what `decode` reads back.
//! Unlike the old node scripts, arrays are traversed too, so timestamps nested in arrays survive
//! a backup/restore cycle.
//!
//! Store-specific scalars (ObjectId, Decimal128, ...) are written as canonical extended JSON,
//! e.g. `{ "$oid": "507f1f77bcf86cd799439011" }`.

use bson::Bson;
use serde_json::{json, Map, Number, Value};

use crate::error::{MaintenanceError, Result};
use crate::modules::events::model::{FieldValue, Fields, Timestamp};

const TIMESTAMP_TAG: &str = "_timestamp";
const SECONDS_KEY: &str = "_seconds";
const NANOS_KEY: &str = "_nanoseconds";
const DATE_STRING_KEY: &str = "_dateString";

pub fn encode(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Bool(b) => Value::Bool(*b),
        FieldValue::Integer(i) => Value::Number((*i).into()),
        // JSON has no NaN or infinity
        FieldValue::Double(d) => Number::from_f64(*d).map(Value::Number).unwrap_or(Value::Null),
        FieldValue::String(s) => Value::String(s.clone()),
        FieldValue::Array(items) => Value::Array(items.iter().map(encode).collect()),
        FieldValue::Map(fields) => Value::Object(encode_fields(fields)),
        FieldValue::Timestamp(ts) => json!({
            TIMESTAMP_TAG: true,
            SECONDS_KEY: ts.seconds,
            NANOS_KEY: ts.nanoseconds,
            DATE_STRING_KEY: ts.date_string(),
        }),
        FieldValue::Bson(b) => b.clone().into_canonical_extjson(),
    }
}

pub fn encode_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), encode(value)))
        .collect()
}

/// Inverse of [`encode`]. A `_timestamp`-tagged object that is malformed or out of range is an
/// error rather than a plain map, so a corrupt backup is rejected before anything is written.
pub fn decode(value: &Value) -> Result<FieldValue> {
    Ok(match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Integer(i),
            None => FieldValue::Double(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => FieldValue::String(s.clone()),
        Value::Array(items) => FieldValue::Array(items.iter().map(decode).collect::<Result<_>>()?),
        Value::Object(map) => {
            if let Some(ts) = decode_timestamp(map)? {
                FieldValue::Timestamp(ts)
            } else if let Some(b) = decode_extjson(map) {
                FieldValue::Bson(b)
            } else {
                FieldValue::Map(decode_fields(map)?)
            }
        }
    })
}

pub fn decode_fields(map: &Map<String, Value>) -> Result<Fields> {
    map.iter()
        .map(|(key, value)| Ok((key.clone(), decode(value)?)))
        .collect()
}

fn decode_timestamp(map: &Map<String, Value>) -> Result<Option<Timestamp>> {
    if map.get(TIMESTAMP_TAG) != Some(&Value::Bool(true)) {
        return Ok(None);
    }

    let invalid = || {
        MaintenanceError::InvalidBackupStructure(format!(
            "invalid timestamp {}",
            Value::Object(map.clone())
        ))
    };

    let seconds = map.get(SECONDS_KEY).and_then(Value::as_i64).ok_or_else(invalid)?;
    let nanoseconds = map
        .get(NANOS_KEY)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(invalid)?;

    let ts = Timestamp::new(seconds, nanoseconds);
    if !ts.is_valid() {
        return Err(invalid());
    }

    Ok(Some(ts))
}

/// Objects made only of `$`-keys that parse as a non-document BSON value.
fn decode_extjson(map: &Map<String, Value>) -> Option<Bson> {
    if map.is_empty() || !map.keys().all(|k| k.starts_with('$')) {
        return None;
    }

    match Bson::try_from(Value::Object(map.clone())) {
        Ok(Bson::Document(_)) | Err(_) => None,
        Ok(b) => Some(b),
    }
}

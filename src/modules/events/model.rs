use bson::Bson;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;

pub type Fields = BTreeMap<String, FieldValue>;

pub const INVALID_DATE: &str = "Invalid Date";

/// Seconds and nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanoseconds: u32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanoseconds: u32) -> Self {
        Self { seconds, nanoseconds }
    }

    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanoseconds: dt.timestamp_subsec_nanos(),
        }
    }

    pub fn from_millis(millis: i64) -> Self {
        Self {
            seconds: millis.div_euclid(1000),
            nanoseconds: (millis.rem_euclid(1000) as u32) * 1_000_000,
        }
    }

    /// `None` when the instant does not fit in i64 milliseconds.
    pub fn to_millis(&self) -> Option<i64> {
        self.seconds
            .checked_mul(1000)?
            .checked_add(i64::from(self.nanoseconds / 1_000_000))
    }

    /// Sub-second part below one second and the instant representable as a calendar date.
    pub fn is_valid(&self) -> bool {
        self.nanoseconds < 1_000_000_000
            && self.to_millis().is_some()
            && DateTime::<Utc>::from_timestamp(self.seconds, 0).is_some()
    }

    /// Whole-second instant as `YYYY-MM-DDTHH:MM:SS.000Z`; sub-second precision is dropped.
    /// Instants outside the calendar range give [`INVALID_DATE`].
    pub fn date_string(&self) -> String {
        DateTime::<Utc>::from_timestamp(self.seconds, 0)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_else(|| INVALID_DATE.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Array(Vec<FieldValue>),
    Map(Fields),
    Timestamp(Timestamp),
    /// Store-specific scalar with no native variant (ObjectId, Decimal128, binary, regex, ...).
    Bson(Bson),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Loose truthiness: null, false, zero and empty strings are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Double(d) => *d != 0.0 && !d.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Array(_) | Self::Map(_) | Self::Timestamp(_) | Self::Bson(_) => true,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Timestamp> for FieldValue {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub id: String,
    pub data: Fields,
}

impl EventRecord {
    pub fn new(id: impl Into<String>, data: Fields) -> Self {
        Self { id: id.into(), data }
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.data.get(name)
    }

    pub fn name(&self) -> &str {
        self.field("name").and_then(FieldValue::as_str).unwrap_or("N/A")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Delete { id: String },
    Set { id: String, data: Fields },
}

impl Mutation {
    pub fn id(&self) -> &str {
        match self {
            Self::Delete { id } | Self::Set { id, .. } => id,
        }
    }
}

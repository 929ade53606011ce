//! Record identity and the model trait every collection element implements

use crate::core::error::{CollectionError, Result};
use crate::core::field::FieldValue;
use crate::core::sort::FieldRef;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Stable unique key of a record
///
/// Remote payloads carry either a numeric or a string `id`; both are kept
/// as-is so that a record serializes back exactly as it arrived.
///
/// Ids that fit in `i64` are [`RecordId::Integer`]; any other JSON number
/// (`u64` above `i64::MAX`, or a float) is kept as a [`RecordId::Number`].
/// Two ids are the same key only if they are the same JSON value, so `1` and
/// `1.0` are distinct records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Integer(i64),
    Number(Number),
    String(String),
}

impl RecordId {
    /// Read an id out of a JSON value
    ///
    /// Numbers and strings are valid ids.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => RecordId::Integer(i),
                None => RecordId::Number(n.clone()),
            }),
            Value::String(s) => Some(RecordId::String(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Integer(i) => write!(f, "{}", i),
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Integer(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::String(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId::String(id)
    }
}

/// Base trait for everything a [`SortableCollection`] can hold.
///
/// A model has:
/// - a stable unique id used as the collection key
/// - dynamic field access used by sort directives
/// - a constructor from a raw payload taken out of a response envelope
///
/// [`SortableCollection`]: crate::storage::SortableCollection
pub trait Model: Clone + Send + Sync + 'static {
    /// Get the unique identifier for this model instance
    fn id(&self) -> &RecordId;

    /// Get the value of a field, or [`FieldValue::Null`] when absent
    fn field_value(&self, field: &FieldRef) -> FieldValue;

    /// Instantiate a model from one raw payload
    fn from_raw(raw: Value) -> Result<Self>;
}

/// A generic record: an id plus arbitrary attributes
///
/// The attribute map still contains the `id` entry, so serializing a record
/// reproduces the payload it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    attributes: Map<String, Value>,
}

impl Record {
    /// Build a record from an attribute map
    ///
    /// Fails when the map has no `id`, or the id is neither a string nor a
    /// number.
    pub fn new(attributes: Map<String, Value>) -> Result<Self> {
        let id = attributes
            .get("id")
            .ok_or_else(|| CollectionError::malformed("record is missing field 'id'"))?;
        let id = RecordId::from_json(id).ok_or_else(|| {
            CollectionError::malformed(format!(
                "record id must be a string or a number, got {}",
                id
            ))
        })?;

        Ok(Self { id, attributes })
    }

    /// Get a raw attribute by top-level name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// All attributes, including `id`
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Consume the record and return its payload
    pub fn into_value(self) -> Value {
        Value::Object(self.attributes)
    }
}

impl Model for Record {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn field_value(&self, field: &FieldRef) -> FieldValue {
        field
            .lookup(&self.attributes)
            .map(FieldValue::from_json)
            .unwrap_or(FieldValue::Null)
    }

    fn from_raw(raw: Value) -> Result<Self> {
        match raw {
            Value::Object(attributes) => Record::new(attributes),
            other => Err(CollectionError::malformed(format!(
                "record must be an object, got {}",
                other
            ))),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.attributes.serialize(serializer)
    }
}

//! Generic JSON document container.
//!
//! Cloud CMS documents have no client-side schema. [`JsonObject`] wraps a
//! `serde_json` map and adds typed accessors that return `None` instead of
//! panicking when a key is missing or holds a different type.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, InvalidInputError, PreconditionError};

/// Field holding a document's canonical identifier.
pub const ID_FIELD: &str = "_doc";

/// A JSON object: string keys mapped to dynamically typed values.
///
/// # Example
///
/// ```
/// use cloudcms_core::JsonObject;
/// use serde_json::json;
///
/// let node = JsonObject::try_from(json!({
///     "_doc": "a1b2c3",
///     "title": "node 1",
///     "_system": { "changeset": "1:abc" }
/// })).unwrap();
///
/// assert_eq!(node.id(), Some("a1b2c3"));
/// assert_eq!(node.get_str("title"), Some("node 1"));
/// assert_eq!(node.get_object("_system").unwrap().get_str("changeset"), Some("1:abc"));
/// assert_eq!(node.get_str("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonObject(Map<String, Value>);

impl JsonObject {
    /// Create an empty object.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Returns the `_doc` identifier when it is present and a string.
    pub fn id(&self) -> Option<&str> {
        self.get_str(ID_FIELD)
    }

    /// Returns the `_doc` identifier or a precondition error naming `entity`.
    ///
    /// Used by write paths that address an existing document, so a missing
    /// identifier is caught before any request is built.
    pub fn require_id(&self, entity: &'static str) -> Result<&str, Error> {
        match self.0.get(ID_FIELD) {
            Some(Value::String(id)) => Ok(id),
            Some(_) => Err(PreconditionError::InvalidId { entity }.into()),
            None => Err(PreconditionError::MissingId { entity }.into()),
        }
    }

    /// Returns a string field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns a signed integer field.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    /// Returns an unsigned integer field.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }

    /// Returns a boolean field.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    /// Returns a nested object field as a new [`JsonObject`].
    pub fn get_object(&self, key: &str) -> Option<JsonObject> {
        match self.0.get(key) {
            Some(Value::Object(map)) => Some(JsonObject(map.clone())),
            _ => None,
        }
    }

    /// Returns an array field.
    pub fn get_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.0.get(key).and_then(Value::as_array)
    }

    /// Returns an array field whose elements are all objects.
    ///
    /// Returns `None` if the field is missing, not an array, or holds any
    /// non-object element.
    pub fn get_object_array(&self, key: &str) -> Option<Vec<JsonObject>> {
        self.get_array(key)?
            .iter()
            .map(|v| match v {
                Value::Object(map) => Some(JsonObject(map.clone())),
                _ => None,
            })
            .collect()
    }

    /// Consume and return the inner map.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Consume and return the object as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Extract the `_doc` identifier of an optional document.
///
/// Returns `None` when the document is absent, has no `_doc`, or the field is
/// not a string. Never fails.
pub fn extract_id(obj: Option<&JsonObject>) -> Option<&str> {
    obj.and_then(JsonObject::id)
}

impl Deref for JsonObject {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for JsonObject {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Map<String, Value>> for JsonObject {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<JsonObject> for Value {
    fn from(obj: JsonObject) -> Self {
        Value::Object(obj.0)
    }
}

impl TryFrom<Value> for JsonObject {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(InvalidInputError::NotAnObject {
                found: type_name(&other),
            }
            .into()),
        }
    }
}

impl FromIterator<(String, Value)> for JsonObject {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(Map::from_iter(iter))
    }
}

impl<'a> IntoIterator for &'a JsonObject {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Short name of a JSON value's type, for error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! Query-string parameters.
//!
//! The server expects every value that originates from a JSON object (a
//! MongoDB-style query, pagination options such as `{limit, skip, sort}`) to
//! be JSON-serialized, even scalars. A plain string therefore goes on the wire
//! wrapped in quotes: `{"text": "burger"}` becomes `text="burger"`.
//! Values added with [`QueryParams::add`] are placed as-is.

use serde_json::Value;

use crate::json::JsonObject;

/// Multi-valued query parameters, kept in insertion order.
///
/// # Example
///
/// ```
/// use cloudcms_core::{JsonObject, QueryParams};
/// use serde_json::json;
///
/// let pagination = JsonObject::try_from(json!({"limit": 25})).unwrap();
/// let mut params = QueryParams::from_objects([&pagination]);
/// params.add("text", "burger");
///
/// assert_eq!(params.get_all("limit"), vec!["25"]);
/// assert_eq!(params.get_all("text"), vec!["burger"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build parameters from several JSON objects.
    ///
    /// Every key of every object becomes one JSON-encoded parameter. A key that
    /// appears in more than one object gets one value per occurrence.
    pub fn from_objects<'a, I>(objects: I) -> Self
    where
        I: IntoIterator<Item = &'a JsonObject>,
    {
        let mut params = Self::new();
        for obj in objects {
            params.extend_json(obj);
        }
        params
    }

    /// Build parameters from optional JSON objects, skipping absent ones.
    pub fn from_optional<'a, I>(objects: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a JsonObject>>,
    {
        Self::from_objects(objects.into_iter().flatten())
    }

    /// Append every key of `obj` as a JSON-encoded parameter.
    pub fn extend_json(&mut self, obj: &JsonObject) {
        for (key, value) in obj {
            self.add_json(key.clone(), value);
        }
    }

    /// Append one JSON-encoded parameter.
    pub fn add_json(&mut self, key: impl Into<String>, value: &Value) {
        // Serializing a `Value` cannot fail: its map keys are always strings.
        let encoded = serde_json::to_string(value).unwrap_or_default();
        self.pairs.push((key.into(), encoded));
    }

    /// Append one raw parameter.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(key, value);
        self
    }

    /// Append a raw parameter only when a value is present.
    pub fn add_opt(&mut self, key: impl Into<String>, value: Option<&str>) {
        if let Some(value) = value {
            self.add(key, value);
        }
    }

    /// Returns true if at least one value exists for `key`.
    pub fn has(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Returns every value for `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns the pairs, ready to hand to an HTTP client's query builder.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Returns true if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the number of parameter values.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

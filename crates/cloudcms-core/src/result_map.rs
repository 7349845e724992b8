//! Paginated listing envelope.
//!
//! Listing endpoints answer with
//! `{"rows": [...], "size": N, "total_rows": N, "offset": N}`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, ProtocolError};
use crate::json::{JsonObject, type_name};

/// A page of results from a listing endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultMap<T = JsonObject> {
    /// The rows in this page.
    pub rows: Vec<T>,
    /// Number of rows returned.
    pub size: u64,
    /// Number of rows matching server-side, before paging.
    pub total_rows: u64,
    /// Index of the first row in this page.
    pub offset: u64,
}

impl<T: DeserializeOwned> ResultMap<T> {
    /// Decode a listing envelope.
    ///
    /// Absent fields default to an empty page: `rows` to `[]`, `size` to the
    /// row count, `offset` to 0 and `total_rows` to `offset + size`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedListing`] if `rows` is not an array of
    /// values decodable as `T`, if a count field is not a non-negative
    /// integer, or if `total_rows` is absent and `offset + size` overflows. Either means client and server disagree on the wire format.
    pub fn from_object(mut obj: JsonObject) -> Result<Self, Error> {
        let rows = match obj.remove("rows") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    serde_json::from_value::<T>(item).map_err(|e| {
                        Error::from(ProtocolError::MalformedListing {
                            field: "rows",
                            reason: format!("element {i} is invalid: {e}"),
                        })
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(ProtocolError::MalformedListing {
                    field: "rows",
                    reason: format!("is {}, expected array", type_name(&other)),
                }
                .into());
            }
        };

        let size = count(&obj, "size")?.unwrap_or(rows.len() as u64);
        let offset = count(&obj, "offset")?.unwrap_or(0);
        let total_rows = match count(&obj, "total_rows")? {
            Some(total) => total,
            None => offset.checked_add(size).ok_or_else(|| ProtocolError::MalformedListing {
                field: "offset",
                reason: format!("{offset} plus size {size} overflows"),
            })?,
        };

        Ok(Self {
            rows,
            size,
            total_rows,
            offset,
        })
    }
}

impl<T> ResultMap<T> {
    /// Returns true if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows in this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if rows exist beyond this page.
    pub fn has_more(&self) -> bool {
        self.offset.saturating_add(self.size) < self.total_rows
    }

    /// Iterate over the rows.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }
}

impl<T> IntoIterator for ResultMap<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

fn count(obj: &JsonObject, field: &'static str) -> Result<Option<u64>, Error> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            // The server encodes counts as JSON numbers, sometimes as floats.
            if let Some(v) = n.as_u64() {
                Ok(Some(v))
            } else if let Some(f) = n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0) {
                Ok(Some(f as u64))
            } else {
                Err(ProtocolError::MalformedListing {
                    field,
                    reason: format!("is {n}, expected a non-negative integer"),
                }
                .into())
            }
        }
        Some(other) => Err(ProtocolError::MalformedListing {
            field,
            reason: format!("is {}, expected number", type_name(other)),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> JsonObject {
        JsonObject::try_from(value).unwrap()
    }

    #[test]
    fn decodes_full_envelope() {
        let listing: ResultMap = ResultMap::from_object(obj(json!({
            "rows": [{"_doc": "a"}, {"_doc": "b"}, {"_doc": "c"}],
            "size": 3,
            "total_rows": 10,
            "offset": 0,
        })))
        .unwrap();

        assert_eq!(listing.len() as u64, listing.size);
        assert_eq!(listing.total_rows, 10);
        assert_eq!(listing.rows[2].id(), Some("c"));
        assert!(listing.has_more());
    }

    #[test]
    fn float_counts_are_accepted() {
        let listing: ResultMap = ResultMap::from_object(obj(json!({
            "rows": [{"_doc": "a"}],
            "size": 1.0,
            "total_rows": 1.0,
            "offset": 0.0,
        })))
        .unwrap();

        assert_eq!(listing.size, 1);
        assert!(!listing.has_more());
    }

    #[test]
    fn absent_fields_default_to_empty_page() {
        let listing: ResultMap = ResultMap::from_object(JsonObject::new()).unwrap();
        assert!(listing.is_empty());
        assert_eq!((listing.size, listing.total_rows, listing.offset), (0, 0, 0));
    }

    #[test]
    fn non_array_rows_is_a_protocol_error() {
        let err = ResultMap::<JsonObject>::from_object(obj(json!({"rows": {"a": 1}}))).unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::MalformedListing { field: "rows", .. })
        ));
    }

    #[test]
    fn non_object_row_is_a_protocol_error() {
        let err = ResultMap::<JsonObject>::from_object(obj(json!({"rows": [{"_doc": "a"}, "b"]})))
            .unwrap_err();
        assert!(err.to_string().contains("element 1"));
    }

    #[test]
    fn non_numeric_count_is_a_protocol_error() {
        for field in ["size", "total_rows", "offset"] {
            let mut envelope = obj(json!({"rows": []}));
            envelope.insert(field.to_string(), json!("3"));
            let err = ResultMap::<JsonObject>::from_object(envelope).unwrap_err();
            assert!(
                matches!(err, Error::Protocol(ProtocolError::MalformedListing { field: f, .. }) if f == field)
            );
        }

        let err = ResultMap::<JsonObject>::from_object(obj(json!({"size": -1}))).unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }

    #[test]
    fn rows_decode_into_typed_elements() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct Row {
            title: String,
        }

        let listing = ResultMap::<Row>::from_object(obj(json!({
            "rows": [{"title": "x", "other": 1}],
            "size": 1,
        })))
        .unwrap();

        assert_eq!(listing.rows, vec![Row { title: "x".to_string() }]);
        assert_eq!(listing.total_rows, 1);
    }

    #[test]
    fn huge_offset_without_total_is_malformed() {
        let err = ResultMap::<JsonObject>::from_object(obj(json!({
            "rows": [{"_doc": "a"}],
            "size": 1,
            "offset": u64::MAX,
        })))
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::MalformedListing { field: "offset", .. })
        ));
    }

    #[test]
    fn huge_offset_with_total_decodes() {
        let listing = ResultMap::<JsonObject>::from_object(obj(json!({
            "rows": [{"_doc": "a"}],
            "size": 1,
            "total_rows": 5,
            "offset": u64::MAX,
        })))
        .unwrap();
        assert_eq!(listing.offset, u64::MAX);
        assert_eq!(listing.total_rows, 5);
        assert!(!listing.has_more());
    }
}

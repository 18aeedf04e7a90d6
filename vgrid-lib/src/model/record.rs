//! Dynamic keyed record

use std::collections::HashMap;
use std::hash::Hash;
use std::hash::Hasher;

use super::Value;

static NULL: Value = Value::Null;

/// Separator for nested field access in column keys (`"address.city"`).
pub const PATH_SEPARATOR: char = '.';

/// A caller-supplied record: string keys mapped to dynamic values.
///
/// Fields keep their insertion order, which is the order columns are derived
/// in when no explicit column setup is given.
///
/// # Example
///
/// ```
/// use vgrid_lib::model::{Record, Value};
///
/// let record = Record::new()
///     .set("name", "Ann")
///     .set("dept", "Eng");
///
/// assert_eq!(record.get("name"), Some(&Value::from("Ann")));
/// assert_eq!(record.keys().collect::<Vec<_>>(), vec!["name", "dept"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record {
    /// Field names in insertion order.
    keys: Vec<String>,

    /// The field values.
    fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.keys
            .iter()
            .filter_map(|k| self.fields.get(k).map(|v| (k.as_str(), v)))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Resolves a column key against this record.
    ///
    /// Keys containing [`PATH_SEPARATOR`] walk nested records field by
    /// field. Missing fields at any step resolve to [`Value::Null`].
    pub fn resolve(&self, key: &str) -> &Value {
        if !key.contains(PATH_SEPARATOR) {
            return self.get(key).unwrap_or(&NULL);
        }

        let mut current = self;
        let mut segments = key.split(PATH_SEPARATOR).peekable();
        while let Some(segment) = segments.next() {
            let Some(value) = current.get(segment) else {
                return &NULL;
            };
            if segments.peek().is_none() {
                return value;
            }
            match value {
                Value::Record(nested) => current = nested,
                _ => return &NULL,
            }
        }
        &NULL
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Inserts a field value. Existing fields keep their position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        if !self.fields.contains_key(&field) {
            self.keys.push(field.clone());
        }
        self.fields.insert(field, value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        let removed = self.fields.remove(field);
        if removed.is_some() {
            self.keys.retain(|k| k != field);
        }
        removed
    }

    /// Converts into a JSON object, preserving field order where the JSON
    /// map allows it.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Field order is not part of equality, so hash in key order.
        let mut keys: Vec<&String> = self.fields.keys().collect();
        keys.sort();
        keys.len().hash(state);
        for key in keys {
            key.hash(state);
            self.fields[key].hash(state);
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut record = Record::new().set("a", 1i64).set("b", 2i64);
        record.insert("a", 3i64);
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_resolve_dotted_path() {
        let address = Record::new().set("city", "Oslo");
        let record = Record::new().set("address", address).set("name", "Ann");

        assert_eq!(record.resolve("address.city"), &Value::from("Oslo"));
        assert_eq!(record.resolve("name"), &Value::from("Ann"));
        assert!(record.resolve("address.zip").is_null());
        assert!(record.resolve("name.first").is_null());
        assert!(record.resolve("missing").is_null());
    }

    #[test]
    fn test_remove_drops_key_order() {
        let mut record = Record::new().set("a", 1i64).set("b", 2i64);
        assert_eq!(record.remove("a"), Some(Value::Int(1)));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(record.remove("zzz"), None);
    }
}

//! Filter engine: per-column allow-sets, free-text search and the
//! distinct-value lists the filter menu is built from.

mod menu;

pub use menu::*;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::HashSet;
use std::sync::Arc;

use crate::model::Record;
use crate::model::Value;
use crate::store::SharedRecord;

/// Values a filtered column lets through.
pub type AllowSet = HashSet<Value>;

/// Case-insensitive string order with a case-sensitive tiebreak.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Order used for filter menu entries: nulls last, strings by
/// [`locale_cmp`], everything else by native relational order.
pub fn menu_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::String(a), Value::String(b)) => locale_cmp(a, b),
        _ => a.relational_cmp(b),
    }
}

/// Distinct values of `key` across `records`, ordered with [`menu_cmp`].
pub fn unique_values(records: &[SharedRecord], key: &str) -> Vec<Value> {
    let mut seen: HashSet<&Value> = HashSet::new();
    let mut values: Vec<Value> = Vec::new();
    for record in records {
        let value = record.resolve(key);
        if seen.insert(value) {
            values.push(value.clone());
        }
    }
    values.sort_by(menu_cmp);
    values
}

/// Active column filters keyed by column key.
///
/// A column without an entry is unfiltered. An entry is never stored when
/// it would allow every distinct value of the column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterMap {
    entries: BTreeMap<String, AllowSet>,
}

impl FilterMap {
    /// Create an empty filter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the allow-set for `key`.
    ///
    /// When `allowed` covers every one of the column's `unique` values the
    /// entry is removed instead. Returns `true` when an entry remains.
    pub fn set(&mut self, key: impl Into<String>, allowed: AllowSet, unique: &[Value]) -> bool {
        let key = key.into();
        if unique.iter().all(|value| allowed.contains(value)) {
            self.entries.remove(&key);
            false
        } else {
            self.entries.insert(key, allowed);
            true
        }
    }

    /// Drop the filter on `key`.
    pub fn remove(&mut self, key: &str) -> Option<AllowSet> {
        self.entries.remove(key)
    }

    /// Drop every filter.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Allow-set of `key`, if filtered.
    pub fn get(&self, key: &str) -> Option<&AllowSet> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` has an active filter.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of filtered columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no column is filtered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Filtered column keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns `true` if `record` passes every filter.
    pub fn matches(&self, record: &Record) -> bool {
        self.entries
            .iter()
            .all(|(key, allowed)| allowed.contains(record.resolve(key)))
    }
}

/// Keep the records that pass every column filter, in input order.
pub fn apply_all(records: &[SharedRecord], filters: &FilterMap) -> Vec<SharedRecord> {
    records
        .iter()
        .filter(|record| filters.matches(record))
        .map(Arc::clone)
        .collect()
}

/// Case-insensitive substring match against every field's text.
///
/// `term` must already be lowercase. Nested records match on their
/// serialized text.
pub fn matches_search(record: &Record, term: &str) -> bool {
    record
        .iter()
        .any(|(_, value)| value.to_string().to_lowercase().contains(term))
}

/// Keep the records containing `term` (case-insensitive), in input order.
pub fn search(records: &[SharedRecord], term: &str) -> Vec<SharedRecord> {
    let term = term.to_lowercase();
    records
        .iter()
        .filter(|record| matches_search(record, &term))
        .map(Arc::clone)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Vec<SharedRecord> {
        [("Bob", "Eng"), ("Ann", "Ops"), ("Cid", "Eng")]
            .iter()
            .map(|(name, dept)| Arc::new(Record::new().set("name", *name).set("dept", *dept)))
            .collect()
    }

    #[test]
    fn test_unique_values_order() {
        let records: Vec<SharedRecord> = [
            Value::from("beta"),
            Value::Null,
            Value::from("Alpha"),
            Value::from("alpha"),
            Value::from("beta"),
        ]
        .into_iter()
        .map(|v| Arc::new(Record::new().set("k", v)))
        .collect();

        let values = unique_values(&records, "k");
        assert_eq!(
            values,
            vec![
                Value::from("Alpha"),
                Value::from("alpha"),
                Value::from("beta"),
                Value::Null
            ]
        );
    }

    #[test]
    fn test_unique_values_numbers() {
        let records: Vec<SharedRecord> = [10i64, 2, 10, 33]
            .into_iter()
            .map(|v| Arc::new(Record::new().set("n", v)))
            .collect();
        assert_eq!(
            unique_values(&records, "n"),
            vec![Value::Int(2), Value::Int(10), Value::Int(33)]
        );
    }

    #[test]
    fn test_full_allow_set_is_normalized_away() {
        let mut filters = FilterMap::new();
        let unique = [Value::from("Eng"), Value::from("Ops")];
        let all: AllowSet = unique.iter().cloned().collect();
        assert!(!filters.set("dept", all, &unique));
        assert!(filters.is_empty());

        let some: AllowSet = [Value::from("Eng")].into();
        assert!(filters.set("dept", some, &unique));
        assert!(filters.contains("dept"));
    }

    #[test]
    fn test_same_size_foreign_set_is_kept() {
        let mut filters = FilterMap::new();
        let unique = [Value::from("Eng"), Value::from("Ops")];
        let foreign: AllowSet = [Value::from("Eng"), Value::from("Sales")].into();
        assert!(filters.set("dept", foreign, &unique));

        let result = apply_all(&people(), &filters);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.resolve("dept") == &Value::from("Eng")));
    }

    #[test]
    fn test_apply_all_intersects() {
        let mut filters = FilterMap::new();
        filters.set("dept", [Value::from("Eng")].into(), &unique_values(&people(), "dept"));
        filters.set(
            "name",
            [Value::from("Cid"), Value::from("Ann")].into(),
            &unique_values(&people(), "name"),
        );

        let result = apply_all(&people(), &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].resolve("name"), &Value::from("Cid"));
    }

    #[test]
    fn test_empty_allow_set_hides_everything() {
        let mut filters = FilterMap::new();
        filters.set("dept", AllowSet::new(), &unique_values(&people(), "dept"));
        assert!(apply_all(&people(), &filters).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let result = search(&people(), "eNG");
        assert_eq!(result.len(), 2);
        assert!(search(&people(), "zzz").is_empty());
    }

    #[test]
    fn test_locale_cmp() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("B", "b"), Ordering::Less);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }
}

//! CSV export of the rows in view.

use crate::model::Record;
use crate::model::Value;

/// Line separator between CSV rows.
pub const CSV_LINE_SEPARATOR: &str = "\r\n";

/// MIME type offered with an export.
pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8;";

/// One field: JSON text of the value, with nulls written as `""` and
/// missing fields left empty.
fn csv_field(value: Option<&Value>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let json = blank_nulls(value.to_json());
    serde_json::to_string(&json).unwrap_or_default()
}

/// Replace nulls at every depth with the empty string.
fn blank_nulls(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Null => serde_json::Value::String(String::new()),
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(blank_nulls).collect())
        }
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter().map(|(k, v)| (k, blank_nulls(v))).collect(),
        ),
        other => other,
    }
}

/// Serialize `records` as CSV.
///
/// The header is the field names of the first record; every row emits
/// those fields in that order. An empty input yields an empty string.
pub fn to_csv<R: AsRef<Record>>(records: &[R]) -> String {
    let Some(first) = records.first() else {
        return String::new();
    };
    let header: Vec<&str> = first.as_ref().keys().collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(header.join(","));
    for record in records {
        let record = record.as_ref();
        let line = header
            .iter()
            .map(|field| csv_field(record.get(field)))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }
    lines.join(CSV_LINE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_csv_quoting_and_nulls() {
        let records = vec![
            Arc::new(Record::new().set("name", "Ann").set("age", 31i64).set("note", Value::Null)),
            Arc::new(Record::new().set("name", "Say \"hi\"").set("age", 2.5)),
        ];
        let csv = to_csv(&records);
        let lines: Vec<&str> = csv.split(CSV_LINE_SEPARATOR).collect();

        assert_eq!(lines[0], "name,age,note");
        assert_eq!(lines[1], r#""Ann",31,"""#);
        assert_eq!(lines[2], r#""Say \"hi\"",2.5,"#);
    }

    #[test]
    fn test_csv_empty() {
        let records: Vec<Arc<Record>> = Vec::new();
        assert_eq!(to_csv(&records), "");
    }
}

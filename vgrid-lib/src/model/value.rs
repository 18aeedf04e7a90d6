//! Value enum for dynamic field values

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use super::Record;

/// A dynamic value held by one field of a [`Record`].
///
/// # Type Mapping
///
/// | JSON | Rust Variant |
/// |------|--------------|
/// | null | `Null` |
/// | true / false | `Bool` |
/// | integral number | `Int` |
/// | other number | `Float` |
/// | string | `String` |
/// | object | `Record` |
/// | array | `Json` |
///
/// Numbers compare and hash by numeric value, so `Int(1)` and `Float(1.0)`
/// are the same member of an allow-set.
///
/// # Example
///
/// ```
/// use vgrid_lib::model::Value;
///
/// assert_eq!(Value::from(1i64), Value::from(1.0));
/// assert_eq!(Value::from(2.0).to_string(), "2");
/// assert!(Value::from("").is_blank());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Null/empty value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(String),
    /// Nested record, reachable through dotted column keys.
    Record(Box<Record>),
    /// Fallback for JSON values without a dedicated variant (arrays).
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric value of `Int` and `Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the nested record, if any.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Returns `true` for null and for the empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Rank used to order values of different types.
    fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::String(_) => 3,
            Value::Record(_) | Value::Json(_) => 4,
        }
    }

    /// Relational comparison on the native type of both values.
    ///
    /// Values of different types order by type (bool, number, string,
    /// nested). Null placement is the caller's policy: here it ranks first.
    pub fn relational_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                _ => self
                    .type_rank()
                    .cmp(&other.type_rank())
                    .then_with(|| self.to_string().cmp(&other.to_string())),
            },
        }
    }

    /// Converts into a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Record(r) => r.to_json(),
            Value::Json(v) => v.clone(),
        }
    }
}

// =============================================================================
// Equality and hashing (SameValueZero for numbers)
// =============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => {
                integral(*f) == Some(*i)
            }
            _ => false,
        }
    }
}

/// The exact `i64` an integral float stands for.
fn integral(f: f64) -> Option<i64> {
    const BOUND: f64 = 9_223_372_036_854_775_808.0; // 2^63
    if f.fract() == 0.0 && (-BOUND..BOUND).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_rank().hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => {
                // Integral floats must hash like the equal Int.
                if let Some(i) = integral(*f) {
                    i.hash(state);
                } else if f.is_nan() {
                    u64::MAX.hash(state);
                } else {
                    f.to_bits().hash(state);
                }
            }
            Value::String(s) => s.hash(state),
            Value::Record(r) => r.hash(state),
            Value::Json(v) => v.to_string().hash(state),
        }
    }
}

// =============================================================================
// Display
// =============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => f.write_str(s),
            Value::Record(r) => write!(f, "{}", r.to_json()),
            Value::Json(v) => write!(f, "{}", v),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(Box::new(v))
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Object(obj) => {
                let mut record = Record::new();
                for (key, value) in obj {
                    record.insert(key, Value::from(value));
                }
                Value::Record(Box::new(record))
            }
            other => Value::Json(other),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_numbers_are_same_value_zero() {
        assert_eq!(Value::Int(3), Value::Float(3.0));
        assert_ne!(Value::Int(3), Value::Float(3.5));
        assert_ne!(Value::Int(3), Value::String("3".into()));

        let set: HashSet<Value> = [Value::Int(3)].into_iter().collect();
        assert!(set.contains(&Value::Float(3.0)));
    }

    #[test]
    fn test_large_int_float_equality_is_exact() {
        let big = 1i64 << 53;
        assert_ne!(Value::Int(big + 1), Value::Float(big as f64));
        assert_eq!(Value::Int(big), Value::Float(big as f64));
        assert_eq!(Value::Float(-0.0), Value::Int(0));
        assert_ne!(Value::Float(9.3e18), Value::Int(i64::MAX));

        let set: HashSet<Value> = [Value::Float(big as f64)].into_iter().collect();
        assert!(set.contains(&Value::Int(big)));
        assert!(!set.contains(&Value::Int(big + 1)));
    }

    #[test]
    fn test_relational_cmp_mixed_types() {
        assert_eq!(
            Value::Int(2).relational_cmp(&Value::Float(10.5)),
            Ordering::Less
        );
        assert_eq!(
            Value::from("b").relational_cmp(&Value::from("a")),
            Ordering::Greater
        );
        assert_eq!(
            Value::Bool(true).relational_cmp(&Value::Int(0)),
            Ordering::Less
        );
        assert_eq!(
            Value::Int(99).relational_cmp(&Value::from("1")),
            Ordering::Less
        );
    }

    #[test]
    fn test_display_integral_float() {
        assert_eq!(Value::Float(85000.0).to_string(), "85000");
        assert_eq!(Value::Float(1.25).to_string(), "1.25");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_from_json_object_is_nested_record() {
        let json = serde_json::json!({ "city": "Oslo", "zip": 150 });
        let value = Value::from(json);
        let record = value.as_record().unwrap();
        assert_eq!(record.get("city"), Some(&Value::from("Oslo")));
        assert_eq!(record.get("zip"), Some(&Value::Int(150)));
    }
}

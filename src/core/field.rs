//! Field values and the total order used for sorting

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// A comparable scalar read out of a record attribute
///
/// Values of different kinds are ordered `Null < Boolean < Number < String`.
/// Signed integers, unsigned integers and floats are all numbers and compare
/// exactly with each other; no integer is rounded through `f64`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    String(String),
}

impl FieldValue {
    /// Read a JSON value as a field value
    ///
    /// Arrays and objects are not comparable and read as [`FieldValue::Null`].
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Bool(b) => FieldValue::Boolean(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    FieldValue::Unsigned(u)
                } else {
                    n.as_f64().map(FieldValue::Float).unwrap_or(FieldValue::Null)
                }
            }
            Value::String(s) => FieldValue::String(s.clone()),
            Value::Null | Value::Array(_) | Value::Object(_) => FieldValue::Null,
        }
    }

    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Boolean(_) => 1,
            FieldValue::Integer(_) | FieldValue::Unsigned(_) | FieldValue::Float(_) => 2,
            FieldValue::String(_) => 3,
        }
    }

    fn numeric(&self) -> Option<Numeric> {
        match self {
            FieldValue::Integer(i) => Some(Numeric::Int(i128::from(*i))),
            FieldValue::Unsigned(u) => Some(Numeric::Int(i128::from(*u))),
            FieldValue::Float(f) => Some(Numeric::Float(*f)),
            _ => None,
        }
    }

    /// Total order over field values
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a.cmp(b),
            (FieldValue::String(a), FieldValue::String(b)) => a.cmp(b),
            _ => match (self.numeric(), other.numeric()) {
                (Some(a), Some(b)) => a.compare(b),
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }
}

/// A number widened so that every `i64` and `u64` is exact
#[derive(Debug, Clone, Copy)]
enum Numeric {
    Int(i128),
    Float(f64),
}

impl Numeric {
    fn compare(self, other: Numeric) -> Ordering {
        match (self, other) {
            (Numeric::Int(a), Numeric::Int(b)) => a.cmp(&b),
            (Numeric::Float(a), Numeric::Float(b)) => compare_floats(a, b),
            (Numeric::Int(a), Numeric::Float(b)) => compare_int_float(a, b),
            (Numeric::Float(a), Numeric::Int(b)) => compare_int_float(b, a).reverse(),
        }
    }
}

// -0.0 and 0.0 are equal, NaN sorts like `total_cmp` does (below or above
// everything by sign), matching `compare_int_float`.
fn compare_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

fn compare_int_float(a: i128, b: f64) -> Ordering {
    if b.is_nan() {
        return if b.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }

    // 2^127: every i128 lies strictly inside (-2^127 - 1, 2^127)
    const BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    let whole = b.trunc();
    if whole >= BOUND {
        return Ordering::Less;
    }
    if whole < -BOUND {
        return Ordering::Greater;
    }

    // `whole` is integral and in range, so the cast is exact
    match a.cmp(&(whole as i128)) {
        Ordering::Equal => {
            let fraction = b - whole;
            if fraction > 0.0 {
                Ordering::Less
            } else if fraction < 0.0 {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        ordering => ordering,
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        FieldValue::from_json(value)
    }
}

//! Typed payload values carried by events and used as condition operands.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Event payload: field name to typed value.
pub type Payload = BTreeMap<String, PayloadValue>;

/// A single typed payload value.
///
/// Serialized untagged so that payloads read and write as plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<PayloadValue>),
    Map(BTreeMap<String, PayloadValue>),
}

impl PayloadValue {
    /// Strict equality: both sides must be the same kind of value.
    ///
    /// Integers and floats are a single numeric kind and compare by value.
    /// Two integers compare exactly, without going through `f64`.
    /// Lists and maps compare element-wise with the same rule.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn strictly_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.strictly_equals(y))
            }
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, x)| b.get(key).is_some_and(|y| x.strictly_equals(y)))
            }
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Relational ordering used by `greaterThan` / `lessThan`.
    ///
    /// Numbers order numerically and strings lexicographically. Any other
    /// pairing has no ordering.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            _ => {
                let a = self.as_f64()?;
                let b = other.as_f64()?;
                a.partial_cmp(&b)
            }
        }
    }

    /// Whether this value is a list containing an element strictly equal to `needle`.
    #[must_use]
    pub fn list_contains(&self, needle: &Self) -> bool {
        match self {
            Self::List(items) => items.iter().any(|item| item.strictly_equals(needle)),
            _ => false,
        }
    }

    /// Numeric view of the value, if it is a number.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// String view of the value, if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for PayloadValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PayloadValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PayloadValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<PayloadValue>> From<Vec<T>> for PayloadValue {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_deserialize_integer_as_int_variant() {
        let val: PayloadValue = serde_json::from_str("180").unwrap();
        assert_eq!(val, PayloadValue::Int(180));
    }

    #[test]
    fn should_deserialize_decimal_as_float_variant() {
        let val: PayloadValue = serde_json::from_str("38.5").unwrap();
        assert_eq!(val, PayloadValue::Float(38.5));
    }

    #[test]
    fn should_deserialize_null_and_nested_values() {
        let val: PayloadValue =
            serde_json::from_str(r#"{"tags": ["a", 1], "note": null}"#).unwrap();
        let PayloadValue::Map(map) = val else {
            panic!("expected Map");
        };
        assert_eq!(map["note"], PayloadValue::Null);
        assert_eq!(
            map["tags"],
            PayloadValue::List(vec!["a".into(), PayloadValue::Int(1)])
        );
    }

    #[test]
    fn should_serialize_as_plain_json() {
        let val = PayloadValue::List(vec![true.into(), "x".into()]);
        assert_eq!(serde_json::to_string(&val).unwrap(), r#"[true,"x"]"#);
    }

    #[test]
    fn should_treat_int_and_float_as_same_numeric_kind() {
        assert!(PayloadValue::Int(2).strictly_equals(&PayloadValue::Float(2.0)));
    }

    #[test]
    fn should_compare_large_ints_exactly() {
        let low = PayloadValue::Int(9_007_199_254_740_992);
        let high = PayloadValue::Int(9_007_199_254_740_993);

        assert!(!low.strictly_equals(&high));
        assert!(high.strictly_equals(&high.clone()));
        assert_eq!(high.compare(&low), Some(Ordering::Greater));
        assert_eq!(low.compare(&high), Some(Ordering::Less));
    }

    #[test]
    fn should_not_coerce_between_kinds() {
        assert!(!PayloadValue::String("1".into()).strictly_equals(&PayloadValue::Int(1)));
        assert!(!PayloadValue::Bool(true).strictly_equals(&PayloadValue::Int(1)));
        assert!(!PayloadValue::Null.strictly_equals(&PayloadValue::Bool(false)));
    }

    #[test]
    fn should_order_numbers_and_strings() {
        assert_eq!(
            PayloadValue::Int(180).compare(&PayloadValue::Int(120)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            PayloadValue::from("a").compare(&PayloadValue::from("b")),
            Some(Ordering::Less)
        );
        assert_eq!(PayloadValue::from("5").compare(&PayloadValue::Int(4)), None);
    }

    #[test]
    fn should_only_contain_when_value_is_list() {
        let list = PayloadValue::from(vec!["icu", "cardio"]);
        assert!(list.list_contains(&"icu".into()));
        assert!(!list.list_contains(&"ward".into()));
        assert!(!PayloadValue::from("icu").list_contains(&"icu".into()));
    }
}

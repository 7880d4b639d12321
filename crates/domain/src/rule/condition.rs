//! Condition — a predicate over one payload field.

use serde::{Deserialize, Serialize};

use crate::value::{Payload, PayloadValue};

/// Comparison applied between a payload field and the condition value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Equals,
    GreaterThan,
    LessThan,
    /// Field must be a list that includes the value.
    Contains,
    /// Any operator name this build does not know. Never holds.
    #[serde(other)]
    Unsupported,
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Equals => "equals",
            Self::GreaterThan => "greaterThan",
            Self::LessThan => "lessThan",
            Self::Contains => "contains",
            Self::Unsupported => "unsupported",
        })
    }
}

/// A guard evaluated against the triggering event's payload.
///
/// All conditions of a rule must hold (logical AND).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Payload key to read.
    pub field: String,
    pub operator: Operator,
    pub value: PayloadValue,
}

impl Condition {
    #[must_use]
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<PayloadValue>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn equals(field: impl Into<String>, value: impl Into<PayloadValue>) -> Self {
        Self::new(field, Operator::Equals, value)
    }

    /// Evaluate against a payload. Pure and infallible.
    ///
    /// A missing field behaves like `null`: it only equals a `null` value
    /// and never orders or contains.
    #[must_use]
    pub fn evaluate(&self, payload: &Payload) -> bool {
        let actual = payload.get(&self.field).unwrap_or(&PayloadValue::Null);
        match self.operator {
            Operator::Equals => actual.strictly_equals(&self.value),
            Operator::GreaterThan => actual.compare(&self.value).is_some_and(|o| o.is_gt()),
            Operator::LessThan => actual.compare(&self.value).is_some_and(|o| o.is_lt()),
            Operator::Contains => actual.list_contains(&self.value),
            Operator::Unsupported => false,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = serde_json::to_string(&self.value).map_err(|_| std::fmt::Error)?;
        write!(f, "{} {} {value}", self.field, self.operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload;

    #[test]
    fn should_match_equals_when_value_is_strictly_equal() {
        let c = Condition::equals("critical", true);
        assert!(c.evaluate(&payload! { "critical" => true }));
        assert!(!c.evaluate(&payload! { "critical" => false }));
        assert!(!c.evaluate(&payload! { "critical" => "true" }));
    }

    #[test]
    fn should_not_match_equals_when_field_missing() {
        let c = Condition::equals("critical", true);
        assert!(!c.evaluate(&payload! {}));
    }

    #[test]
    fn should_compare_greater_than_and_less_than_numerically() {
        let gt = Condition::new("heartRate", Operator::GreaterThan, 150_i64);
        let lt = Condition::new("spo2", Operator::LessThan, 90.0);
        let p = payload! { "heartRate" => 180_i64, "spo2" => 88_i64 };
        assert!(gt.evaluate(&p));
        assert!(lt.evaluate(&p));
        assert!(!gt.evaluate(&payload! { "heartRate" => 150_i64 }));
    }

    #[test]
    fn should_evaluate_large_integer_fields_exactly() {
        let p = payload! { "mrn" => 9_007_199_254_740_992_i64 };
        assert!(!Condition::equals("mrn", 9_007_199_254_740_993_i64).evaluate(&p));
        assert!(Condition::equals("mrn", 9_007_199_254_740_992_i64).evaluate(&p));

        let gt = Condition::new("mrn", Operator::GreaterThan, 9_007_199_254_740_992_i64);
        assert!(gt.evaluate(&payload! { "mrn" => 9_007_199_254_740_993_i64 }));
    }

    #[test]
    fn should_not_order_mismatched_kinds() {
        let gt = Condition::new("heartRate", Operator::GreaterThan, 150_i64);
        assert!(!gt.evaluate(&payload! { "heartRate" => "180" }));
        assert!(!gt.evaluate(&payload! {}));
    }

    #[test]
    fn should_match_contains_only_for_lists() {
        let c = Condition::new("allergies", Operator::Contains, "penicillin");
        assert!(c.evaluate(&payload! { "allergies" => vec!["latex", "penicillin"] }));
        assert!(!c.evaluate(&payload! { "allergies" => vec!["latex"] }));
        assert!(!c.evaluate(&payload! { "allergies" => "penicillin" }));
    }

    #[test]
    fn should_fail_closed_on_unknown_operator() {
        let json = serde_json::json!({
            "field": "critical",
            "operator": "startsWith",
            "value": true
        });
        let c: Condition = serde_json::from_value(json).unwrap();
        assert_eq!(c.operator, Operator::Unsupported);
        assert!(!c.evaluate(&payload! { "critical" => true }));
    }

    #[test]
    fn should_deserialize_camel_case_operators() {
        let json = serde_json::json!({
            "field": "heartRate",
            "operator": "greaterThan",
            "value": 120
        });
        let c: Condition = serde_json::from_value(json).unwrap();
        assert_eq!(c.operator, Operator::GreaterThan);
        assert_eq!(c.value, PayloadValue::Int(120));
    }

    #[test]
    fn should_display_condition() {
        let c = Condition::equals("toStepId", "step-done");
        assert_eq!(c.to_string(), "toStepId equals \"step-done\"");
    }
}

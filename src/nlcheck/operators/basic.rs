// SPDX-License-Identifier: MIT

//! Comparison operators with type coercion
//!
//! Arguments written in a check statement arrive as text. When text meets a
//! typed value, the text is converted to that value's type. Text that stays
//! text is compared case-insensitively.

use crate::host::value::{casefold, display, ValueKind};
use crate::host::{Host, KeywordError};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    Lte,
    Gte,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::NotEq => write!(f, "!="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Lte => write!(f, "<="),
            CompareOp::Gte => write!(f, ">="),
        }
    }
}

/// Compare two values after coercing text operands to the other side's type
pub fn basic_operator(
    host: &dyn Host,
    op: CompareOp,
    left: &Value,
    right: &Value,
) -> Result<bool, KeywordError> {
    let mut coerced = false;
    let mut l = left.clone();
    let mut r = right.clone();

    if let Value::String(text) = left {
        l = cast_text(host, right, text, "left operand");
        coerced = true;
    }
    if let Value::String(text) = right {
        r = cast_text(host, left, text, "right operand");
        coerced = true;
    }
    if !coerced {
        host.log("Comparing values as is", log::Level::Info);
    }

    match op {
        CompareOp::Eq => Ok(values_equal(&l, &r)),
        CompareOp::NotEq => Ok(!values_equal(&l, &r)),
        CompareOp::Lt => Ok(compare_values(op, &l, &r)? == Ordering::Less),
        CompareOp::Gt => Ok(compare_values(op, &l, &r)? == Ordering::Greater),
        CompareOp::Lte => Ok(compare_values(op, &l, &r)? != Ordering::Greater),
        CompareOp::Gte => Ok(compare_values(op, &l, &r)? != Ordering::Less),
    }
}

/// Coerced equality, the matching primitive of the item operators
pub fn equals(host: &dyn Host, left: &Value, right: &Value) -> Result<bool, KeywordError> {
    basic_operator(host, CompareOp::Eq, left, right)
}

/// Convert `text` to the type of `leading`. Text that cannot be converted
/// stays text and is case-folded.
fn cast_text(host: &dyn Host, leading: &Value, text: &str, name: &str) -> Value {
    let mut casted = Value::String(text.to_string());
    if let Some(converter) = host.converter_for(leading) {
        match converter.convert(text) {
            Ok(value) => casted = value,
            Err(e) => host.log(&e.to_string(), log::Level::Debug),
        }
        host.log(
            &format!("Comparing as {} values", converter.type_name()),
            log::Level::Info,
        );
    }

    if casted.is_string() {
        host.log(
            &format!("Interpreting {} '{}' as string (case insensitive)", name, text),
            log::Level::Info,
        );
        casted = Value::String(casefold(text));
    }
    casted
}

/// Plain equality without coercion.
///
/// Numbers compare by value (`7 == 7.0`), booleans equal the numbers 0 and
/// 1, collections compare element by element. Values of unrelated kinds are
/// never equal.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(l), Value::Object(r)) => {
            l.len() == r.len()
                && l.iter()
                    .all(|(k, v)| r.get(k).map_or(false, |other| values_equal(v, other)))
        }
        _ => match (as_number(left), as_number(right)) {
            (Some(a), Some(b)) => a == b,
            _ => left == right,
        },
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Ordering between values of compatible kinds
pub fn compare_values(op: CompareOp, left: &Value, right: &Value) -> Result<Ordering, KeywordError> {
    if let (Some(a), Some(b)) = (as_number(left), as_number(right)) {
        return a.partial_cmp(&b).ok_or_else(|| not_supported(op, left, right));
    }
    match (left, right) {
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        (Value::Array(a), Value::Array(b)) => {
            for (x, y) in a.iter().zip(b) {
                if values_equal(x, y) {
                    continue;
                }
                return compare_values(op, x, y);
            }
            Ok(a.len().cmp(&b.len()))
        }
        _ => Err(not_supported(op, left, right)),
    }
}

fn not_supported(op: CompareOp, left: &Value, right: &Value) -> KeywordError {
    KeywordError::type_error(format!(
        "'{}' not supported between '{}' ({}) and '{}' ({})",
        op,
        display(left),
        ValueKind::of(left),
        display(right),
        ValueKind::of(right)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::console::ScriptedConsole;
    use crate::nlcheck::runtime::Runtime;
    use serde_json::json;
    use std::sync::Arc;

    fn host() -> Runtime {
        Runtime::new(Arc::new(ScriptedConsole::new(Vec::<String>::new())))
    }

    #[test]
    fn test_numeric_equality() {
        let host = host();
        assert!(equals(&host, &json!(7), &json!(7.0)).unwrap());
        assert!(equals(&host, &json!(7), &json!("7.0")).unwrap());
        assert!(equals(&host, &json!("7"), &json!(7)).unwrap());
        assert!(!equals(&host, &json!(7), &json!("7.01")).unwrap());
    }

    #[test]
    fn test_text_is_case_insensitive() {
        let host = host();
        assert!(equals(&host, &json!("text"), &json!("TeXT")).unwrap());
        assert!(equals(&host, &json!("Robotstraße"), &json!("ROBOTSTRASSE")).unwrap());
        assert!(basic_operator(&host, CompareOp::NotEq, &json!("random"), &json!("text")).unwrap());
    }

    #[test]
    fn test_failed_conversion_falls_back_to_text() {
        let host = host();
        // "seven" is no number: compared as text against 7, which never matches
        assert!(!equals(&host, &json!(7), &json!("seven")).unwrap());
        assert!(basic_operator(&host, CompareOp::NotEq, &json!(7), &json!("seven")).unwrap());
    }

    #[test]
    fn test_bool_coercion() {
        let host = host();
        assert!(equals(&host, &json!(true), &json!("yes")).unwrap());
        assert!(equals(&host, &json!("False"), &json!(false)).unwrap());
        assert!(values_equal(&json!(true), &json!(1)));
    }

    #[test]
    fn test_ordering() {
        let host = host();
        assert!(basic_operator(&host, CompareOp::Lt, &json!(2), &json!("4")).unwrap());
        assert!(basic_operator(&host, CompareOp::Gt, &json!("10"), &json!(9)).unwrap());
        assert!(basic_operator(&host, CompareOp::Lte, &json!(2), &json!(2)).unwrap());
        assert!(basic_operator(&host, CompareOp::Gte, &json!(4), &json!(2.5)).unwrap());
        // Text against text compares lexicographically
        assert!(basic_operator(&host, CompareOp::Lt, &json!("10"), &json!("9")).unwrap());
    }

    #[test]
    fn test_ordering_incompatible_kinds() {
        let host = host();
        let err = basic_operator(&host, CompareOp::Lt, &json!([1]), &json!(3)).unwrap_err();
        assert!(matches!(err, KeywordError::Type(_)));
        assert!(!equals(&host, &json!([1]), &json!(3)).unwrap());
    }

    #[test]
    fn test_collections() {
        assert!(values_equal(&json!([1, "a"]), &json!([1.0, "a"])));
        assert!(!values_equal(&json!([1, 2]), &json!([1])));
        assert!(values_equal(&json!({"a": 1}), &json!({"a": 1.0})));
        assert_eq!(
            compare_values(CompareOp::Lt, &json!([1, 2]), &json!([1, 3])).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            compare_values(CompareOp::Lt, &json!([1, 2]), &json!([1])).unwrap(),
            Ordering::Greater
        );
    }
}

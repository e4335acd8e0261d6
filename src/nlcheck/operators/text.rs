//! Text operators
//!
//! These only apply to text. Any other value never contains or matches
//! anything.

use super::basic::values_equal;
use crate::host::value::casefold;
use serde_json::Value;

pub fn contains_text(base: &Value, sub: &Value) -> bool {
    match (base, sub) {
        (Value::String(base), Value::String(sub)) => casefold(base).contains(&casefold(sub)),
        _ => false,
    }
}

pub fn contains_exact_text(base: &Value, sub: &Value) -> bool {
    match (base, sub) {
        (Value::String(base), Value::String(sub)) => base.contains(sub.as_str()),
        _ => false,
    }
}

pub fn matches_without_case_to(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::String(l), Value::String(r)) => casefold(l) == casefold(r),
        _ => false,
    }
}

/// Exact equality; non-text values compare without any conversion
pub fn matches_with_case_to(left: &Value, right: &Value) -> bool {
    values_equal(left, right)
}

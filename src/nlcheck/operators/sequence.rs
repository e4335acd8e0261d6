// SPDX-License-Identifier: MIT

//! Operators on lists, texts and dictionaries

use super::basic::{equals, values_equal};
use crate::host::value::{display, is_list_like, items_of, len_of, ValueKind};
use crate::host::{ConversionError, Host, KeywordError};
use serde_json::Value;

fn has_no_length(value: &Value) -> KeywordError {
    KeywordError::type_error(format!(
        "Object of type '{}' has no length",
        ValueKind::of(value)
    ))
}

fn not_iterable(value: &Value) -> KeywordError {
    KeywordError::type_error(format!(
        "Argument of type '{}' is not iterable",
        ValueKind::of(value)
    ))
}

pub fn is_empty(sequence: &Value) -> Result<bool, KeywordError> {
    len_of(sequence)
        .map(|n| n == 0)
        .ok_or_else(|| has_no_length(sequence))
}

/// Whether `sequence` holds exactly `n` items
pub fn contains_n_items(host: &dyn Host, n: &Value, sequence: &Value) -> Result<bool, KeywordError> {
    let expected = to_count(n)?;
    let count = len_of(sequence).ok_or_else(|| has_no_length(sequence))?;
    host.log(&format!("Counted {} items", count), log::Level::Info);
    Ok(count == expected)
}

fn to_count(n: &Value) -> Result<usize, KeywordError> {
    let count = match n {
        Value::Number(num) => num.as_u64().or_else(|| num.as_f64().and_then(whole_count)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<u64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(whole_count))
        }
        _ => None,
    }
    .and_then(|v| usize::try_from(v).ok());
    count.ok_or_else(|| ConversionError::invalid(display(n), "integer").into())
}

/// `2.0` counts as 2; `2.5` and negative numbers are no count
fn whole_count(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64)
        .then_some(value as u64)
}

/// Primitive membership without type conversion: substring for text,
/// element for lists, key for dictionaries
pub fn contains(sequence: &Value, part: &Value) -> Result<bool, KeywordError> {
    match (sequence, part) {
        (Value::String(text), Value::String(sub)) => Ok(text.contains(sub.as_str())),
        (Value::String(_), other) => Err(KeywordError::type_error(format!(
            "'in <string>' requires string as left operand, not {}",
            ValueKind::of(other)
        ))),
        (Value::Array(items), _) => Ok(items.iter().any(|item| values_equal(item, part))),
        (Value::Object(map), Value::String(key)) => Ok(map.contains_key(key)),
        (Value::Object(_), _) => Ok(false),
        (other, _) => Err(not_iterable(other)),
    }
}

/// Every item on the right matches some item on the left.
///
/// A right side that is not list-like is a single item. Several right items
/// may match the same left item.
pub fn contains_item(host: &dyn Host, sequence: &Value, part: &Value) -> Result<bool, KeywordError> {
    let wanted = if is_list_like(part) {
        items_of(part).unwrap_or_default()
    } else {
        vec![part.clone()]
    };
    let items = items_of(sequence).ok_or_else(|| not_iterable(sequence))?;

    for elem in &wanted {
        host.log(
            &format!("Processing '{}' from right side", display(elem)),
            log::Level::Info,
        );
        let mut matched = false;
        for item in &items {
            if equals(host, elem, item)? {
                host.log("Matched", log::Level::Info);
                matched = true;
                break;
            }
            host.log("No match", log::Level::Info);
        }
        if !matched {
            host.log(
                &format!("{} not present in left side list", display(elem)),
                log::Level::Info,
            );
            return Ok(false);
        }
    }
    Ok(true)
}

/// Both sides hold the same items in any order, counting duplicates
pub fn contains_exactly_the_items_from(
    host: &dyn Host,
    sequence: &Value,
    right: &Value,
) -> Result<bool, KeywordError> {
    let mut remaining = match right {
        Value::String(_) => vec![right.clone()],
        other => items_of(other).ok_or_else(|| not_iterable(other))?,
    };
    let items = items_of(sequence).ok_or_else(|| not_iterable(sequence))?;

    for item in &items {
        host.log(
            &format!("Processing '{}' from left side list", display(item)),
            log::Level::Info,
        );
        let mut position = None;
        for (i, candidate) in remaining.iter().enumerate() {
            if equals(host, item, candidate)? {
                position = Some(i);
                break;
            }
        }
        match position {
            Some(i) => {
                remaining.remove(i);
            }
            None => {
                host.log(
                    &format!(
                        "Item '{}' from left side is not found in the list on the right side",
                        display(item)
                    ),
                    log::Level::Info,
                );
                return Ok(false);
            }
        }
    }

    if !remaining.is_empty() {
        host.log(
            &format!(
                "Not all items from right side list are present: {}",
                display(&Value::Array(remaining))
            ),
            log::Level::Info,
        );
        return Ok(false);
    }
    Ok(true)
}

/// Negation of [`contains_item`] for a single item
pub fn does_not_contain_item(
    host: &dyn Host,
    sequence: &Value,
    part: &Value,
) -> Result<bool, KeywordError> {
    if is_list_like(part) {
        return Err(KeywordError::UnsupportedOperand(
            "List-like items not accepted as right side value".to_string(),
        ));
    }
    Ok(!contains_item(host, sequence, part)?)
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
    fn test_is_empty() {
        assert!(is_empty(&json!([])).unwrap());
        assert!(is_empty(&json!("")).unwrap());
        assert!(is_empty(&json!({})).unwrap());
        assert!(!is_empty(&json!(["toothbrush"])).unwrap());
        assert!(matches!(is_empty(&json!(3)), Err(KeywordError::Type(_))));
    }

    #[test]
    fn test_contains_n_items() {
        let host = host();
        assert!(contains_n_items(&host, &json!("2"), &json!(["a", "b"])).unwrap());
        assert!(!contains_n_items(&host, &json!("3"), &json!(["a", "b"])).unwrap());
        assert!(contains_n_items(&host, &json!(1), &json!("x")).unwrap());
        assert!(contains_n_items(&host, &json!(2.0), &json!(["a", "b"])).unwrap());
        assert!(contains_n_items(&host, &json!(" 2.0 "), &json!(["a", "b"])).unwrap());
        assert!(matches!(
            contains_n_items(&host, &json!("2.5"), &json!(["a", "b"])),
            Err(KeywordError::Conversion(_))
        ));
        assert!(matches!(
            contains_n_items(&host, &json!(-1.0), &json!([])),
            Err(KeywordError::Conversion(_))
        ));
        assert!(matches!(
            contains_n_items(&host, &json!("two"), &json!(["a", "b"])),
            Err(KeywordError::Conversion(_))
        ));
    }

    #[test]
    fn test_contains_is_primitive() {
        assert!(contains(&json!(["toothbrush", "t-shirt"]), &json!("t-shirt")).unwrap());
        // No conversion: text "2" is not the number 2
        assert!(!contains(&json!([1, 2]), &json!("2")).unwrap());
        assert!(contains(&json!([1, 2]), &json!(2.0)).unwrap());
        assert!(contains(&json!("the time"), &json!("tim")).unwrap());
        assert!(!contains(&json!("the time"), &json!("TIM")).unwrap());
        assert!(contains(&json!({"k": 1}), &json!("k")).unwrap());
        assert!(contains(&json!(5), &json!(5)).is_err());
    }

    #[test]
    fn test_contains_item_with_conversion() {
        let host = host();
        assert!(contains_item(&host, &json!([1, 2, 7]), &json!("7")).unwrap());
        assert!(contains_item(&host, &json!(["Toothbrush"]), &json!("toothbrush")).unwrap());
        assert!(contains_item(&host, &json!([2, 4]), &json!(["2", "2", "4"])).unwrap());
        assert!(!contains_item(&host, &json!([2, 4]), &json!(["2", "5"])).unwrap());
    }

    #[test]
    fn test_contains_exactly_the_items_from() {
        let host = host();
        assert!(
            contains_exactly_the_items_from(&host, &json!(["a", "b", "b"]), &json!(["b", "a", "b"]))
                .unwrap()
        );
        assert!(
            !contains_exactly_the_items_from(&host, &json!(["a", "b"]), &json!(["a", "b", "b"]))
                .unwrap()
        );
        assert!(
            !contains_exactly_the_items_from(&host, &json!(["a", "b", "b"]), &json!(["a", "b"]))
                .unwrap()
        );
        assert!(contains_exactly_the_items_from(&host, &json!(["x"]), &json!("X")).unwrap());
    }

    #[test]
    fn test_does_not_contain_item() {
        let host = host();
        assert!(does_not_contain_item(&host, &json!(["a"]), &json!("b")).unwrap());
        assert!(!does_not_contain_item(&host, &json!(["a"]), &json!("A")).unwrap());

        let err = does_not_contain_item(&host, &json!(["a"]), &json!(["x", "y"])).unwrap_err();
        assert!(matches!(err, KeywordError::UnsupportedOperand(_)));
        assert_eq!(err.to_string(), "List-like items not accepted as right side value");
    }
}

//! Helpers for the dynamic values passed between keywords

use serde_json::Value;
use std::fmt;

/// Coarse type of a value, used to pick type converters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Null => write!(f, "None"),
            ValueKind::Bool => write!(f, "bool"),
            ValueKind::Number => write!(f, "number"),
            ValueKind::String => write!(f, "string"),
            ValueKind::Array => write!(f, "list"),
            ValueKind::Object => write!(f, "dictionary"),
        }
    }
}

/// Human-readable form of a value.
///
/// Text is shown as is, everything else in compact JSON notation.
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

/// Tokens joined by single spaces
pub fn join_display(values: &[Value]) -> String {
    values.iter().map(display).collect::<Vec<_>>().join(" ")
}

/// A value counts as true when its text reads `true`, in any case
pub fn is_true(value: &Value) -> bool {
    display(value).to_lowercase() == "true"
}

/// Arrays and objects are list-like; text is not
pub fn is_list_like(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// Case-insensitive normal form of a text.
///
/// Lower-cases and folds `ß` to `ss`, so `Robotstraße` and `ROBOTSTRASSE`
/// compare equal.
pub fn casefold(text: &str) -> String {
    text.to_lowercase().replace('ß', "ss")
}

/// Number of items in a sized value
pub fn len_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        _ => None,
    }
}

/// Items of an iterable value: array elements, characters of a text, keys
/// of an object
pub fn items_of(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.clone()),
        Value::String(s) => Some(s.chars().map(|c| Value::String(c.to_string())).collect()),
        Value::Object(map) => Some(map.keys().cloned().map(Value::String).collect()),
        _ => None,
    }
}

/// Shorten `text` to `head` + `...` + `tail` characters when it is longer
/// than `head + tail + 3`
pub fn truncate_middle(text: &str, head: usize, tail: usize) -> String {
    let count = text.chars().count();
    if count <= head + tail + 3 {
        return text.to_string();
    }
    let start: String = text.chars().take(head).collect();
    let end: String = text.chars().skip(count - tail).collect();
    format!("{}...{}", start, end)
}

// SPDX-License-Identifier: MIT

//! Variable storage and `${name}` substitution

use crate::host::value::display;
use crate::host::KeywordError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Number, Value};
use std::collections::HashMap;

static VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\\?)[$@&]\{([^{}]+)\}").expect("variable pattern is valid"));

static WHOLE_VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[$@&]\{([^{}]+)\}$").expect("variable pattern is valid"));

/// Variable names compare case-insensitively, ignoring spaces and underscores
fn normalize_name(name: &str) -> String {
    let bare = WHOLE_VARIABLE
        .captures(name.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(name);
    bare.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Variables visible to a check
#[derive(Debug, Clone, Default)]
pub struct VariableScope {
    values: HashMap<String, Value>,
}

impl VariableScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable. `name` may be bare or decorated: `count` and
    /// `${count}` address the same variable.
    pub fn set(&mut self, name: &str, value: Value) {
        self.values.insert(normalize_name(name), value);
    }

    /// Get a variable value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(&normalize_name(name))
    }

    /// Get a nested value using dot notation (e.g., "result.items.0")
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.get(parts.next()?)?;
        for part in parts {
            current = match current {
                Value::Array(items) => items.get(part.trim().parse::<usize>().ok()?)?,
                other => other.get(part.trim())?,
            };
        }
        Some(current)
    }

    /// Resolve the text between `${` and `}`
    pub fn resolve(&self, name: &str) -> Result<Value, KeywordError> {
        let trimmed = name.trim();
        if let Some(value) = builtin(trimmed) {
            return Ok(value);
        }
        self.get_path(trimmed)
            .cloned()
            .ok_or_else(|| KeywordError::VariableNotFound(format!("${{{}}}", trimmed)))
    }

    /// Substitute variables in a value.
    ///
    /// A text consisting of a single variable becomes that variable's value
    /// with its own type; variables inside longer text are interpolated.
    /// Non-text values are returned unchanged.
    pub fn replace(&self, value: &Value) -> Result<Value, KeywordError> {
        let text = match value {
            Value::String(text) => text,
            other => return Ok(other.clone()),
        };

        if let Some(caps) = WHOLE_VARIABLE.captures(text) {
            return self.resolve(&caps[1]);
        }

        let mut failure = None;
        let replaced = VARIABLE.replace_all(text, |caps: &Captures| {
            if !caps[1].is_empty() {
                return caps[0][1..].to_string();
            }
            match self.resolve(&caps[2]) {
                Ok(value) => display(&value),
                Err(e) => {
                    failure.get_or_insert(e);
                    String::new()
                }
            }
        });

        match failure {
            Some(e) => Err(e),
            None => Ok(Value::String(replaced.into_owned())),
        }
    }
}

fn builtin(name: &str) -> Option<Value> {
    match name.to_lowercase().as_str() {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        "none" | "null" => return Some(Value::Null),
        "empty" => return Some(Value::String(String::new())),
        "space" => return Some(Value::String(" ".to_string())),
        _ => {}
    }
    if let Ok(int) = name.parse::<i64>() {
        return Some(Value::Number(int.into()));
    }
    name.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

// SPDX-License-Identifier: MIT

//! Time string conversion
//!
//! Accepts the formats test authors write after `within`:
//! - plain numbers in seconds: `5`, `1.5`
//! - timer format: `01:30`, `00:01:30.250`, `-00:00:02`
//! - unit strings: `1 minute 30 seconds`, `2h 5min`, `300 ms`

use super::error::KeywordError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static UNIT_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d*)?|\.\d+)([a-zμ]+)").expect("unit pattern is valid")
});

/// Convert a time value to seconds
pub fn value_to_secs(value: &Value) -> Result<f64, KeywordError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| KeywordError::InvalidTime(n.to_string())),
        Value::String(s) => timestr_to_secs(s),
        other => Err(KeywordError::InvalidTime(other.to_string())),
    }
}

/// Convert a time string to seconds
pub fn timestr_to_secs(text: &str) -> Result<f64, KeywordError> {
    let invalid = || KeywordError::InvalidTime(text.to_string());
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    if let Ok(secs) = trimmed.parse::<f64>() {
        return if secs.is_finite() { Ok(secs) } else { Err(invalid()) };
    }

    let (sign, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest.trim()),
        None => (1.0, trimmed),
    };

    let secs = if body.contains(':') {
        timer_to_secs(body)
    } else {
        units_to_secs(body)
    };
    secs.map(|s| sign * s).ok_or_else(invalid)
}

fn timer_to_secs(body: &str) -> Option<f64> {
    let parts: Vec<&str> = body.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }
    let mut secs = 0.0;
    for (index, part) in parts.iter().enumerate() {
        let is_last = index == parts.len() - 1;
        if part.is_empty() || (!is_last && part.contains('.')) {
            return None;
        }
        let value: f64 = part.parse().ok()?;
        if value < 0.0 {
            return None;
        }
        secs = secs * 60.0 + value;
    }
    Some(secs)
}

fn units_to_secs(body: &str) -> Option<f64> {
    let normalized: String = body
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let mut consumed = 0;
    let mut secs = 0.0;
    for caps in UNIT_PART.captures_iter(&normalized) {
        let whole = caps.get(0)?;
        if whole.start() != consumed {
            return None;
        }
        consumed = whole.end();

        let amount: f64 = caps[1].parse().ok()?;
        secs += amount * unit_factor(&caps[2])?;
    }

    if consumed == 0 || consumed != normalized.len() {
        return None;
    }
    Some(secs)
}

fn unit_factor(unit: &str) -> Option<f64> {
    let factor = match unit {
        "d" | "day" | "days" => 86_400.0,
        "h" | "hour" | "hours" => 3_600.0,
        "m" | "min" | "mins" | "minute" | "minutes" => 60.0,
        "s" | "sec" | "secs" | "second" | "seconds" => 1.0,
        "ms" | "millis" | "millisecond" | "milliseconds" => 1e-3,
        "us" | "μs" | "micros" | "microsecond" | "microseconds" => 1e-6,
        "ns" | "nanos" | "nanosecond" | "nanoseconds" => 1e-9,
        _ => return None,
    };
    Some(factor)
}

/// Format seconds as a verbose time string, e.g. `1 minute 30 seconds`
pub fn secs_to_timestr(secs: f64) -> String {
    let negative = secs < 0.0;
    let mut millis = (secs.abs() * 1000.0).round() as u64;

    let units = [
        ("day", 86_400_000),
        ("hour", 3_600_000),
        ("minute", 60_000),
        ("second", 1_000),
        ("millisecond", 1),
    ];

    let mut parts = Vec::new();
    for (name, size) in units {
        let amount = millis / size;
        millis %= size;
        if amount > 0 {
            let plural = if amount == 1 { "" } else { "s" };
            parts.push(format!("{} {}{}", amount, name, plural));
        }
    }

    if parts.is_empty() {
        return "0 seconds".to_string();
    }
    let text = parts.join(" ");
    if negative {
        format!("- {}", text)
    } else {
        text
    }
}

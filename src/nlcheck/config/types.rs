// SPDX-License-Identifier: MIT

//! Configuration schema for the check engine
//!
//! Every field has a default, so an empty document is a valid
//! configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::env;

/// Environment variable overriding [`PollingConfig::max_delay`]
pub const ENV_POLL_MAX: &str = "NLCHECK_POLL_MAX";
/// Environment variable overriding [`PollingConfig::min_fraction`]
pub const ENV_POLL_MIN_FRACTION: &str = "NLCHECK_POLL_MIN_FRACTION";

/// Top-level configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct CheckConfig {
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub interactive: InteractiveConfig,
    /// Variables available to every check
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,
}

/// Retry schedule for checks with a time constraint
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PollingConfig {
    /// Longest delay between two attempts, in seconds
    #[serde(default = "default_max_delay")]
    pub max_delay: f64,
    /// Shortest delay as a fraction of the timeout
    #[serde(default = "default_min_fraction")]
    pub min_fraction: f64,
    /// The shortest delay never exceeds `max_delay / min_divisor`
    #[serde(default = "default_min_divisor")]
    pub min_divisor: f64,
}

/// Shape of operand values in reports
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReportConfig {
    /// Leading characters kept from a long value
    #[serde(default = "default_head")]
    pub head: usize,
    /// Trailing characters kept from a long value
    #[serde(default = "default_tail")]
    pub tail: usize,
}

/// Interactive keyword mode
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct InteractiveConfig {
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Inputs that leave interactive mode, compared case-insensitively
    #[serde(default = "default_exit_commands")]
    pub exit_commands: Vec<String>,
}

fn default_max_delay() -> f64 {
    20.0
}

fn default_min_fraction() -> f64 {
    0.03
}

fn default_min_divisor() -> f64 {
    8.0
}

fn default_head() -> usize {
    40
}

fn default_tail() -> usize {
    40
}

fn default_prompt() -> String {
    "Enter a keyword. Arguments can be separated using multi-space. \
     Type 'exit' or a blank keyword to exit interactive mode."
        .to_string()
}

fn default_exit_commands() -> Vec<String> {
    ["exit", "quit", "stop", "e", "x", "q"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_delay: default_max_delay(),
            min_fraction: default_min_fraction(),
            min_divisor: default_min_divisor(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            head: default_head(),
            tail: default_tail(),
        }
    }
}

impl Default for InteractiveConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            exit_commands: default_exit_commands(),
        }
    }
}

impl InteractiveConfig {
    pub fn is_exit_command(&self, input: &str) -> bool {
        let input = input.trim();
        self.exit_commands
            .iter()
            .any(|cmd| cmd.eq_ignore_ascii_case(input))
    }
}

impl CheckConfig {
    /// Apply `NLCHECK_POLL_*` environment overrides. Unparsable values are
    /// logged and ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(max) = env_f64(ENV_POLL_MAX) {
            self.polling.max_delay = max;
        }
        if let Some(fraction) = env_f64(ENV_POLL_MIN_FRACTION) {
            self.polling.min_fraction = fraction;
        }
    }
}

fn env_f64(name: &str) -> Option<f64> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => {
            log::warn!("Ignoring {}={}: not a non-negative number", name, raw);
            None
        }
    }
}

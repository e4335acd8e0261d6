// SPDX-License-Identifier: MIT

//! Host module - the services checks need from a keyword-driven test framework
//!
//! The check engine never executes keywords itself. It resolves names,
//! invokes keywords, substitutes variables, converts types and talks to the
//! user through the [`Host`] trait:
//! - [keyword] - the `Keyword` trait and small keyword adapters
//! - [convert] - type converters used for comparisons
//! - [timestr] - time string parsing and formatting
//! - [console] - line-based user interaction
//! - [value] - helpers for the dynamic `serde_json::Value` tokens

pub mod console;
pub mod convert;
pub mod error;
pub mod keyword;
pub mod timestr;
pub mod value;

pub use convert::TypeConverter;
pub use error::{CheckError, CheckFailure, ConversionError, KeywordError};
pub use keyword::Keyword;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Outcome of looking up a keyword name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one keyword matches
    Found,
    /// Several keywords match; the name still routes as a keyword call
    Ambiguous,
    /// No keyword matches
    NotFound,
}

impl Resolution {
    pub fn is_keyword(self) -> bool {
        !matches!(self, Resolution::NotFound)
    }
}

/// Services provided by the test framework hosting the checks
#[async_trait]
pub trait Host: Send + Sync {
    /// Look up whether `name` names a keyword
    async fn resolve_keyword(&self, name: &str) -> Resolution;

    /// Invoke a keyword by name
    async fn run_keyword(&self, name: &str, args: Vec<Value>) -> Result<Value, KeywordError>;

    /// Substitute variables in a value. Values without variable syntax are
    /// returned unchanged.
    fn replace_variables(&self, value: &Value) -> Result<Value, KeywordError>;

    /// Converter for text compared against a value shaped like `like`
    fn converter_for(&self, like: &Value) -> Option<Arc<dyn TypeConverter>>;

    /// Convert a time value to seconds
    fn parse_duration(&self, value: &Value) -> Result<f64, KeywordError> {
        timestr::value_to_secs(value)
    }

    /// Format seconds for reports
    fn format_duration(&self, secs: f64) -> String {
        timestr::secs_to_timestr(secs)
    }

    /// Write to the test log
    fn log(&self, message: &str, level: log::Level) {
        log::log!(target: "nlcheck", level, "{}", message);
    }

    /// Write directly to the user's console
    fn log_to_console(&self, message: &str);

    /// Ask a yes/no question
    async fn prompt_yes_no(&self, message: &str) -> bool;

    /// Ask for a line of text; `None` means cancelled
    async fn prompt_string(&self, message: &str) -> Option<String>;

    /// Suspend until the user confirms
    async fn prompt_acknowledge(&self, message: &str);
}

// SPDX-License-Identifier: MIT

//! Typed error handling for nlcheck-rs
//!
//! Keywords, the check engine and the host all report failures through
//! [`KeywordError`]. Check-specific outcomes live in [`CheckError`] and
//! failed type coercions in [`ConversionError`].

use thiserror::Error;

/// Top-level error type for keyword invocations
#[derive(Debug, Error)]
pub enum KeywordError {
    /// No keyword registered under the requested name
    #[error("No keyword with name '{name}' found.")]
    NotFound { name: String },

    /// More than one keyword matches the requested name
    #[error("Multiple keywords with name '{name}' found. Give the full name of the keyword you want to use: {}", candidates.join(", "))]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },

    /// Wrong number of arguments passed to a keyword
    #[error("Keyword '{name}' expected {expected} arguments, got {given}.")]
    Arguments {
        name: String,
        expected: String,
        given: usize,
    },

    /// `${name}` could not be resolved
    #[error("Variable '{0}' not found.")]
    VariableNotFound(String),

    /// A duration could not be parsed
    #[error("Invalid time string '{0}'.")]
    InvalidTime(String),

    /// An operation was applied to values of the wrong type
    #[error("{0}")]
    Type(String),

    /// Right-hand side operand the operator refuses to interpret
    #[error("{0}")]
    UnsupportedOperand(String),

    /// Explicit conversion failures surfaced to the caller
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Check outcomes (empty, malformed or failed checks)
    #[error(transparent)]
    Check(#[from] CheckError),

    /// Generic keyword failure
    #[error("{0}")]
    Failed(String),
}

/// Errors raised by the check keywords themselves
#[derive(Debug, Error)]
pub enum CheckError {
    /// Nothing left to check after removing the time constraint
    #[error("{check_type} check failed. There was nothing to check.")]
    Empty { check_type: String },

    /// A multi-token check without an operator keyword
    #[error("Missing operator in check keyword")]
    MissingOperator,

    /// The verdict did not reach `Passed` within the time budget
    #[error("{}", .0.report)]
    Failed(CheckFailure),
}

/// A failed check together with its severity
#[derive(Debug, Clone, PartialEq)]
pub struct CheckFailure {
    pub report: String,
    /// `true` for requirement checks, `false` for pre- and postconditions
    pub continue_on_failure: bool,
}

/// Text could not be converted to the requested type
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConversionError {
    #[error("Argument '{value}' cannot be converted to {type_name}.")]
    Invalid { value: String, type_name: String },
}

impl KeywordError {
    /// Create a type error
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type(message.into())
    }

    /// Create an argument count error
    pub fn arguments(name: impl Into<String>, expected: impl Into<String>, given: usize) -> Self {
        Self::Arguments {
            name: name.into(),
            expected: expected.into(),
            given,
        }
    }

    /// Create a generic failure
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// The failed check carried by this error, if any
    pub fn check_failure(&self) -> Option<&CheckFailure> {
        match self {
            Self::Check(CheckError::Failed(failure)) => Some(failure),
            _ => None,
        }
    }

    /// Whether remaining test steps may still run after this error.
    ///
    /// Only requirement-style check failures allow that; every other
    /// error stops the test.
    pub fn continue_on_failure(&self) -> bool {
        self.check_failure()
            .map(|failure| failure.continue_on_failure)
            .unwrap_or(false)
    }
}

impl CheckFailure {
    pub fn new(report: impl Into<String>, continue_on_failure: bool) -> Self {
        Self {
            report: report.into(),
            continue_on_failure,
        }
    }
}

impl ConversionError {
    pub fn invalid(value: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::Invalid {
            value: value.into(),
            type_name: type_name.into(),
        }
    }
}

impl From<&str> for KeywordError {
    fn from(s: &str) -> Self {
        Self::Failed(s.to_string())
    }
}

impl From<String> for KeywordError {
    fn from(s: String) -> Self {
        Self::Failed(s)
    }
}

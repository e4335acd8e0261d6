// SPDX-License-Identifier: MIT

//! Parsed form of a check statement

use serde_json::Value;
use std::fmt;

/// The kind of check, used in reports and to decide failure severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// `Check that`; failures let the test continue
    Requirement,
    /// `Check precondition`; failures stop the test
    Precondition,
    /// `Check postcondition`; failures stop the test
    Postcondition,
}

impl CheckKind {
    pub fn continue_on_failure(self) -> bool {
        matches!(self, CheckKind::Requirement)
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Requirement => write!(f, "Requirement"),
            CheckKind::Precondition => write!(f, "Precondition"),
            CheckKind::Postcondition => write!(f, "Postcondition"),
        }
    }
}

/// A check expression split into operands and operator
#[derive(Debug, Clone, PartialEq)]
pub enum CheckExpression {
    /// Operand whose value must read `true`
    Boolean(Vec<Value>),
    /// Operator keyword applied to a single operand, e.g. `suitcase  is empty`
    Unary { operator: String, operand: Vec<Value> },
    /// `left operator right`
    Binary {
        left: Vec<Value>,
        operator: String,
        right: Vec<Value>,
    },
}

impl CheckExpression {
    /// The left (or only) operand
    pub fn left(&self) -> &[Value] {
        match self {
            CheckExpression::Boolean(operand) => operand,
            CheckExpression::Unary { operand, .. } => operand,
            CheckExpression::Binary { left, .. } => left,
        }
    }

    pub fn operator(&self) -> Option<&str> {
        match self {
            CheckExpression::Boolean(_) => None,
            CheckExpression::Unary { operator, .. } | CheckExpression::Binary { operator, .. } => {
                Some(operator)
            }
        }
    }

    pub fn right(&self) -> Option<&[Value]> {
        match self {
            CheckExpression::Binary { right, .. } => Some(right),
            _ => None,
        }
    }
}

/// Trailing `within <duration>` of a check
#[derive(Debug, Clone, PartialEq)]
pub struct TimeConstraint {
    pub seconds: f64,
    /// The duration token as written
    pub raw: Value,
}

/// A check statement ready for evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCheck {
    pub expression: CheckExpression,
    pub time_constraint: Option<TimeConstraint>,
}

impl ParsedCheck {
    /// Timeout in seconds; zero without a time constraint
    pub fn timeout(&self) -> f64 {
        self.time_constraint
            .as_ref()
            .map(|tc| tc.seconds)
            .unwrap_or(0.0)
    }
}

/// Outcome of one evaluation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed,
}

impl Verdict {
    pub fn from_bool(passed: bool) -> Self {
        if passed {
            Verdict::Passed
        } else {
            Verdict::Failed
        }
    }

    pub fn is_passed(self) -> bool {
        self == Verdict::Passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_kind_display() {
        assert_eq!(format!("{}", CheckKind::Requirement), "Requirement");
        assert_eq!(format!("{}", CheckKind::Precondition), "Precondition");
        assert_eq!(format!("{}", CheckKind::Postcondition), "Postcondition");
    }

    #[test]
    fn test_severity() {
        assert!(CheckKind::Requirement.continue_on_failure());
        assert!(!CheckKind::Precondition.continue_on_failure());
        assert!(!CheckKind::Postcondition.continue_on_failure());
    }

    #[test]
    fn test_expression_accessors() {
        let expr = CheckExpression::Binary {
            left: vec![json!("floor")],
            operator: "=".to_string(),
            right: vec![json!("3")],
        };
        assert_eq!(expr.left(), &[json!("floor")]);
        assert_eq!(expr.operator(), Some("="));
        assert_eq!(expr.right(), Some(&[json!("3")][..]));

        let expr = CheckExpression::Boolean(vec![json!("True")]);
        assert_eq!(expr.operator(), None);
        assert_eq!(expr.right(), None);
    }

    #[test]
    fn test_timeout_defaults_to_zero() {
        let check = ParsedCheck {
            expression: CheckExpression::Boolean(vec![json!("True")]),
            time_constraint: None,
        };
        assert_eq!(check.timeout(), 0.0);
    }
}

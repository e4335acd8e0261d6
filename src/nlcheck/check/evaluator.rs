// SPDX-License-Identifier: MIT

//! Operand and expression evaluation

use super::expression::{CheckExpression, Verdict};
use super::resolver::is_keyword;
use crate::host::value::{display, is_true, join_display, truncate_middle};
use crate::host::{Host, KeywordError};
use crate::nlcheck::config::ReportConfig;
use serde_json::Value;

/// Value of an operand together with its report text
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub value: Value,
    /// Tokens as written, followed by ` [<value>]` when a value was computed
    pub display: String,
}

/// Result of evaluating a whole check expression once
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub verdict: Verdict,
    pub left: Evaluation,
    pub right: Option<Evaluation>,
}

/// Evaluates operands as keyword calls, variables or fixed values
#[derive(Debug, Clone)]
pub struct OperandEvaluator {
    head: usize,
    tail: usize,
}

impl OperandEvaluator {
    pub fn new(report: &ReportConfig) -> Self {
        Self {
            head: report.head,
            tail: report.tail,
        }
    }

    /// Evaluate one operand.
    ///
    /// A leading keyword is run with the remaining tokens as arguments. A
    /// single other token gets its variables replaced; several tokens form
    /// a list.
    pub async fn evaluate(
        &self,
        host: &dyn Host,
        operand: &[Value],
    ) -> Result<Evaluation, KeywordError> {
        let first = operand
            .first()
            .ok_or_else(|| KeywordError::failed("Cannot evaluate an empty operand"))?;
        let tokens = join_display(operand);

        let (value, value_text) = if is_keyword(host, first).await {
            let value = host.run_keyword(&display(first), operand[1..].to_vec()).await?;
            let text = display(&value);
            host.log(&format!("'{}' is '{}'", tokens, text), log::Level::Info);
            (value, Some(text))
        } else if operand.len() == 1 {
            let value = host.replace_variables(first)?;
            if &value == first {
                host.log(
                    &format!("Interpreting '{}' as fixed value", tokens),
                    log::Level::Debug,
                );
                (value, None)
            } else {
                let text = display(&value);
                host.log(
                    &format!("Interpreting '{}' as fixed value '{}'", tokens, text),
                    log::Level::Debug,
                );
                (value, Some(text))
            }
        } else {
            let items = operand
                .iter()
                .map(|token| host.replace_variables(token))
                .collect::<Result<Vec<_>, _>>()?;
            let value = Value::Array(items);
            let text = display(&value);
            host.log(
                &format!("Interpreting '{}' as list '{}'", tokens, text),
                log::Level::Debug,
            );
            (value, Some(text))
        };

        let display = match value_text.filter(|text| !text.is_empty()) {
            Some(text) => format!(
                "{} [{}]",
                tokens,
                truncate_middle(&text, self.head, self.tail)
            ),
            None => tokens,
        };
        Ok(Evaluation { value, display })
    }

    /// Evaluate both operands and apply the operator
    pub async fn evaluate_expression(
        &self,
        host: &dyn Host,
        expression: &CheckExpression,
    ) -> Result<Attempt, KeywordError> {
        match expression {
            CheckExpression::Boolean(operand) => {
                host.log(
                    &format!("Evaluating boolean expression: {}", join_display(operand)),
                    log::Level::Info,
                );
                let left = self.evaluate(host, operand).await?;
                Ok(Attempt {
                    verdict: Verdict::from_bool(is_true(&left.value)),
                    left,
                    right: None,
                })
            }
            CheckExpression::Unary { operator, operand } => {
                let left = self.evaluate(host, operand).await?;
                host.log(
                    &format!("Evaluating '{}' '{}'", operator, display(&left.value)),
                    log::Level::Info,
                );
                let result = host.run_keyword(operator, vec![left.value.clone()]).await?;
                Ok(Attempt {
                    verdict: Verdict::from_bool(is_true(&result)),
                    left,
                    right: None,
                })
            }
            CheckExpression::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(host, left).await?;
                let right = self.evaluate(host, right).await?;
                host.log(
                    &format!(
                        "Evaluating '{}' {} '{}'",
                        display(&left.value),
                        operator,
                        display(&right.value)
                    ),
                    log::Level::Info,
                );
                let result = host
                    .run_keyword(operator, vec![left.value.clone(), right.value.clone()])
                    .await?;
                Ok(Attempt {
                    verdict: Verdict::from_bool(is_true(&result)),
                    left,
                    right: Some(right),
                })
            }
        }
    }
}

impl Default for OperandEvaluator {
    fn default() -> Self {
        Self::new(&ReportConfig::default())
    }
}

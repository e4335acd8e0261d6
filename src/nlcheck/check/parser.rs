// SPDX-License-Identifier: MIT

//! Check argument parser
//!
//! Splits the arguments of a check keyword into operands, operator and an
//! optional time constraint:
//! - `suitcase  is empty`
//! - `elevator floor  equals  3  within  20 seconds`
//! - `condition is true  within  1 minute 30 seconds`

use super::evaluator::OperandEvaluator;
use super::expression::{CheckExpression, CheckKind, ParsedCheck, TimeConstraint};
use super::resolver::is_keyword;
use crate::host::value::display;
use crate::host::{CheckError, Host, KeywordError};
use serde_json::Value;

/// Parse check arguments into a [`ParsedCheck`]
pub async fn parse(
    host: &dyn Host,
    evaluator: &OperandEvaluator,
    kind: CheckKind,
    mut args: Vec<Value>,
) -> Result<ParsedCheck, KeywordError> {
    let mut time_constraint = None;
    if args.len() >= 2 && display(&args[args.len() - 2]).to_lowercase() == "within" {
        if let Some(raw) = args.pop() {
            args.pop();
            let evaluated = evaluator.evaluate(host, std::slice::from_ref(&raw)).await?;
            let seconds = host.parse_duration(&evaluated.value)?;
            time_constraint = Some(TimeConstraint { seconds, raw });
        }
    }

    if args.is_empty() {
        return Err(CheckError::Empty {
            check_type: kind.to_string(),
        }
        .into());
    }

    let expression = split_expression(host, args).await?;
    Ok(ParsedCheck {
        expression,
        time_constraint,
    })
}

async fn split_expression(
    host: &dyn Host,
    args: Vec<Value>,
) -> Result<CheckExpression, KeywordError> {
    let mut keywords = Vec::with_capacity(args.len());
    for arg in &args {
        keywords.push(is_keyword(host, arg).await);
    }

    // A lone token, or a keyword call without any other keyword in its arguments
    if args.len() == 1 || (keywords[0] && !keywords[1..].iter().any(|k| *k)) {
        return Ok(CheckExpression::Boolean(args));
    }

    // The first token always belongs to the left operand
    let operator_at = keywords
        .iter()
        .skip(1)
        .position(|k| *k)
        .map(|i| i + 1)
        .ok_or(CheckError::MissingOperator)?;

    let mut left = args;
    let mut right = left.split_off(operator_at);
    let operator = display(&right.remove(0));

    if right.is_empty() {
        Ok(CheckExpression::Unary {
            operator,
            operand: left,
        })
    } else {
        Ok(CheckExpression::Binary {
            left,
            operator,
            right,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlcheck::check::test_support::runtime_with;
    use serde_json::json;

    fn tokens(items: &[&str]) -> Vec<Value> {
        items.iter().map(|s| json!(s)).collect()
    }

    async fn parse_tokens(items: &[&str]) -> Result<ParsedCheck, KeywordError> {
        let rt = runtime_with(&["suitcase", "kwA", "kwB", "Two times"]).await;
        parse(
            &rt,
            &OperandEvaluator::default(),
            CheckKind::Requirement,
            tokens(items),
        )
        .await
    }

    #[tokio::test]
    async fn test_single_token_is_boolean() {
        let parsed = parse_tokens(&["True"]).await.unwrap();
        assert_eq!(parsed.expression, CheckExpression::Boolean(tokens(&["True"])));
        assert!(parsed.time_constraint.is_none());
    }

    #[tokio::test]
    async fn test_keyword_with_plain_args_is_boolean() {
        let parsed = parse_tokens(&["Two times", "3", "6"]).await.unwrap();
        assert_eq!(
            parsed.expression,
            CheckExpression::Boolean(tokens(&["Two times", "3", "6"]))
        );
    }

    #[tokio::test]
    async fn test_binary() {
        let parsed = parse_tokens(&["Two times", "6", "equals", "12"]).await.unwrap();
        assert_eq!(
            parsed.expression,
            CheckExpression::Binary {
                left: tokens(&["Two times", "6"]),
                operator: "equals".to_string(),
                right: tokens(&["12"]),
            }
        );
    }

    #[tokio::test]
    async fn test_unary() {
        let parsed = parse_tokens(&["suitcase", "is empty"]).await.unwrap();
        assert_eq!(
            parsed.expression,
            CheckExpression::Unary {
                operator: "is empty".to_string(),
                operand: tokens(&["suitcase"]),
            }
        );
    }

    #[tokio::test]
    async fn test_first_token_always_opens_left_operand() {
        // A literal that happens to be followed by a keyword
        let parsed = parse_tokens(&["7", "=", "7"]).await.unwrap();
        assert_eq!(parsed.expression.left(), &tokens(&["7"])[..]);
        assert_eq!(parsed.expression.operator(), Some("="));

        // Two keywords never collapse into a single boolean operand
        let parsed = parse_tokens(&["kwA", "kwB"]).await.unwrap();
        assert_eq!(
            parsed.expression,
            CheckExpression::Unary {
                operator: "kwB".to_string(),
                operand: tokens(&["kwA"]),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_operator() {
        let err = parse_tokens(&["a", "b", "c"]).await.unwrap_err();
        assert!(matches!(err, KeywordError::Check(CheckError::MissingOperator)));
        assert_eq!(err.to_string(), "Missing operator in check keyword");
    }

    #[tokio::test]
    async fn test_time_constraint() {
        let parsed = parse_tokens(&["suitcase", "is empty", "WITHIN", "1 minute 30 seconds"])
            .await
            .unwrap();
        let tc = parsed.time_constraint.unwrap();
        assert_eq!(tc.seconds, 90.0);
        assert_eq!(tc.raw, json!("1 minute 30 seconds"));
        assert!(matches!(parsed.expression, CheckExpression::Unary { .. }));

        let parsed = parse_tokens(&["True", "within", "00:00:05"]).await.unwrap();
        assert_eq!(parsed.timeout(), 5.0);
    }

    #[tokio::test]
    async fn test_nothing_to_check() {
        let rt = runtime_with(&[]).await;
        let err = parse(
            &rt,
            &OperandEvaluator::default(),
            CheckKind::Precondition,
            tokens(&["within", "5s"]),
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Precondition check failed. There was nothing to check."
        );

        let err = parse(&rt, &OperandEvaluator::default(), CheckKind::Requirement, vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, KeywordError::Check(CheckError::Empty { .. })));
    }

    #[tokio::test]
    async fn test_invalid_duration() {
        let err = parse_tokens(&["True", "within", "soon"]).await.unwrap_err();
        assert!(matches!(err, KeywordError::InvalidTime(_)));
    }
}

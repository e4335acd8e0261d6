// SPDX-License-Identifier: MIT

//! Check engine - parses, evaluates, retries and reports checks

use super::evaluator::{Attempt, OperandEvaluator};
use super::expression::{CheckExpression, CheckKind, ParsedCheck};
use super::parser;
use super::scheduler::{PollOutcome, RetryScheduler};
use crate::host::value::display;
use crate::host::{CheckError, CheckFailure, Host, KeywordError};
use crate::nlcheck::config::CheckConfig;
use serde_json::Value;

/// Runs checks against a host
#[derive(Debug, Clone)]
pub struct CheckEngine {
    config: CheckConfig,
    evaluator: OperandEvaluator,
    scheduler: RetryScheduler,
}

impl CheckEngine {
    pub fn new(config: CheckConfig) -> Self {
        let evaluator = OperandEvaluator::new(&config.report);
        let scheduler = RetryScheduler::new(&config.polling);
        Self {
            config,
            evaluator,
            scheduler,
        }
    }

    /// Verify a requirement. A failure lets the remaining test steps run.
    pub async fn check_that(&self, host: &dyn Host, args: Vec<Value>) -> Result<String, KeywordError> {
        self.check(host, CheckKind::Requirement, args).await
    }

    /// Verify a condition the test relies on. A failure stops the test.
    pub async fn check_precondition(
        &self,
        host: &dyn Host,
        args: Vec<Value>,
    ) -> Result<String, KeywordError> {
        self.check(host, CheckKind::Precondition, args).await
    }

    /// Verify a condition the test must leave behind. A failure stops the
    /// test.
    pub async fn check_postcondition(
        &self,
        host: &dyn Host,
        args: Vec<Value>,
    ) -> Result<String, KeywordError> {
        self.check(host, CheckKind::Postcondition, args).await
    }

    /// Run a check and return its report when it passes
    pub async fn check(
        &self,
        host: &dyn Host,
        kind: CheckKind,
        args: Vec<Value>,
    ) -> Result<String, KeywordError> {
        let parsed = parser::parse(host, &self.evaluator, kind, args).await?;

        let evaluator = &self.evaluator;
        let expression = &parsed.expression;
        let poll = self
            .scheduler
            .run(parsed.timeout(), move || {
                evaluator.evaluate_expression(host, expression)
            })
            .await?;

        let report = self.report(host, kind, &parsed, &poll);
        if poll.outcome.verdict.is_passed() && !poll.timed_out {
            host.log(&report, log::Level::Info);
            Ok(report)
        } else {
            Err(CheckError::Failed(CheckFailure::new(report, kind.continue_on_failure())).into())
        }
    }

    fn report(
        &self,
        host: &dyn Host,
        kind: CheckKind,
        parsed: &ParsedCheck,
        poll: &PollOutcome<Attempt>,
    ) -> String {
        let left = &poll.outcome.left.display;
        let mut report = match &parsed.expression {
            CheckExpression::Boolean(_) => format!("{} check on '{}'", kind, left),
            CheckExpression::Unary { operator, .. } => {
                format!("{} check on '{} {}'", kind, operator, left)
            }
            CheckExpression::Binary { operator, .. } => {
                let right = poll
                    .outcome
                    .right
                    .as_ref()
                    .map(|r| r.display.as_str())
                    .unwrap_or_default();
                format!("{} check on '{} {} {}'", kind, left, operator, right)
            }
        };

        if let Some(constraint) = &parsed.time_constraint {
            report.push_str(" within ");
            report.push_str(&host.format_duration(constraint.seconds));
            if poll.timed_out {
                report.push_str(" (too late)");
            }
        }
        report
    }

    /// Ask the user to verify something by hand.
    ///
    /// Without a question, execution just pauses until the user continues.
    pub async fn check_manual(&self, host: &dyn Host, question: &str) -> Result<String, KeywordError> {
        if question.trim().is_empty() {
            host.prompt_acknowledge("Test execution suspended. Press ENTER to continue")
                .await;
            host.log("Continued by user", log::Level::Info);
            return Ok("Continued by user".to_string());
        }

        let passed = host
            .prompt_yes_no(&format!(
                "Test execution suspended for manual check. (enter yes or y to pass)\n\n{}",
                question
            ))
            .await;
        let report = format!(
            "Manual check on '{}' [{}]",
            question,
            if passed { "pass" } else { "fail" }
        );
        if passed {
            host.log(&report, log::Level::Info);
            Ok(report)
        } else {
            Err(CheckError::Failed(CheckFailure::new(report, true)).into())
        }
    }

    /// Accept keyword calls from the user until an exit command or blank
    /// input. Keyword errors are shown and never end the session.
    ///
    /// Returns the number of keyword calls made.
    pub async fn check_interactive(&self, host: &dyn Host) -> usize {
        let interactive = &self.config.interactive;
        let mut calls = 0;

        loop {
            let input = match host.prompt_string(&interactive.prompt).await {
                Some(line) if !line.trim().is_empty() && !interactive.is_exit_command(&line) => line,
                _ => break,
            };
            host.log_to_console(&format!("Interactive input: {}", input));

            let parts = split_interactive(&input);
            let Some((name, args)) = parts.split_first() else {
                continue;
            };
            let args = args.iter().map(|a| Value::String(a.clone())).collect();

            calls += 1;
            match host.run_keyword(name, args).await {
                Ok(Value::Null) => {}
                Ok(value) => host.log_to_console(&display(&value)),
                Err(e) => host.log_to_console(&format!(
                    "Error in interactive keyword '{}'\n\n{}",
                    input, e
                )),
            }
        }

        host.log(
            &format!("Interactive mode ended after {} keyword call(s)", calls),
            log::Level::Debug,
        );
        calls
    }
}

impl Default for CheckEngine {
    fn default() -> Self {
        Self::new(CheckConfig::default())
    }
}

/// Split interactive input on two or more spaces or tabs
pub fn split_interactive(input: &str) -> Vec<String> {
    input
        .replace('\t', "  ")
        .split("  ")
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

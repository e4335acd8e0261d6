// SPDX-License-Identifier: MIT

//! Natural-language checks
//!
//! A check statement is a list of tokens such as
//! `elevator floor  equals  3  within  20 seconds`:
//! - [parser] splits it into operands, operator and time constraint
//! - [evaluator] turns operands into values and applies the operator
//! - [scheduler] retries failed attempts until the deadline
//! - [engine] reports the outcome

mod engine;
mod evaluator;
mod expression;
mod keywords;
mod parser;
mod resolver;
mod scheduler;

pub use engine::{split_interactive, CheckEngine};
pub use evaluator::{Attempt, Evaluation, OperandEvaluator};
pub use expression::{CheckExpression, CheckKind, ParsedCheck, TimeConstraint, Verdict};
pub use keywords::{register_check_keywords, CheckKeyword, CHECK_LIBRARY};
pub use parser::parse;
pub use resolver::is_keyword;
pub use scheduler::{Outcome, PollOutcome, RetryScheduler};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::host::console::ScriptedConsole;
    use crate::host::keyword::FnKeyword;
    use crate::nlcheck::config::CheckConfig;
    use crate::nlcheck::runtime::Runtime;
    use serde_json::Value;
    use std::sync::Arc;

    /// Runtime with the standard library plus keywords named `names` that
    /// return `true`
    pub async fn runtime_with(names: &[&str]) -> Runtime {
        let rt = Runtime::with_standard_library(
            &CheckConfig::default(),
            Arc::new(ScriptedConsole::new(Vec::<String>::new())),
        )
        .await;
        for name in names {
            rt.registry()
                .register(Arc::new(FnKeyword::new(
                    name.to_string(),
                    format!("Mock keyword: {}", name),
                    |_, _| Ok(Value::Bool(true)),
                )))
                .await;
        }
        rt
    }
}

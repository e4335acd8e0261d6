//! Check keywords as registry entries, so checks can be called by name and
//! nested inside other checks

use super::engine::CheckEngine;
use super::expression::CheckKind;
use crate::host::keyword::expect_args;
use crate::host::value::display;
use crate::host::{Host, Keyword, KeywordError};
use crate::nlcheck::runtime::KeywordRegistry;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Library the check keywords are registered in
pub const CHECK_LIBRARY: &str = "Checks";

#[derive(Debug, Clone, Copy)]
enum Action {
    Check(CheckKind),
    Manual,
    Interactive,
}

/// A check keyword backed by a shared engine
pub struct CheckKeyword {
    name: &'static str,
    description: &'static str,
    action: Action,
    engine: Arc<CheckEngine>,
}

#[async_trait]
impl Keyword for CheckKeyword {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    async fn run(&self, host: &dyn Host, args: Vec<Value>) -> Result<Value, KeywordError> {
        match self.action {
            Action::Check(kind) => {
                self.engine.check(host, kind, args).await?;
            }
            Action::Manual => {
                if args.len() > 1 {
                    return Err(KeywordError::arguments(self.name, "0 to 1", args.len()));
                }
                let question = args.first().map(display).unwrap_or_default();
                self.engine.check_manual(host, &question).await?;
            }
            Action::Interactive => {
                expect_args(self.name, &args, 0)?;
                self.engine.check_interactive(host).await;
            }
        }
        Ok(Value::Null)
    }
}

/// Register `Check that`, `Check precondition`, `Check postcondition`,
/// `Check manual` and `Check interactive`
pub async fn register_check_keywords(registry: &KeywordRegistry, engine: Arc<CheckEngine>) {
    let keywords = [
        (
            "Check that",
            "Verifies a requirement; on failure the test continues",
            Action::Check(CheckKind::Requirement),
        ),
        (
            "Check precondition",
            "Verifies a condition the test relies on; on failure the test stops",
            Action::Check(CheckKind::Precondition),
        ),
        (
            "Check postcondition",
            "Verifies a condition the test must leave behind; on failure the test stops",
            Action::Check(CheckKind::Postcondition),
        ),
        (
            "Check manual",
            "Suspends execution for a manual check answered by the tester",
            Action::Manual,
        ),
        (
            "Check interactive",
            "Suspends execution to accept keywords typed by the tester",
            Action::Interactive,
        ),
    ];

    for (name, description, action) in keywords {
        registry
            .register_in(
                CHECK_LIBRARY,
                Arc::new(CheckKeyword {
                    name,
                    description,
                    action,
                    engine: engine.clone(),
                }),
            )
            .await;
    }
}

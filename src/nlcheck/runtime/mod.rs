// SPDX-License-Identifier: MIT

//! In-process host for running checks
//!
//! This module provides:
//! - `KeywordRegistry` - name-keyed keyword table with libraries, aliases
//!   and embedded arguments
//! - `VariableScope` - variable storage and `${name}` substitution
//! - `InlineArgs` - keyword adapter evaluating keyword-name arguments
//! - `Runtime` - a [`Host`] built from the above

mod inline;
pub mod registry;
mod variables;

pub use inline::{evaluate_keyword_args, InlineArgs};
pub use registry::{KeywordRegistry, Lookup, ResolvedKeyword, GLOBAL_LIBRARY};
pub use variables::VariableScope;

use crate::host::console::Console;
use crate::host::convert::TypeConverters;
use crate::host::value::{join_display, ValueKind};
use crate::host::{Host, KeywordError, Resolution, TypeConverter};
use crate::nlcheck::check::{register_check_keywords, CheckEngine};
use crate::nlcheck::config::CheckConfig;
use crate::nlcheck::operators::register_operators;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, RwLock};

/// Host implementation backed by a keyword registry and a variable scope
pub struct Runtime {
    registry: KeywordRegistry,
    variables: RwLock<VariableScope>,
    converters: TypeConverters,
    console: Arc<dyn Console>,
}

impl Runtime {
    /// Empty runtime talking to `console`
    pub fn new(console: Arc<dyn Console>) -> Self {
        Self {
            registry: KeywordRegistry::new(),
            variables: RwLock::new(VariableScope::new()),
            converters: TypeConverters::new(),
            console,
        }
    }

    /// Runtime with the operator library, the check keywords and the
    /// configured variables
    pub async fn with_standard_library(config: &CheckConfig, console: Arc<dyn Console>) -> Self {
        let runtime = Self::new(console);
        register_operators(&runtime.registry).await;
        register_check_keywords(&runtime.registry, Arc::new(CheckEngine::new(config.clone())))
            .await;
        for (name, value) in &config.variables {
            runtime.set_variable(name, value.clone());
        }
        runtime
    }

    pub fn registry(&self) -> &KeywordRegistry {
        &self.registry
    }

    /// Set a variable visible to all following checks
    pub fn set_variable(&self, name: &str, value: Value) {
        match self.variables.write() {
            Ok(mut scope) => scope.set(name, value),
            Err(_) => log::error!("Variable scope is poisoned, '{}' not set", name),
        }
    }

    /// Current value of a variable
    pub fn variable(&self, name: &str) -> Option<Value> {
        self.variables.read().ok()?.get(name).cloned()
    }

    /// Register or replace the type converter for a kind of value
    pub fn register_converter(&mut self, kind: ValueKind, converter: Arc<dyn TypeConverter>) {
        self.converters.register(kind, converter);
    }
}

#[async_trait]
impl Host for Runtime {
    async fn resolve_keyword(&self, name: &str) -> Resolution {
        self.registry.lookup(name).await.resolution()
    }

    async fn run_keyword(&self, name: &str, args: Vec<Value>) -> Result<Value, KeywordError> {
        match self.registry.lookup(name).await {
            Lookup::Unique(resolved) => {
                // Text captured from the name may itself hold `${var}`
                let mut all_args = resolved
                    .embedded
                    .iter()
                    .map(|arg| self.replace_variables(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                all_args.extend(args);
                log::debug!("Running keyword '{}' [{}]", name, join_display(&all_args));
                resolved.keyword.run(self, all_args).await
            }
            Lookup::Ambiguous(candidates) => Err(KeywordError::Ambiguous {
                name: name.to_string(),
                candidates,
            }),
            Lookup::Missing => Err(KeywordError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    fn replace_variables(&self, value: &Value) -> Result<Value, KeywordError> {
        let scope = self
            .variables
            .read()
            .map_err(|_| KeywordError::failed("Variable scope is poisoned"))?;
        scope.replace(value)
    }

    fn converter_for(&self, like: &Value) -> Option<Arc<dyn TypeConverter>> {
        self.converters.converter_for(like)
    }

    fn log_to_console(&self, message: &str) {
        self.console.write_line(message);
    }

    async fn prompt_yes_no(&self, message: &str) -> bool {
        self.console.ask_yes_no(message).await
    }

    async fn prompt_string(&self, message: &str) -> Option<String> {
        self.console.ask_string(message).await
    }

    async fn prompt_acknowledge(&self, message: &str) {
        self.console.acknowledge(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::console::ScriptedConsole;
    use crate::host::keyword::FnKeyword;
    use crate::host::ConversionError;
    use serde_json::json;

    fn runtime() -> Runtime {
        Runtime::new(Arc::new(ScriptedConsole::new(Vec::<String>::new())))
    }

    #[tokio::test]
    async fn test_run_keyword_with_embedded_args() {
        let rt = runtime();
        rt.registry()
            .register(Arc::new(FnKeyword::new(
                "add ${a} to ${b}",
                "Adds two numbers",
                |_, args| {
                    let sum: i64 = args
                        .iter()
                        .filter_map(|a| a.as_str().and_then(|s| s.parse::<i64>().ok()))
                        .sum();
                    Ok(json!(sum))
                },
            )))
            .await;

        let result = rt.run_keyword("Add 2 to 40", vec![]).await.unwrap();
        assert_eq!(result, json!(42));
    }

    #[tokio::test]
    async fn test_embedded_args_have_variables_replaced() {
        let rt = Runtime::with_standard_library(
            &CheckConfig::default(),
            Arc::new(ScriptedConsole::new(Vec::<String>::new())),
        )
        .await;
        rt.set_variable("count", json!(2));

        let result = rt
            .run_keyword("contains ${count} items", vec![json!(["a", "b"])])
            .await
            .unwrap();
        assert_eq!(result, json!(true));

        let err = rt
            .run_keyword("contains ${missing} items", vec![json!(["a"])])
            .await
            .unwrap_err();
        assert!(matches!(err, KeywordError::VariableNotFound(_)));
    }

    struct NumberWords;

    impl TypeConverter for NumberWords {
        fn type_name(&self) -> &str {
            "number"
        }

        fn convert(&self, text: &str) -> Result<Value, ConversionError> {
            match text.trim().to_lowercase().as_str() {
                "one" => Ok(json!(1)),
                "seven" => Ok(json!(7)),
                other => other
                    .parse::<i64>()
                    .map(|n| json!(n))
                    .map_err(|_| ConversionError::invalid(text, "number")),
            }
        }
    }

    #[tokio::test]
    async fn test_custom_converter_changes_equality() {
        let mut rt = Runtime::with_standard_library(
            &CheckConfig::default(),
            Arc::new(ScriptedConsole::new(Vec::<String>::new())),
        )
        .await;
        rt.set_variable("floor", json!(7));
        let args = vec![json!(7), json!("seven")];

        assert_eq!(rt.run_keyword("equals", args.clone()).await.unwrap(), json!(false));

        rt.register_converter(ValueKind::Number, Arc::new(NumberWords));
        assert_eq!(rt.run_keyword("equals", args).await.unwrap(), json!(true));

        let report = CheckEngine::default()
            .check_that(&rt, vec![json!("${floor}"), json!("="), json!("Seven")])
            .await
            .unwrap();
        assert_eq!(report, "Requirement check on '${floor} [7] = Seven'");
    }

    #[tokio::test]
    async fn test_run_missing_keyword() {
        let rt = runtime();
        let err = rt.run_keyword("does not exist", vec![]).await.unwrap_err();
        assert!(matches!(err, KeywordError::NotFound { .. }));
        assert_eq!(rt.resolve_keyword("does not exist").await, Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_ambiguous_name_routes_as_keyword_but_fails_to_run() {
        let rt = runtime();
        for library in ["Doors", "Files"] {
            rt.registry()
                .register_in(
                    library,
                    Arc::new(FnKeyword::new("open", "Opens", |_, _| Ok(Value::Null))),
                )
                .await;
        }

        assert_eq!(rt.resolve_keyword("open").await, Resolution::Ambiguous);
        assert!(rt.resolve_keyword("open").await.is_keyword());
        assert!(matches!(
            rt.run_keyword("open", vec![]).await,
            Err(KeywordError::Ambiguous { .. })
        ));
        assert!(rt.run_keyword("Doors.open", vec![]).await.is_ok());
    }

    #[tokio::test]
    async fn test_variables_round_trip_through_host() {
        let rt = runtime();
        rt.set_variable("floor", json!(3));
        assert_eq!(rt.variable("${floor}"), Some(json!(3)));
        assert_eq!(rt.replace_variables(&json!("${floor}")).unwrap(), json!(3));
    }

    #[tokio::test]
    async fn test_inline_args_evaluates_keyword_arguments() {
        let rt = runtime();
        rt.registry()
            .register(Arc::new(FnKeyword::new("the answer", "Returns 42", |_, _| {
                Ok(json!(42))
            })))
            .await;
        rt.registry()
            .register(Arc::new(InlineArgs::new(Arc::new(FnKeyword::new(
                "echo",
                "Returns its arguments",
                |_, args| Ok(Value::Array(args)),
            )))))
            .await;

        let result = rt
            .run_keyword("echo", vec![json!("the answer"), json!("plain")])
            .await
            .unwrap();
        assert_eq!(result, json!([42, "plain"]));
    }

    #[tokio::test]
    async fn test_standard_library_registers_operators_and_checks() {
        let rt = Runtime::with_standard_library(
            &CheckConfig::default(),
            Arc::new(ScriptedConsole::new(Vec::<String>::new())),
        )
        .await;

        assert!(rt.resolve_keyword("=").await.is_keyword());
        assert!(rt.resolve_keyword("contains 3 items").await.is_keyword());
        assert!(rt.resolve_keyword("Check that").await.is_keyword());
    }
}

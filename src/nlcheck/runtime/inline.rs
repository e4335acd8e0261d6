//! Keywords whose arguments may themselves be keyword names
//!
//! `Move all items from  the box labeled A  into  the active box` reads
//! naturally when each argument naming a keyword is run first and its
//! return value passed on instead.

use crate::host::value::display;
use crate::host::{Host, Keyword, KeywordError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Wraps a keyword so that arguments naming a keyword are evaluated first
pub struct InlineArgs {
    inner: Arc<dyn Keyword>,
}

impl InlineArgs {
    pub fn new(inner: Arc<dyn Keyword>) -> Self {
        Self { inner }
    }
}

/// Run every text argument that names a keyword and use its result
pub async fn evaluate_keyword_args(
    host: &dyn Host,
    args: Vec<Value>,
) -> Result<Vec<Value>, KeywordError> {
    let mut converted = Vec::with_capacity(args.len());
    for arg in args {
        let name = match &arg {
            Value::String(name) if host.resolve_keyword(name).await.is_keyword() => name.clone(),
            _ => {
                converted.push(arg);
                continue;
            }
        };
        host.log(
            &format!("Evaluating argument as keyword [{}]", name),
            log::Level::Info,
        );
        let result = host.run_keyword(&name, Vec::new()).await?;
        host.log(
            &format!("{} → {}", name, display(&result)),
            log::Level::Info,
        );
        converted.push(result);
    }
    Ok(converted)
}

#[async_trait]
impl Keyword for InlineArgs {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    async fn run(&self, host: &dyn Host, args: Vec<Value>) -> Result<Value, KeywordError> {
        let converted = evaluate_keyword_args(host, args).await?;
        self.inner.run(host, converted).await
    }
}

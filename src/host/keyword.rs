use super::error::KeywordError;
use super::Host;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Trait for keywords that can be invoked by name.
///
/// Operators, check keywords and user keywords all implement this trait,
/// so the check engine handles them uniformly.
#[async_trait]
pub trait Keyword: Send + Sync {
    /// Returns the keyword name. May contain embedded arguments such as
    /// `contains ${n} items`.
    fn name(&self) -> &str;

    /// Returns a one-line description of what the keyword does
    fn description(&self) -> &str;

    /// Execute the keyword with the given arguments
    async fn run(&self, host: &dyn Host, args: Vec<Value>) -> Result<Value, KeywordError>;
}

type KeywordFn = dyn Fn(&dyn Host, Vec<Value>) -> Result<Value, KeywordError> + Send + Sync;

/// Keyword backed by a synchronous closure
pub struct FnKeyword {
    name: String,
    description: String,
    func: Box<KeywordFn>,
}

impl FnKeyword {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, func: F) -> Self
    where
        F: Fn(&dyn Host, Vec<Value>) -> Result<Value, KeywordError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            func: Box::new(func),
        }
    }
}

#[async_trait]
impl Keyword for FnKeyword {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn run(&self, host: &dyn Host, args: Vec<Value>) -> Result<Value, KeywordError> {
        (self.func)(host, args)
    }
}

/// Another name for an existing keyword, e.g. `=` for `equals`
pub struct Alias {
    name: String,
    target: Arc<dyn Keyword>,
}

impl Alias {
    pub fn new(name: impl Into<String>, target: Arc<dyn Keyword>) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }
}

#[async_trait]
impl Keyword for Alias {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        self.target.description()
    }

    async fn run(&self, host: &dyn Host, args: Vec<Value>) -> Result<Value, KeywordError> {
        self.target.run(host, args).await
    }
}

/// Fail unless exactly `expected` arguments were given
pub fn expect_args(name: &str, args: &[Value], expected: usize) -> Result<(), KeywordError> {
    if args.len() != expected {
        return Err(KeywordError::arguments(name, expected.to_string(), args.len()));
    }
    Ok(())
}

//! Config loader - YAML file loading and parsing

use super::types::CheckConfig;
use serde_json::{Map, Value};
use std::error::Error;
use std::fs;
use std::path::Path;

/// Loads check configuration and variable files
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a configuration from a YAML file
    pub fn load_config<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<CheckConfig, Box<dyn Error + Send + Sync>> {
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Parse a configuration from a YAML string
    pub fn parse_yaml(content: &str) -> Result<CheckConfig, Box<dyn Error + Send + Sync>> {
        if content.trim().is_empty() {
            return Ok(CheckConfig::default());
        }
        let config: CheckConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load a variables file: a YAML mapping of variable names to values
    pub fn load_variables<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Map<String, Value>, Box<dyn Error + Send + Sync>> {
        let content = fs::read_to_string(path)?;
        Self::parse_variables(&content)
    }

    /// Parse a variables mapping from a YAML string
    pub fn parse_variables(content: &str) -> Result<Map<String, Value>, Box<dyn Error + Send + Sync>> {
        match serde_yaml::from_str::<Value>(content)? {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            other => Err(format!("Variables file must be a mapping, got {}", other).into()),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
polling:
  max_delay: 5
  min_fraction: 0.1
report:
  head: 10
  tail: 12
interactive:
  exit_commands: [done]
variables:
  floor: 3
  names: [Ada, Grace]
"#;
        let config = ConfigLoader::parse_yaml(yaml).unwrap();
        assert_eq!(config.polling.max_delay, 5.0);
        assert_eq!(config.polling.min_fraction, 0.1);
        assert_eq!(config.polling.min_divisor, 8.0);
        assert_eq!(config.report.head, 10);
        assert_eq!(config.report.tail, 12);
        assert!(config.interactive.is_exit_command("DONE"));
        assert!(!config.interactive.is_exit_command("exit"));
        assert_eq!(config.variables.get("floor"), Some(&json!(3)));
        assert_eq!(config.variables.get("names"), Some(&json!(["Ada", "Grace"])));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ConfigLoader::parse_yaml("").unwrap();
        assert_eq!(config, CheckConfig::default());

        let config = ConfigLoader::parse_yaml("report:\n  head: 5\n").unwrap();
        assert_eq!(config.report.head, 5);
        assert_eq!(config.report.tail, 40);
    }

    #[test]
    fn test_parse_variables() {
        let vars = ConfigLoader::parse_variables("a: 1\nb: two\n").unwrap();
        assert_eq!(vars.get("a"), Some(&json!(1)));
        assert_eq!(vars.get("b"), Some(&json!("two")));

        assert!(ConfigLoader::parse_variables("- just\n- a list\n").is_err());
    }

    #[test]
    fn test_invalid_yaml_returns_error() {
        let yaml = r#"
polling:
  max_delay:
    - invalid structure
"#;
        assert!(ConfigLoader::parse_yaml(yaml).is_err());
    }
}

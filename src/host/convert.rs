// SPDX-License-Identifier: MIT

//! Type conversion registry
//!
//! Arguments written in a check statement always arrive as text. When such
//! text is compared against a typed value, it is converted to that value's
//! type first. A converter exists per [`ValueKind`]; custom converters can
//! replace the built-in ones.

use super::error::ConversionError;
use super::value::ValueKind;
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Converts text into a value of one specific kind
pub trait TypeConverter: Send + Sync {
    /// Name of the target type, used in log messages
    fn type_name(&self) -> &str;

    /// Convert `text`, failing when it does not represent the target type
    fn convert(&self, text: &str) -> Result<Value, ConversionError>;
}

/// Integers and floats
pub struct NumberConverter;

impl TypeConverter for NumberConverter {
    fn type_name(&self) -> &str {
        "number"
    }

    fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        let cleaned: String = text.trim().chars().filter(|c| *c != '_').collect();
        if let Ok(int) = cleaned.parse::<i64>() {
            return Ok(Value::Number(int.into()));
        }
        cleaned
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| ConversionError::invalid(text, self.type_name()))
    }
}

/// Booleans, accepting the usual yes/no words
pub struct BoolConverter;

impl TypeConverter for BoolConverter {
    fn type_name(&self) -> &str {
        "boolean"
    }

    fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        match text.trim().to_uppercase().as_str() {
            "TRUE" | "YES" | "ON" | "1" => Ok(Value::Bool(true)),
            "FALSE" | "NO" | "OFF" | "0" | "NONE" | "" => Ok(Value::Bool(false)),
            _ => Err(ConversionError::invalid(text, self.type_name())),
        }
    }
}

/// Text stays text
pub struct StringConverter;

impl TypeConverter for StringConverter {
    fn type_name(&self) -> &str {
        "string"
    }

    fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        Ok(Value::String(text.to_string()))
    }
}

/// Lists written as JSON arrays
pub struct ListConverter;

impl TypeConverter for ListConverter {
    fn type_name(&self) -> &str {
        "list"
    }

    fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        match serde_json::from_str::<Value>(text) {
            Ok(value @ Value::Array(_)) => Ok(value),
            _ => Err(ConversionError::invalid(text, self.type_name())),
        }
    }
}

/// Dictionaries written as JSON objects
pub struct DictConverter;

impl TypeConverter for DictConverter {
    fn type_name(&self) -> &str {
        "dictionary"
    }

    fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        match serde_json::from_str::<Value>(text) {
            Ok(value @ Value::Object(_)) => Ok(value),
            _ => Err(ConversionError::invalid(text, self.type_name())),
        }
    }
}

/// `None` and `null`
pub struct NoneConverter;

impl TypeConverter for NoneConverter {
    fn type_name(&self) -> &str {
        "None"
    }

    fn convert(&self, text: &str) -> Result<Value, ConversionError> {
        match text.trim().to_uppercase().as_str() {
            "NONE" | "NULL" => Ok(Value::Null),
            _ => Err(ConversionError::invalid(text, self.type_name())),
        }
    }
}

/// Converters by value kind
#[derive(Clone)]
pub struct TypeConverters {
    converters: HashMap<ValueKind, Arc<dyn TypeConverter>>,
}

impl TypeConverters {
    /// Registry holding the built-in converters
    pub fn new() -> Self {
        let mut converters: HashMap<ValueKind, Arc<dyn TypeConverter>> = HashMap::new();
        converters.insert(ValueKind::Number, Arc::new(NumberConverter));
        converters.insert(ValueKind::Bool, Arc::new(BoolConverter));
        converters.insert(ValueKind::String, Arc::new(StringConverter));
        converters.insert(ValueKind::Array, Arc::new(ListConverter));
        converters.insert(ValueKind::Object, Arc::new(DictConverter));
        converters.insert(ValueKind::Null, Arc::new(NoneConverter));
        Self { converters }
    }

    /// Register or replace the converter for a kind
    pub fn register(&mut self, kind: ValueKind, converter: Arc<dyn TypeConverter>) {
        self.converters.insert(kind, converter);
    }

    /// Converter for values shaped like `like`
    pub fn converter_for(&self, like: &Value) -> Option<Arc<dyn TypeConverter>> {
        self.converters.get(&ValueKind::of(like)).cloned()
    }
}

impl Default for TypeConverters {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_conversion() {
        let conv = NumberConverter;
        assert_eq!(conv.convert("7").unwrap(), json!(7));
        assert_eq!(conv.convert("7.5").unwrap(), json!(7.5));
        assert_eq!(conv.convert("1_000").unwrap(), json!(1000));
        assert!(conv.convert("seven").is_err());
        assert!(conv.convert("NaN").is_err());
    }

    #[test]
    fn test_bool_conversion() {
        let conv = BoolConverter;
        assert_eq!(conv.convert("Yes").unwrap(), json!(true));
        assert_eq!(conv.convert("off").unwrap(), json!(false));
        assert!(conv.convert("maybe").is_err());
    }

    #[test]
    fn test_collection_conversion() {
        assert_eq!(ListConverter.convert("[1, \"a\"]").unwrap(), json!([1, "a"]));
        assert!(ListConverter.convert("{\"a\": 1}").is_err());
        assert_eq!(DictConverter.convert("{\"a\": 1}").unwrap(), json!({"a": 1}));
        assert_eq!(NoneConverter.convert("None").unwrap(), json!(null));
    }

    #[test]
    fn test_converter_for_kind() {
        let converters = TypeConverters::new();
        let conv = converters.converter_for(&json!(3.5)).unwrap();
        assert_eq!(conv.type_name(), "number");
    }

    struct UpperConverter;

    impl TypeConverter for UpperConverter {
        fn type_name(&self) -> &str {
            "shout"
        }

        fn convert(&self, text: &str) -> Result<Value, ConversionError> {
            Ok(Value::String(text.to_uppercase()))
        }
    }

    #[test]
    fn test_register_replaces_builtin() {
        let mut converters = TypeConverters::new();
        converters.register(ValueKind::String, Arc::new(UpperConverter));
        let conv = converters.converter_for(&json!("x")).unwrap();
        assert_eq!(conv.convert("abc").unwrap(), json!("ABC"));
    }
}

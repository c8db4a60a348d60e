//! [`ValueModel`] over `serde_json::Value`.

use serde_json::{Number, Value};

use crate::{
    evaluator::EvalError,
    functions::FunctionRegistry,
    value::{Elements, ValueKind, ValueModel},
};

/// The default value model. Objects keep insertion order.
#[derive(Debug, Clone)]
pub struct JsonModel {
    functions: FunctionRegistry<JsonModel>,
    silent_type_errors: bool,
}

impl JsonModel {
    /// A model with the builtin functions and strict type errors.
    pub fn new() -> Self {
        Self::with_registry(FunctionRegistry::builtins())
    }

    pub fn with_registry(functions: FunctionRegistry<JsonModel>) -> Self {
        JsonModel {
            functions,
            silent_type_errors: false,
        }
    }

    /// Makes function type errors evaluate to `null`.
    pub fn with_silent_type_errors(mut self, enabled: bool) -> Self {
        self.silent_type_errors = enabled;
        self
    }
}

impl Default for JsonModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueModel for JsonModel {
    type Value = Value;

    fn kind(&self, value: &Value) -> ValueKind {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    fn property<'a>(&self, value: &'a Value, name: &str) -> Option<&'a Value> {
        value.as_object().and_then(|object| object.get(name))
    }

    fn element<'a>(&self, value: &'a Value, index: usize) -> Option<&'a Value> {
        value.as_array().and_then(|array| array.get(index))
    }

    fn length(&self, value: &Value) -> usize {
        match value {
            Value::Array(array) => array.len(),
            Value::Object(object) => object.len(),
            _ => 0,
        }
    }

    fn elements<'a>(&self, value: &'a Value) -> Elements<'a, Value> {
        match value {
            Value::Array(array) => Box::new(array.iter()),
            _ => Box::new(std::iter::empty()),
        }
    }

    fn keys<'a>(&self, value: &'a Value) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        match value {
            Value::Object(object) => Box::new(object.keys().map(String::as_str)),
            _ => Box::new(std::iter::empty()),
        }
    }

    fn values<'a>(&self, value: &'a Value) -> Elements<'a, Value> {
        match value {
            Value::Object(object) => Box::new(object.values()),
            _ => Box::new(std::iter::empty()),
        }
    }

    fn as_bool(&self, value: &Value) -> Option<bool> {
        value.as_bool()
    }

    fn as_number(&self, value: &Value) -> Option<f64> {
        value.as_f64()
    }

    fn as_str<'a>(&self, value: &'a Value) -> Option<&'a str> {
        value.as_str()
    }

    fn null(&self) -> Value {
        Value::Null
    }

    fn boolean(&self, value: bool) -> Value {
        Value::Bool(value)
    }

    /// Integral results become JSON integers; NaN and infinities become `null`.
    fn number(&self, value: f64) -> Value {
        if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
            return Value::Number(Number::from(value as i64));
        }
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }

    fn string(&self, value: String) -> Value {
        Value::String(value)
    }

    fn array(&self, elements: Vec<Value>) -> Value {
        Value::Array(elements)
    }

    fn object(&self, entries: Vec<(String, Value)>) -> Value {
        Value::Object(entries.into_iter().collect())
    }

    fn parse_literal(&self, text: &str) -> Result<Value, EvalError> {
        serde_json::from_str(text)
            .map_err(|e| EvalError::Value(format!("invalid JSON literal `{text}`: {e}")))
    }

    fn serialize(&self, value: &Value) -> String {
        value.to_string()
    }

    fn functions(&self) -> &FunctionRegistry<JsonModel> {
        &self.functions
    }

    fn silent_type_errors(&self) -> bool {
        self.silent_type_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integral_numbers_stay_integers() {
        let model = JsonModel::new();
        assert_eq!(model.number(3.0), json!(3));
        assert_eq!(model.number(2.5), json!(2.5));
        assert_eq!(model.number(f64::NAN), Value::Null);
    }

    #[test]
    fn test_equality_ignores_key_order_and_number_repr() {
        let model = JsonModel::new();
        assert!(model.equals(&json!({"a": 1, "b": [1.0]}), &json!({"b": [1], "a": 1.0})));
        assert!(!model.equals(&json!([1, 2]), &json!([2, 1])));
    }

    #[test]
    fn test_truthiness() {
        let model = JsonModel::new();
        for falsy in [json!(null), json!(false), json!(""), json!([]), json!({})] {
            assert!(!model.is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(0), json!(" "), json!([null]), json!({"a": null})] {
            assert!(model.is_truthy(&truthy), "{truthy} should be truthy");
        }
    }
}

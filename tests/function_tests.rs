// tests/function_tests.rs

use clove_jmespath::functions::{ArgumentType, Function, FunctionModule, FunctionRegistry};
use clove_jmespath::{compile, search, EvalError, ErrorKind, JsonModel, ValueModel};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn eval(expression: &str, data: Value) -> Value {
    search(expression, &data).unwrap_or_else(|e| panic!("{expression:?} failed: {e}"))
}

fn error_kind(expression: &str, data: Value) -> ErrorKind {
    match search(expression, &data) {
        Ok(value) => panic!("expected {expression:?} to fail, got {value}"),
        Err(e) => e.kind(),
    }
}

fn eval_with(model: &JsonModel, expression: &str, data: Value) -> Result<Value, EvalError> {
    compile(expression).unwrap().evaluate(model, &data)
}

// ============================================================================
// Math
// ============================================================================

#[test]
fn test_math_functions() {
    let data = json!({"n": -2.5, "nums": [1, 2, 3, 4]});
    assert_eq!(eval("abs(n)", data.clone()), json!(2.5));
    assert_eq!(eval("ceil(n)", data.clone()), json!(-2));
    assert_eq!(eval("floor(n)", data.clone()), json!(-3));
    assert_eq!(eval("sum(nums)", data.clone()), json!(10));
    assert_eq!(eval("avg(nums)", data), json!(2.5));
}

#[test]
fn test_empty_aggregates() {
    assert_eq!(eval("sum(@)", json!([])), json!(0));
    assert_eq!(eval("avg(@)", json!([])), Value::Null);
    assert_eq!(eval("max(@)", json!([])), Value::Null);
    assert_eq!(eval("min(@)", json!([])), Value::Null);
}

#[test]
fn test_sum_rejects_mixed_array() {
    assert_eq!(error_kind("sum(@)", json!([1, "2"])), ErrorKind::Type);
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_functions() {
    let data = json!({"s": "hello world", "parts": ["a", "b", "c"]});
    assert_eq!(eval("contains(s, 'lo w')", data.clone()), json!(true));
    assert_eq!(eval("starts_with(s, 'hello')", data.clone()), json!(true));
    assert_eq!(eval("ends_with(s, 'hello')", data.clone()), json!(false));
    assert_eq!(eval("join(', ', parts)", data.clone()), json!("a, b, c"));
    assert_eq!(eval("length(s)", data), json!(11));
}

#[test]
fn test_contains_on_array_uses_deep_equality() {
    let data = json!({"items": [1, {"a": [2]}, "x"]});
    assert_eq!(eval("contains(items, `{\"a\": [2.0]}`)", data.clone()), json!(true));
    assert_eq!(eval("contains(items, 'y')", data), json!(false));
}

#[test]
fn test_length_counts_characters() {
    assert_eq!(eval("length(@)", json!("héllo")), json!(5));
    assert_eq!(eval("length(@)", json!({"a": 1, "b": 2})), json!(2));
}

#[test]
fn test_join_requires_strings() {
    assert_eq!(error_kind("join(',', @)", json!(["a", 1])), ErrorKind::Type);
}

// ============================================================================
// Collections
// ============================================================================

#[test]
fn test_min_max() {
    assert_eq!(eval("max(@)", json!([3, 9, 1])), json!(9));
    assert_eq!(eval("min(@)", json!([3, 9, 1])), json!(1));
    assert_eq!(eval("max(@)", json!(["b", "c", "a"])), json!("c"));
    assert_eq!(error_kind("max(@)", json!([1, "a"])), ErrorKind::Type);
}

#[test]
fn test_reverse_and_sort() {
    assert_eq!(eval("reverse(@)", json!([1, 2, 3])), json!([3, 2, 1]));
    assert_eq!(eval("reverse(@)", json!("abc")), json!("cba"));
    assert_eq!(eval("sort(@)", json!([3, 1, 2])), json!([1, 2, 3]));
    assert_eq!(eval("sort(@)", json!(["b", "a"])), json!(["a", "b"]));
}

#[test]
fn test_keys_and_values_keep_order() {
    let data = json!({"z": 1, "a": 2, "m": 3});
    assert_eq!(eval("keys(@)", data.clone()), json!(["z", "a", "m"]));
    assert_eq!(eval("values(@)", data), json!([1, 2, 3]));
}

#[test]
fn test_merge() {
    let data = json!({"a": {"x": 1, "y": 2}, "b": {"y": 3, "z": 4}});
    let merged = eval("merge(a, b)", data.clone());
    assert_eq!(merged, json!({"x": 1, "y": 3, "z": 4}));
    let keys: Vec<&str> = merged.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["x", "y", "z"]);
    assert_eq!(eval("merge(a)", data), json!({"x": 1, "y": 2}));
}

// ============================================================================
// Conversion
// ============================================================================

#[test]
fn test_conversion_functions() {
    assert_eq!(eval("to_array(@)", json!(1)), json!([1]));
    assert_eq!(eval("to_array(@)", json!([1])), json!([1]));
    assert_eq!(eval("to_number('1.5')", json!(null)), json!(1.5));
    assert_eq!(eval("to_number('abc')", json!(null)), Value::Null);
    assert_eq!(eval("to_number(`true`)", json!(null)), Value::Null);
    assert_eq!(eval("to_string(@)", json!({"a": [1, 2]})), json!("{\"a\":[1,2]}"));
    assert_eq!(eval("to_string('x')", json!(null)), json!("x"));
}

#[test]
fn test_type() {
    let cases = [
        (json!(null), "null"),
        (json!(true), "boolean"),
        (json!(1), "number"),
        (json!("s"), "string"),
        (json!([]), "array"),
        (json!({}), "object"),
    ];
    for (data, expected) in cases {
        assert_eq!(eval("type(@)", data), json!(expected));
    }
}

#[test]
fn test_not_null() {
    let data = json!({"a": null, "b": false, "c": 1});
    assert_eq!(eval("not_null(a, missing, b, c)", data.clone()), json!(false));
    assert_eq!(eval("not_null(a, missing)", data), Value::Null);
}

// ============================================================================
// Expression references
// ============================================================================

#[test]
fn test_map_keeps_nulls() {
    let data = json!([{"a": 1}, {"b": 2}, {"a": 3}]);
    assert_eq!(eval("map(&a, @)", data.clone()), json!([1, null, 3]));
    assert_eq!(eval("[*].a", data), json!([1, 3]));
}

#[test]
fn test_sort_by_is_stable() {
    let data = json!([
        {"n": "a", "k": 2},
        {"n": "b", "k": 1},
        {"n": "c", "k": 2},
        {"n": "d", "k": 1}
    ]);
    assert_eq!(eval("sort_by(@, &k)[*].n", data), json!(["b", "d", "a", "c"]));
}

#[test]
fn test_min_by_max_by() {
    let data = json!([{"n": "a", "age": 30}, {"n": "b", "age": 50}, {"n": "c", "age": 10}]);
    assert_eq!(eval("max_by(@, &age).n", data.clone()), json!("b"));
    assert_eq!(eval("min_by(@, &age).n", data.clone()), json!("c"));
    assert_eq!(eval("min_by(@, &n).n", data), json!("a"));
    assert_eq!(eval("max_by(@, &age)", json!([])), Value::Null);
}

#[test]
fn test_sort_by_mixed_key_types() {
    let data = json!([{"k": 1}, {"k": "a"}]);
    assert_eq!(error_kind("sort_by(@, &k)", data.clone()), ErrorKind::Type);
    assert_eq!(error_kind("max_by(@, &k)", data), ErrorKind::Type);

    let silent = JsonModel::new().with_silent_type_errors(true);
    let data = json!([{"k": 1}, {"k": "a"}]);
    assert_eq!(eval_with(&silent, "sort_by(@, &k)", data.clone()).unwrap(), Value::Null);
    assert_eq!(eval_with(&silent, "min_by(@, &k)", data).unwrap(), Value::Null);
}

#[test]
fn test_sort_by_rejects_non_comparable_keys() {
    let data = json!([{"k": true}, {"k": false}]);
    assert_eq!(error_kind("sort_by(@, &k)", data), ErrorKind::Type);
}

#[test]
fn test_expression_argument_in_value_position() {
    assert_eq!(error_kind("length(&a)", json!({})), ErrorKind::Type);
    assert_eq!(error_kind("map(a, @)", json!([])), ErrorKind::Type);
}

#[test]
fn test_bare_expression_reference_is_null() {
    assert_eq!(eval("&a", json!({"a": 1})), Value::Null);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_arity_errors() {
    assert_eq!(error_kind("length()", json!({})), ErrorKind::Arity);
    assert_eq!(error_kind("length(a, b)", json!({})), ErrorKind::Arity);
    assert_eq!(error_kind("merge()", json!({})), ErrorKind::Arity);
    assert_eq!(error_kind("not_null()", json!({})), ErrorKind::Arity);
}

#[test]
fn test_arity_error_message_names_function() {
    let err = search("abs(`1`, `2`)", &json!({})).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid arity: abs() takes 1 argument(s), got 2"
    );
}

#[test]
fn test_unknown_function() {
    assert_eq!(error_kind("nope(@)", json!({})), ErrorKind::UnknownFunction);
}

#[test]
fn test_silent_mode_keeps_arity_errors() {
    let silent = JsonModel::new().with_silent_type_errors(true);
    assert_eq!(eval_with(&silent, "abs('x')", json!({})).unwrap(), Value::Null);
    assert!(matches!(
        eval_with(&silent, "abs()", json!({})),
        Err(EvalError::Arity { .. })
    ));
    assert!(matches!(
        eval_with(&silent, "nope()", json!({})),
        Err(EvalError::UnknownFunction(_))
    ));
}

// ============================================================================
// Registry
// ============================================================================

fn double() -> Function<JsonModel> {
    Function::<JsonModel>::builder("double")
        .arg([ArgumentType::Number])
        .build(|model, args, _current| {
            let n = args[0]
                .as_value()
                .and_then(|v| model.as_number(v))
                .unwrap_or(0.0);
            Ok(model.number(n * 2.0))
        })
}

#[test]
fn test_builtin_catalogue() {
    let registry = FunctionRegistry::<JsonModel>::builtins();
    assert_eq!(registry.len(), 26);
    assert_eq!(
        registry.names(),
        vec![
            "abs", "avg", "ceil", "contains", "ends_with", "floor", "join", "keys", "length",
            "map", "max", "max_by", "merge", "min", "min_by", "not_null", "reverse", "sort",
            "sort_by", "starts_with", "sum", "to_array", "to_number", "to_string", "type",
            "values",
        ]
    );
}

#[test]
fn test_register_custom_function() {
    let mut registry = FunctionRegistry::builtins();
    assert!(registry.register(double()).is_none());
    let model = JsonModel::with_registry(registry);

    assert_eq!(eval_with(&model, "double(a)", json!({"a": 21})).unwrap(), json!(42));
    assert!(matches!(
        eval_with(&model, "double('x')", json!({})),
        Err(EvalError::Type(_))
    ));
}

#[test]
fn test_override_builtin() {
    let mut registry = FunctionRegistry::builtins();
    let replaced = registry.register(
        Function::<JsonModel>::builder("length")
            .arg([ArgumentType::Any])
            .build(|model, _args, _current| Ok(model.number(-1.0))),
    );
    assert_eq!(replaced.map(|f| f.name().to_string()), Some("length".to_string()));

    let model = JsonModel::with_registry(registry);
    assert_eq!(eval_with(&model, "length(`1`)", json!({})).unwrap(), json!(-1));
}

#[test]
fn test_alias() {
    let mut registry = FunctionRegistry::<JsonModel>::builtins();
    registry.alias("length", "len").unwrap();
    assert!(registry.contains("len"));
    assert!(matches!(
        registry.alias("missing", "other"),
        Err(EvalError::UnknownFunction(_))
    ));

    let model = JsonModel::with_registry(registry);
    assert_eq!(eval_with(&model, "len(@)", json!([1, 2])).unwrap(), json!(2));
    let err = eval_with(&model, "len()", json!({})).unwrap_err();
    assert!(err.to_string().contains("len()"));
}

#[test]
fn test_register_module() {
    let module = FunctionModule::new("custom")
        .with(double())
        .with(
            Function::<JsonModel>::builder("first_or")
                .arg([ArgumentType::Array])
                .optional_arg([ArgumentType::Any])
                .build(|model, args, _current| {
                    let array = args[0].as_value().and_then(|v| model.element(v, 0)).cloned();
                    let fallback = args.get(1).and_then(|a| a.as_value()).cloned();
                    Ok(array.or(fallback).unwrap_or(Value::Null))
                }),
        );
    assert_eq!(module.name(), "custom");

    let mut registry = FunctionRegistry::new();
    registry.register_module(module);
    assert_eq!(registry.names(), vec!["double", "first_or"]);

    let model = JsonModel::with_registry(registry);
    assert_eq!(eval_with(&model, "first_or(@)", json!([])).unwrap(), Value::Null);
    assert_eq!(eval_with(&model, "first_or(@, 'x')", json!([])).unwrap(), json!("x"));
    assert_eq!(eval_with(&model, "first_or(@, 'x')", json!([7])).unwrap(), json!(7));
    assert!(matches!(
        eval_with(&model, "length(@)", json!([])),
        Err(EvalError::UnknownFunction(_))
    ));
}

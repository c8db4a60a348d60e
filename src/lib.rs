//! JMESPath query language for JSON.
//!
//! ```
//! use serde_json::json;
//!
//! let data = json!({"people": [{"name": "a", "age": 30}, {"name": "b", "age": 50}]});
//! let names = clove_jmespath::search("people[?age > `40`].name", &data).unwrap();
//! assert_eq!(names, json!(["b"]));
//! ```
//!
//! Compile once and evaluate many times with [`compile`]. Evaluation is
//! generic over a [`ValueModel`]; [`JsonModel`] backs it with
//! `serde_json::Value`.

use std::sync::LazyLock;

pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod functions;
pub mod json;
pub mod lexer;
pub mod parser;
pub mod scope;
pub mod value;

pub use ast::{Comparator, Node, Token, TokenKind};
pub use error::{Error, ErrorKind};
pub use evaluator::{EvalError, Evaluator};
pub use expression::Expression;
pub use functions::{Argument, ArgumentType, ExpressionRef, Function, FunctionRegistry};
pub use json::JsonModel;
pub use lexer::{LexError, Lexer, Position};
pub use parser::{ParseError, Parser};
pub use scope::Scope;
pub use value::{ValueKind, ValueModel};

static DEFAULT_MODEL: LazyLock<JsonModel> = LazyLock::new(JsonModel::new);

/// Compiles `source` into a reusable [`Expression`].
pub fn compile(source: &str) -> Result<Expression, ParseError> {
    Expression::compile(source)
}

/// The shared [`JsonModel`] used by [`search`].
pub fn default_model() -> &'static JsonModel {
    &DEFAULT_MODEL
}

/// Compiles and evaluates `source` against `data` with the default model.
pub fn search(source: &str, data: &serde_json::Value) -> Result<serde_json::Value, Error> {
    let expression = compile(source)?;
    Ok(expression.evaluate(default_model(), data)?)
}

//! Run JMESPath searches against JSON input

use super::CliError;
use crate::{Expression, JsonModel};

/// Options for the search command
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// The expression to evaluate
    pub expression: String,
    /// JSON input string
    pub input: Option<String>,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
    /// Function type errors produce null instead of failing
    pub silent_type_errors: bool,
}

/// Result of a search operation
#[derive(Debug)]
pub enum SearchResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Expression evaluated successfully
    Success(serde_json::Value),
}

/// Execute a search operation
pub fn execute_search(options: &SearchOptions) -> Result<SearchResult, CliError> {
    let expression = Expression::compile(&options.expression)?;

    if options.syntax_only {
        return Ok(SearchResult::SyntaxValid);
    }

    let json = options.input.as_ref().ok_or(CliError::NoInput)?;
    let data: serde_json::Value = serde_json::from_str(json)?;

    let model = JsonModel::new().with_silent_type_errors(options.silent_type_errors);
    let result = expression.evaluate(&model, &data)?;
    Ok(SearchResult::Success(result))
}

/// Pretty-printed syntax tree of `expression`
pub fn describe_ast(expression: &str) -> Result<String, CliError> {
    let expression = Expression::compile(expression)?;
    Ok(format!("{:#?}", expression.ast()))
}

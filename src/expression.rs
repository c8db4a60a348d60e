use std::{fmt, str::FromStr, sync::Arc};

use log::debug;

use crate::{
    ast::Node,
    evaluator::{EvalError, Evaluator},
    lexer::Lexer,
    parser::{ParseError, Parser},
    value::ValueModel,
};

/// A compiled JMESPath expression.
///
/// Compiling is independent of any data or value model. The tree is shared
/// behind an `Arc`, so cloning is cheap and one expression can be evaluated
/// from several threads.
#[derive(Debug, Clone)]
pub struct Expression {
    source: String,
    ast: Arc<Node>,
}

impl Expression {
    pub fn compile(source: &str) -> Result<Self, ParseError> {
        debug!("compiling expression {source:?}");
        let ast = Parser::new(Lexer::new(source))?.parse()?;
        Ok(Expression {
            source: source.to_string(),
            ast: Arc::new(ast),
        })
    }

    /// The text this expression was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Node {
        &self.ast
    }

    /// Evaluates against `data`, which is also what `$` refers to.
    pub fn evaluate<M: ValueModel>(
        &self,
        model: &M,
        data: &M::Value,
    ) -> Result<M::Value, EvalError> {
        Evaluator::new(model, data).evaluate(&self.ast)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Expression::compile(source)
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.ast == other.ast
    }
}

use thiserror::Error;

use crate::{evaluator::EvalError, lexer::LexError, parser::ParseError};

/// Any error from compiling or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Coarse classification matching the error names used by the JMESPath
/// compliance suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    Arity,
    Type,
    UnknownFunction,
    Value,
}

impl ErrorKind {
    /// Compliance-suite name: `syntax`, `invalid-arity`, `invalid-type`,
    /// `unknown-function` or `invalid-value`.
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "syntax",
            ErrorKind::Arity => "invalid-arity",
            ErrorKind::Type => "invalid-type",
            ErrorKind::UnknownFunction => "unknown-function",
            ErrorKind::Value => "invalid-value",
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax(_) => ErrorKind::Syntax,
            Error::Eval(e) => e.kind(),
        }
    }
}

impl From<LexError> for Error {
    fn from(error: LexError) -> Self {
        Error::Syntax(ParseError::Lex(error))
    }
}

use std::fmt;

use crate::lexer::Position;

/// A lexical token together with its source text and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token kind, including any decoded payload
    pub kind: TokenKind,
    /// Raw source text the token was read from
    pub text: String,
    /// Position of the first character of the token
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            text: text.into(),
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Integer, used by index and slice expressions
    ///
    /// # Examples
    /// ```text
    /// 0
    /// -1
    /// ```
    Integer(i64),

    /// Number with a fraction or exponent
    ///
    /// Lexically valid but not accepted anywhere by the grammar.
    Float(f64),

    /// Raw string literal enclosed in single quotes
    ///
    /// Only `\'` is an escape; every other backslash is kept as written.
    ///
    /// # Examples
    /// ```text
    /// 'hello'
    /// 'it\'s'
    /// ```
    RawString(String),

    /// JSON literal enclosed in backticks, with `` \` `` already unescaped
    ///
    /// # Examples
    /// ```text
    /// `true`
    /// `{"a": [1, 2]}`
    /// ```
    Literal(String),

    // Identifiers and References
    /// Unquoted identifier
    ///
    /// Must start with an ASCII letter or underscore, followed by ASCII
    /// letters, digits, or underscores. `let` and `in` are lexed as
    /// identifiers and only treated as keywords by the parser.
    UnquotedIdentifier(String),

    /// Double-quoted identifier with JSON escapes decoded
    ///
    /// # Examples
    /// ```text
    /// "foo bar"
    /// "é"
    /// ```
    QuotedIdentifier(String),

    /// Variable reference (`$name`)
    Variable(String),

    /// Bare `$`, the root document
    Dollar,

    /// Current node (`@`)
    At,

    /// Expression reference prefix (`&`)
    Ampersand,

    // Delimiters
    /// `.`
    Dot,
    /// `*`
    Star,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `[]`
    Flatten,
    /// `[?`
    Filter,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `=` in `let` bindings
    Assign,

    // Operators
    /// `|`
    Pipe,
    /// `||`
    Or,
    /// `&&`
    And,
    /// `!`
    Not,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,

    /// End of input
    Eof,
}

impl TokenKind {
    /// True if this is an unquoted identifier spelled exactly `word`.
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self, TokenKind::UnquotedIdentifier(name) if name == word)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Integer(n) => write!(f, "number {n}"),
            TokenKind::Float(n) => write!(f, "number {n}"),
            TokenKind::RawString(s) => write!(f, "raw string '{s}'"),
            TokenKind::Literal(s) => write!(f, "literal `{s}`"),
            TokenKind::UnquotedIdentifier(s) => write!(f, "identifier {s}"),
            TokenKind::QuotedIdentifier(s) => write!(f, "quoted identifier \"{s}\""),
            TokenKind::Variable(s) => write!(f, "variable ${s}"),
            TokenKind::Dollar => f.write_str("'$'"),
            TokenKind::At => f.write_str("'@'"),
            TokenKind::Ampersand => f.write_str("'&'"),
            TokenKind::Dot => f.write_str("'.'"),
            TokenKind::Star => f.write_str("'*'"),
            TokenKind::LBracket => f.write_str("'['"),
            TokenKind::RBracket => f.write_str("']'"),
            TokenKind::Flatten => f.write_str("'[]'"),
            TokenKind::Filter => f.write_str("'[?'"),
            TokenKind::LBrace => f.write_str("'{'"),
            TokenKind::RBrace => f.write_str("'}'"),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Colon => f.write_str("':'"),
            TokenKind::Assign => f.write_str("'='"),
            TokenKind::Pipe => f.write_str("'|'"),
            TokenKind::Or => f.write_str("'||'"),
            TokenKind::And => f.write_str("'&&'"),
            TokenKind::Not => f.write_str("'!'"),
            TokenKind::EqEq => f.write_str("'=='"),
            TokenKind::NotEq => f.write_str("'!='"),
            TokenKind::Lt => f.write_str("'<'"),
            TokenKind::LtEq => f.write_str("'<='"),
            TokenKind::Gt => f.write_str("'>'"),
            TokenKind::GtEq => f.write_str("'>='"),
            TokenKind::Eof => f.write_str("end of expression"),
        }
    }
}

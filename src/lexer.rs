use std::fmt;

use thiserror::Error;

use crate::ast::{Token, TokenKind};

/// Location of a character in the source text.
///
/// `offset` counts characters (not bytes) from the start of the input;
/// `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Error raised while turning source text into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at {position}")]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

impl LexError {
    fn new(message: impl Into<String>, position: Position) -> Self {
        LexError {
            message: message.into(),
            position,
        }
    }
}

/// Produces tokens on demand from a JMESPath expression.
pub struct Lexer {
    input: Vec<char>,
    position: Position,
    peeked: Option<Token>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: Position::start(),
            peeked: None,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position.offset).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position.offset + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position.offset += 1;
            if ch == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
    }

    fn text_from(&self, start: Position) -> String {
        self.input[start.offset..self.position.offset].iter().collect()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if matches!(ch, ' ' | '\t' | '\n' | '\r') {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads a double-quoted identifier, decoding JSON escapes.
    fn read_quoted_identifier(&mut self, start: Position) -> Result<String, LexError> {
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    let escape_at = self.position;
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some('"') => result.push('"'),
                        Some('\\') => result.push('\\'),
                        Some('/') => result.push('/'),
                        Some('b') => result.push('\u{0008}'),
                        Some('f') => result.push('\u{000C}'),
                        Some('n') => result.push('\n'),
                        Some('r') => result.push('\r'),
                        Some('t') => result.push('\t'),
                        Some('u') => {
                            result.push(self.read_unicode_escape(escape_at)?);
                            continue;
                        }
                        Some(other) => {
                            return Err(LexError::new(
                                format!("invalid escape sequence \\{other}"),
                                escape_at,
                            ));
                        }
                        None => break,
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::new("unterminated quoted identifier", start))
    }

    /// Reads the `XXXX` of a `\uXXXX` escape (positioned on the `u`),
    /// combining surrogate pairs.
    fn read_unicode_escape(&mut self, escape_at: Position) -> Result<char, LexError> {
        self.advance(); // Consume 'u'
        let high = self.read_hex4(escape_at)?;

        if (0xD800..0xDC00).contains(&high) {
            if self.current_char() == Some('\\') && self.peek_char(1) == Some('u') {
                self.advance();
                self.advance();
                let low = self.read_hex4(escape_at)?;
                if (0xDC00..0xE000).contains(&low) {
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(code).ok_or_else(|| {
                        LexError::new("invalid unicode escape", escape_at)
                    });
                }
            }
            return Err(LexError::new("unpaired surrogate in unicode escape", escape_at));
        }

        char::from_u32(high).ok_or_else(|| LexError::new("invalid unicode escape", escape_at))
    }

    fn read_hex4(&mut self, escape_at: Position) -> Result<u32, LexError> {
        let mut code = 0;
        for _ in 0..4 {
            let digit = self
                .current_char()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| LexError::new("invalid unicode escape", escape_at))?;
            code = code * 16 + digit;
            self.advance();
        }
        Ok(code)
    }

    /// Reads text up to an unescaped `delimiter`. A backslash always consumes
    /// the following character; `\<delimiter>` becomes the bare delimiter and
    /// every other pair is kept verbatim.
    fn read_delimited(
        &mut self,
        delimiter: char,
        start: Position,
        what: &str,
    ) -> Result<String, LexError> {
        let mut result = String::new();
        self.advance(); // Consume opening delimiter

        while let Some(ch) = self.current_char() {
            if ch == delimiter {
                self.advance();
                return Ok(result);
            }
            self.advance();
            if ch == '\\' {
                match self.current_char() {
                    Some(next) if next == delimiter => result.push(next),
                    Some(next) => {
                        result.push('\\');
                        result.push(next);
                    }
                    None => break,
                }
                self.advance();
            } else {
                result.push(ch);
            }
        }

        Err(LexError::new(format!("unterminated {what}"), start))
    }

    fn read_literal(&mut self, start: Position) -> Result<String, LexError> {
        let text = self.read_delimited('`', start, "JSON literal")?;
        if let Err(e) = serde_json::from_str::<serde_json::Value>(&text) {
            return Err(LexError::new(format!("invalid JSON literal: {e}"), start));
        }
        Ok(text)
    }

    fn read_number(&mut self, start: Position) -> Result<TokenKind, LexError> {
        let mut is_float = false;

        if self.current_char() == Some('-') {
            self.advance();
        }
        if !self.current_char().is_some_and(|c| c.is_ascii_digit()) {
            return Err(LexError::new("expected digit after '-'", start));
        }

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                self.advance();
            } else if matches!(ch, 'e' | 'E') {
                let digits_at = match self.peek_char(1) {
                    Some('+' | '-') => 2,
                    _ => 1,
                };
                if !self.peek_char(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                    break;
                }
                is_float = true;
                for _ in 0..digits_at {
                    self.advance();
                }
                while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
                break;
            } else {
                break;
            }
        }

        let text = self.text_from(start);
        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| LexError::new(format!("invalid number {text}"), start))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Integer)
                .map_err(|_| LexError::new(format!("number {text} is out of range"), start))
        }
    }

    /// Consumes one character and yields `single`, or two characters and
    /// yields `double` when the next character is `second`.
    fn one_or_two(&mut self, second: char, double: TokenKind, single: TokenKind) -> TokenKind {
        self.advance();
        if self.current_char() == Some(second) {
            self.advance();
            double
        } else {
            single
        }
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<&Token, LexError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.scan_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Consumes and returns the next token. Once the input is exhausted this
    /// keeps returning [`TokenKind::Eof`].
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.scan_token(),
        }
    }

    /// Tokenizes the whole input, including the trailing `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn scan_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        let start = self.position;

        let kind = match self.current_char() {
            None => TokenKind::Eof,
            Some('.') => {
                self.advance();
                TokenKind::Dot
            }
            Some('*') => {
                self.advance();
                TokenKind::Star
            }
            Some('@') => {
                self.advance();
                TokenKind::At
            }
            Some(',') => {
                self.advance();
                TokenKind::Comma
            }
            Some(':') => {
                self.advance();
                TokenKind::Colon
            }
            Some('{') => {
                self.advance();
                TokenKind::LBrace
            }
            Some('}') => {
                self.advance();
                TokenKind::RBrace
            }
            Some('(') => {
                self.advance();
                TokenKind::LParen
            }
            Some(')') => {
                self.advance();
                TokenKind::RParen
            }
            Some(']') => {
                self.advance();
                TokenKind::RBracket
            }
            Some('[') => {
                self.advance();
                match self.current_char() {
                    Some(']') => {
                        self.advance();
                        TokenKind::Flatten
                    }
                    Some('?') => {
                        self.advance();
                        TokenKind::Filter
                    }
                    _ => TokenKind::LBracket,
                }
            }
            Some('|') => self.one_or_two('|', TokenKind::Or, TokenKind::Pipe),
            Some('&') => self.one_or_two('&', TokenKind::And, TokenKind::Ampersand),
            Some('!') => self.one_or_two('=', TokenKind::NotEq, TokenKind::Not),
            Some('=') => self.one_or_two('=', TokenKind::EqEq, TokenKind::Assign),
            Some('<') => self.one_or_two('=', TokenKind::LtEq, TokenKind::Lt),
            Some('>') => self.one_or_two('=', TokenKind::GtEq, TokenKind::Gt),
            Some('$') => {
                self.advance();
                if self
                    .current_char()
                    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                {
                    TokenKind::Variable(self.read_identifier())
                } else {
                    TokenKind::Dollar
                }
            }
            Some('"') => TokenKind::QuotedIdentifier(self.read_quoted_identifier(start)?),
            Some('\'') => TokenKind::RawString(self.read_delimited('\'', start, "raw string")?),
            Some('`') => TokenKind::Literal(self.read_literal(start)?),
            Some(ch) if ch.is_ascii_digit() || ch == '-' => self.read_number(start)?,
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                TokenKind::UnquotedIdentifier(self.read_identifier())
            }
            Some(ch) => {
                return Err(LexError::new(format!("unexpected character '{ch}'"), start));
            }
        };

        Ok(Token::new(kind, self.text_from(start), start))
    }
}

#[cfg(test)]
fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::new(input)
        .tokenize()
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn test_two_char_operators() {
    assert_eq!(
        kinds("|| && == != <= >= [] [?"),
        vec![
            TokenKind::Or,
            TokenKind::And,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::LtEq,
            TokenKind::GtEq,
            TokenKind::Flatten,
            TokenKind::Filter,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_number_does_not_swallow_dot() {
    assert_eq!(
        kinds("foo[1].bar"),
        vec![
            TokenKind::UnquotedIdentifier("foo".into()),
            TokenKind::LBracket,
            TokenKind::Integer(1),
            TokenKind::RBracket,
            TokenKind::Dot,
            TokenKind::UnquotedIdentifier("bar".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_peek_does_not_consume() {
    let mut lexer = Lexer::new("foo bar");
    assert_eq!(
        lexer.peek_token().unwrap().kind,
        TokenKind::UnquotedIdentifier("foo".into())
    );
    assert_eq!(
        lexer.next_token().unwrap().kind,
        TokenKind::UnquotedIdentifier("foo".into())
    );
    assert_eq!(
        lexer.next_token().unwrap().kind,
        TokenKind::UnquotedIdentifier("bar".into())
    );
}

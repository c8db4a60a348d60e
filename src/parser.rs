use std::mem;

use thiserror::Error;

use crate::{
    ast::{Binding, Comparator, KeyValue, Node, Slice, Token, TokenKind},
    lexer::{LexError, Lexer, Position},
};

/// Syntax errors raised while compiling an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The lexer rejected the input
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A token appeared where the grammar does not allow it
    #[error("unexpected {found} at {position}, expected {expected}")]
    Unexpected {
        found: String,
        expected: String,
        position: Position,
    },

    /// Structurally invalid input that is not a simple token mismatch
    #[error("{message} at {position}")]
    Invalid { message: String, position: Position },
}

impl ParseError {
    /// Where in the source the error was detected.
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(e) => e.position,
            ParseError::Unexpected { position, .. } | ParseError::Invalid { position, .. } => {
                *position
            }
        }
    }
}

// Binding powers, low to high.
const BP_PIPE: u8 = 1;
const BP_OR: u8 = 2;
const BP_AND: u8 = 3;
const BP_NOT: u8 = 4;
const BP_COMPARISON: u8 = 5;
const BP_FLATTEN: u8 = 6;
const BP_BRACKET: u8 = 7;
const BP_DOT: u8 = 8;

fn left_binding_power(kind: &TokenKind) -> u8 {
    match kind {
        TokenKind::Pipe => BP_PIPE,
        TokenKind::Or => BP_OR,
        TokenKind::And => BP_AND,
        TokenKind::EqEq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq => BP_COMPARISON,
        TokenKind::Flatten => BP_FLATTEN,
        TokenKind::LBracket | TokenKind::Filter => BP_BRACKET,
        TokenKind::Dot => BP_DOT,
        _ => 0,
    }
}

fn comparator(kind: &TokenKind) -> Option<Comparator> {
    match kind {
        TokenKind::EqEq => Some(Comparator::Equal),
        TokenKind::NotEq => Some(Comparator::NotEqual),
        TokenKind::Lt => Some(Comparator::LessThan),
        TokenKind::LtEq => Some(Comparator::LessEqual),
        TokenKind::Gt => Some(Comparator::GreaterThan),
        TokenKind::GtEq => Some(Comparator::GreaterEqual),
        _ => None,
    }
}

/// A postfix piece parsed after `.`, `[` or `[?`, not yet attached to the
/// expression on its left.
#[derive(Debug)]
enum Fragment {
    /// Right-hand side of a dot: identifier, function call, multi-select
    Select(Node),
    /// `[n]`
    Index(i64),
    /// `[start:stop:step]`
    Slice(Slice),
    /// `[*]`
    Wildcard,
    /// `.*`
    Values,
    /// `[?condition]`
    Filter(Node),
}

/// Attaches a fragment to `base`. When `base` is a projection the fragment
/// joins the tail of its right-hand side, so it runs once per element.
fn chain(base: Node, fragment: Fragment) -> Node {
    match base {
        Node::ArrayProjection { left, right } => Node::ArrayProjection {
            left,
            right: Some(Box::new(extend(right, fragment))),
        },
        Node::ObjectProjection { left, right } => Node::ObjectProjection {
            left,
            right: Some(Box::new(extend(right, fragment))),
        },
        Node::Filter {
            left,
            condition,
            right,
        } => Node::Filter {
            left,
            condition,
            right: Some(Box::new(extend(right, fragment))),
        },
        other => apply(other, fragment),
    }
}

fn extend(tail: Option<Box<Node>>, fragment: Fragment) -> Node {
    match tail {
        Some(node) => chain(*node, fragment),
        None => apply(Node::Current, fragment),
    }
}

/// Applies a fragment to the result of `input`.
fn apply(input: Node, fragment: Fragment) -> Node {
    match fragment {
        Fragment::Select(node) => then(input, node),
        Fragment::Index(index) => then(input, Node::Index(index)),
        Fragment::Slice(slice) => Node::ArrayProjection {
            left: Box::new(then(input, Node::Slice(slice))),
            right: None,
        },
        Fragment::Wildcard => Node::ArrayProjection {
            left: Box::new(input),
            right: None,
        },
        Fragment::Values => Node::ObjectProjection {
            left: Box::new(input),
            right: None,
        },
        Fragment::Filter(condition) => Node::Filter {
            left: Box::new(input),
            condition: Box::new(condition),
            right: None,
        },
    }
}

fn then(input: Node, node: Node) -> Node {
    match input {
        Node::Current => node,
        input => Node::subexpression(input, node),
    }
}

/// `[]` always wraps everything on its left, projection or not.
fn flatten(input: Node) -> Node {
    Node::ArrayProjection {
        left: Box::new(Node::Flatten(Box::new(input))),
        right: None,
    }
}

/// Top-down operator precedence parser for JMESPath.
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
        })
    }

    /// Consumes the current token and returns it.
    fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.current_token, next))
    }

    fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(&self.current_token.kind) == mem::discriminant(kind)
    }

    /// Looks one token past the current one.
    fn peek_is(&mut self, kind: &TokenKind) -> Result<bool, ParseError> {
        let next = self.lexer.peek_token()?;
        Ok(mem::discriminant(&next.kind) == mem::discriminant(kind))
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        if self.check(&expected) {
            self.advance()
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        unexpected(&self.current_token, expected)
    }

    /// Parses a complete expression; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<Node, ParseError> {
        let node = self.expression(0)?;
        if !self.check(&TokenKind::Eof) {
            return Err(self.unexpected("end of expression"));
        }
        Ok(node)
    }

    fn expression(&mut self, min_bp: u8) -> Result<Node, ParseError> {
        let token = self.advance()?;
        let mut left = self.nud(token)?;

        while left_binding_power(&self.current_token.kind) > min_bp {
            let token = self.advance()?;
            left = self.led(token, left)?;
        }
        Ok(left)
    }

    /// Prefix position: atoms and prefix operators.
    fn nud(&mut self, token: Token) -> Result<Node, ParseError> {
        match token.kind {
            TokenKind::UnquotedIdentifier(name) => {
                if name == "let" && matches!(self.current_token.kind, TokenKind::Variable(_)) {
                    self.parse_let()
                } else if self.check(&TokenKind::LParen) {
                    self.parse_function_call(name)
                } else {
                    Ok(Node::Identifier(name))
                }
            }
            TokenKind::QuotedIdentifier(name) => {
                if self.check(&TokenKind::LParen) {
                    return Err(ParseError::Invalid {
                        message: "quoted identifier cannot be used as a function name".to_string(),
                        position: token.position,
                    });
                }
                Ok(Node::Identifier(name))
            }
            TokenKind::RawString(s) => Ok(Node::RawString(s)),
            TokenKind::Literal(text) => Ok(Node::Literal(text)),
            TokenKind::At => Ok(Node::Current),
            TokenKind::Dollar => Ok(Node::Root),
            TokenKind::Variable(name) => Ok(Node::VariableRef(name)),
            TokenKind::Star => Ok(apply(Node::Current, Fragment::Values)),
            TokenKind::Not => Ok(Node::Not(Box::new(self.expression(BP_NOT)?))),
            TokenKind::Ampersand => Ok(Node::ExpressionRef(Box::new(self.expression(0)?))),
            TokenKind::LParen => {
                let node = self.expression(0)?;
                self.expect(TokenKind::RParen)?;
                Ok(node)
            }
            TokenKind::LBrace => self.parse_multi_select_hash(),
            TokenKind::LBracket => match self.parse_bracket_fragment()? {
                Some(fragment) => Ok(apply(Node::Current, fragment)),
                None => self.parse_multi_select_list(),
            },
            TokenKind::Flatten => Ok(flatten(Node::Current)),
            TokenKind::Filter => {
                let fragment = self.parse_filter()?;
                Ok(apply(Node::Current, fragment))
            }
            _ => Err(unexpected(&token, "an expression")),
        }
    }

    /// Infix and postfix position.
    fn led(&mut self, token: Token, left: Node) -> Result<Node, ParseError> {
        if let Some(op) = comparator(&token.kind) {
            let right = self.expression(BP_COMPARISON)?;
            return Ok(Node::Comparison {
                op,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        match token.kind {
            TokenKind::Dot => {
                let fragment = self.parse_dot_rhs()?;
                Ok(chain(left, fragment))
            }
            TokenKind::LBracket => match self.parse_bracket_fragment()? {
                Some(fragment) => Ok(chain(left, fragment)),
                None => Err(ParseError::Invalid {
                    message: "multi-select list must start an expression or follow '.'"
                        .to_string(),
                    position: token.position,
                }),
            },
            TokenKind::Filter => {
                let fragment = self.parse_filter()?;
                Ok(chain(left, fragment))
            }
            TokenKind::Flatten => Ok(flatten(left)),
            TokenKind::Pipe => Ok(Node::Pipe {
                left: Box::new(left),
                right: Box::new(self.expression(BP_PIPE)?),
            }),
            TokenKind::Or => Ok(Node::Or {
                left: Box::new(left),
                right: Box::new(self.expression(BP_OR)?),
            }),
            TokenKind::And => Ok(Node::And {
                left: Box::new(left),
                right: Box::new(self.expression(BP_AND)?),
            }),
            _ => Err(unexpected(&token, "an operator")),
        }
    }

    /// After `.`: identifier, function call, `*`, or a multi-select.
    fn parse_dot_rhs(&mut self) -> Result<Fragment, ParseError> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::UnquotedIdentifier(name) => {
                if self.check(&TokenKind::LParen) {
                    Ok(Fragment::Select(self.parse_function_call(name)?))
                } else {
                    Ok(Fragment::Select(Node::Identifier(name)))
                }
            }
            TokenKind::QuotedIdentifier(name) => {
                if self.check(&TokenKind::LParen) {
                    return Err(ParseError::Invalid {
                        message: "quoted identifier cannot be used as a function name".to_string(),
                        position: token.position,
                    });
                }
                Ok(Fragment::Select(Node::Identifier(name)))
            }
            TokenKind::Star => Ok(Fragment::Values),
            TokenKind::LBracket => Ok(Fragment::Select(self.parse_multi_select_list()?)),
            TokenKind::LBrace => Ok(Fragment::Select(self.parse_multi_select_hash()?)),
            _ => Err(unexpected(&token, "identifier, '*', '[' or '{' after '.'")),
        }
    }

    /// After `[`: an index, a slice, or `[*]`. Returns `None` (consuming
    /// nothing) when the bracket opens a multi-select list instead.
    fn parse_bracket_fragment(&mut self) -> Result<Option<Fragment>, ParseError> {
        if matches!(
            self.current_token.kind,
            TokenKind::Integer(_) | TokenKind::Colon
        ) {
            return self.parse_index_or_slice().map(Some);
        }

        if self.check(&TokenKind::Star) && self.peek_is(&TokenKind::RBracket)? {
            self.advance()?; // consume '*'
            self.advance()?; // consume ']'
            return Ok(Some(Fragment::Wildcard));
        }

        Ok(None)
    }

    fn parse_index_or_slice(&mut self) -> Result<Fragment, ParseError> {
        let mut parts: [Option<i64>; 3] = [None; 3];
        let mut colons = 0;

        loop {
            let token = self.advance()?;
            match token.kind {
                TokenKind::RBracket => break,
                TokenKind::Colon if colons < 2 => colons += 1,
                TokenKind::Colon => {
                    return Err(ParseError::Invalid {
                        message: "slice takes at most three parts".to_string(),
                        position: token.position,
                    });
                }
                TokenKind::Integer(n) if parts[colons].is_none() => parts[colons] = Some(n),
                _ => return Err(unexpected(&token, "integer, ':' or ']'")),
            }
        }

        if colons == 0 {
            let [index, _, _] = parts;
            index
                .map(Fragment::Index)
                .ok_or_else(|| self.unexpected("an index"))
        } else {
            let [start, stop, step] = parts;
            Ok(Fragment::Slice(Slice { start, stop, step }))
        }
    }

    /// After `[?`: the condition and the closing bracket.
    fn parse_filter(&mut self) -> Result<Fragment, ParseError> {
        let condition = self.expression(0)?;
        self.expect(TokenKind::RBracket)?;
        Ok(Fragment::Filter(condition))
    }

    fn parse_multi_select_list(&mut self) -> Result<Node, ParseError> {
        let mut elements = vec![];

        loop {
            elements.push(self.expression(0)?);

            let token = self.advance()?;
            match token.kind {
                TokenKind::Comma => continue,
                TokenKind::RBracket => break,
                _ => return Err(unexpected(&token, "',' or ']'")),
            }
        }

        Ok(Node::MultiSelectList(elements))
    }

    fn parse_multi_select_hash(&mut self) -> Result<Node, ParseError> {
        let mut pairs = vec![];

        loop {
            let token = self.advance()?;
            let key = match token.kind {
                TokenKind::UnquotedIdentifier(key) | TokenKind::QuotedIdentifier(key) => key,
                _ => return Err(unexpected(&token, "identifier as multi-select hash key")),
            };

            self.expect(TokenKind::Colon)?;

            let value = self.expression(0)?;
            pairs.push(KeyValue { key, value });

            let token = self.advance()?;
            match token.kind {
                TokenKind::Comma => continue,
                TokenKind::RBrace => break,
                _ => return Err(unexpected(&token, "',' or '}'")),
            }
        }

        Ok(Node::MultiSelectHash(pairs))
    }

    /// Current token is the `(` after the function name.
    fn parse_function_call(&mut self, name: String) -> Result<Node, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut args = vec![];

        if self.check(&TokenKind::RParen) {
            self.advance()?;
            return Ok(Node::FunctionCall { name, args });
        }

        loop {
            args.push(self.expression(0)?);

            let token = self.advance()?;
            match token.kind {
                TokenKind::Comma => continue,
                TokenKind::RParen => break,
                _ => return Err(unexpected(&token, "',' or ')'")),
            }
        }

        Ok(Node::FunctionCall { name, args })
    }

    /// `let` has been consumed and the current token is a variable.
    fn parse_let(&mut self) -> Result<Node, ParseError> {
        let mut bindings = vec![];

        loop {
            let token = self.advance()?;
            let name = match token.kind {
                TokenKind::Variable(name) => name,
                _ => return Err(unexpected(&token, "variable binding ($name = expression)")),
            };

            self.expect(TokenKind::Assign)?;
            let value = self.expression(0)?;
            bindings.push(Binding { name, value });

            if self.check(&TokenKind::Comma) {
                self.advance()?;
            } else {
                break;
            }
        }

        if !self.current_token.kind.is_word("in") {
            return Err(self.unexpected("'in' after let bindings"));
        }
        self.advance()?;

        let body = self.expression(0)?;
        Ok(Node::Let {
            bindings,
            body: Box::new(body),
        })
    }
}

fn unexpected(token: &Token, expected: &str) -> ParseError {
    ParseError::Unexpected {
        found: token.kind.to_string(),
        expected: expected.to_string(),
        position: token.position,
    }
}

#[cfg(test)]
fn parse(input: &str) -> Result<Node, ParseError> {
    Parser::new(Lexer::new(input))?.parse()
}

#[test]
fn test_dot_after_projection_extends_rhs() {
    let node = parse("foo[*].bar.baz").unwrap();
    assert_eq!(
        node,
        Node::ArrayProjection {
            left: Box::new(Node::Identifier("foo".into())),
            right: Some(Box::new(Node::subexpression(
                Node::Identifier("bar".into()),
                Node::Identifier("baz".into()),
            ))),
        }
    );
}

#[test]
fn test_flatten_wraps_projection() {
    let node = parse("foo[*][]").unwrap();
    assert_eq!(
        node,
        Node::ArrayProjection {
            left: Box::new(Node::Flatten(Box::new(Node::ArrayProjection {
                left: Box::new(Node::Identifier("foo".into())),
                right: None,
            }))),
            right: None,
        }
    );
}

#[test]
fn test_multi_select_list_requires_dot() {
    assert!(parse("foo[abc]").is_err());
    assert!(parse("foo.[abc]").is_ok());
    // Elements are expressions, so a bare index is not one.
    assert!(parse("foo.[0]").is_err());
    assert!(parse("foo.[abc, 1]").is_err());
}

// tests/lexer_tests.rs

use clove_jmespath::ast::TokenKind;
use clove_jmespath::lexer::{Lexer, Position};
use pretty_assertions::assert_eq;

fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::new(input)
        .tokenize()
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn single(input: &str) -> TokenKind {
    let mut lexer = Lexer::new(input);
    lexer.next_token().unwrap().kind
}

// ============================================================================
// Single Character Tokens
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("$", TokenKind::Dollar),
        ("@", TokenKind::At),
        ("&", TokenKind::Ampersand),
        ("!", TokenKind::Not),
        ("|", TokenKind::Pipe),
        ("*", TokenKind::Star),
        ("(", TokenKind::LParen),
        (")", TokenKind::RParen),
        ("[", TokenKind::LBracket),
        ("]", TokenKind::RBracket),
        ("{", TokenKind::LBrace),
        ("}", TokenKind::RBrace),
        (".", TokenKind::Dot),
        (",", TokenKind::Comma),
        (":", TokenKind::Colon),
        ("=", TokenKind::Assign),
        ("<", TokenKind::Lt),
        (">", TokenKind::Gt),
    ];

    for (input, expected) in test_cases {
        assert_eq!(single(input), expected, "input: {input}");
    }
}

#[test]
fn test_eof_repeats() {
    let mut lexer = Lexer::new("");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn test_unquoted_identifiers() {
    assert_eq!(
        kinds("foo _bar baz_2"),
        vec![
            TokenKind::UnquotedIdentifier("foo".into()),
            TokenKind::UnquotedIdentifier("_bar".into()),
            TokenKind::UnquotedIdentifier("baz_2".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keywords_are_identifiers() {
    assert_eq!(
        kinds("let in"),
        vec![
            TokenKind::UnquotedIdentifier("let".into()),
            TokenKind::UnquotedIdentifier("in".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_quoted_identifier_escapes() {
    assert_eq!(single(r#""foo bar""#), TokenKind::QuotedIdentifier("foo bar".into()));
    assert_eq!(single(r#""a\"b""#), TokenKind::QuotedIdentifier("a\"b".into()));
    assert_eq!(single(r#""tab\there""#), TokenKind::QuotedIdentifier("tab\there".into()));
    assert_eq!(single(r#""é""#), TokenKind::QuotedIdentifier("é".into()));
}

#[test]
fn test_quoted_identifier_surrogate_pair() {
    assert_eq!(single(r#""\ud83d\ude00""#), TokenKind::QuotedIdentifier("😀".into()));
}

#[test]
fn test_quoted_identifier_errors() {
    assert!(Lexer::new(r#""unterminated"#).next_token().is_err());
    assert!(Lexer::new(r#""\q""#).next_token().is_err());
    assert!(Lexer::new(r#""\ud83d""#).next_token().is_err());
}

#[test]
fn test_variables() {
    assert_eq!(single("$foo"), TokenKind::Variable("foo".into()));
    assert_eq!(
        kinds("$ $x"),
        vec![TokenKind::Dollar, TokenKind::Variable("x".into()), TokenKind::Eof]
    );
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_raw_strings() {
    assert_eq!(single("'foo'"), TokenKind::RawString("foo".into()));
    assert_eq!(single(r"'it\'s'"), TokenKind::RawString("it's".into()));
    // Other backslashes are kept verbatim.
    assert_eq!(single(r"'a\nb'"), TokenKind::RawString(r"a\nb".into()));
    assert_eq!(single("''"), TokenKind::RawString(String::new()));
}

#[test]
fn test_json_literals() {
    assert_eq!(single("`true`"), TokenKind::Literal("true".into()));
    assert_eq!(single(r#"`{"a": [1, 2]}`"#), TokenKind::Literal(r#"{"a": [1, 2]}"#.into()));
    assert_eq!(single(r#"`"a\`b"`"#), TokenKind::Literal(r#""a`b""#.into()));
}

#[test]
fn test_invalid_json_literal_is_rejected() {
    let err = Lexer::new("`{not json}`").next_token().unwrap_err();
    assert_eq!(err.position, Position::start());
    assert!(Lexer::new("`foo`").next_token().is_err());
    assert!(Lexer::new("`[1, 2").next_token().is_err());
}

#[test]
fn test_numbers() {
    assert_eq!(single("0"), TokenKind::Integer(0));
    assert_eq!(single("42"), TokenKind::Integer(42));
    assert_eq!(single("-7"), TokenKind::Integer(-7));
    assert_eq!(single("1.5"), TokenKind::Float(1.5));
    assert_eq!(single("2e3"), TokenKind::Float(2000.0));
}

#[test]
fn test_lone_minus_is_error() {
    assert!(Lexer::new("-").next_token().is_err());
    assert!(Lexer::new("-a").next_token().is_err());
}

// ============================================================================
// Compound Expressions
// ============================================================================

#[test]
fn test_slice_tokens() {
    assert_eq!(
        kinds("[::-1]"),
        vec![
            TokenKind::LBracket,
            TokenKind::Colon,
            TokenKind::Colon,
            TokenKind::Integer(-1),
            TokenKind::RBracket,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_filter_expression_tokens() {
    assert_eq!(
        kinds("foo[?bar >= `1`]"),
        vec![
            TokenKind::UnquotedIdentifier("foo".into()),
            TokenKind::Filter,
            TokenKind::UnquotedIdentifier("bar".into()),
            TokenKind::GtEq,
            TokenKind::Literal("1".into()),
            TokenKind::RBracket,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_let_expression_tokens() {
    assert_eq!(
        kinds("let $x = a in $x"),
        vec![
            TokenKind::UnquotedIdentifier("let".into()),
            TokenKind::Variable("x".into()),
            TokenKind::Assign,
            TokenKind::UnquotedIdentifier("a".into()),
            TokenKind::UnquotedIdentifier("in".into()),
            TokenKind::Variable("x".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_unexpected_character() {
    let err = Lexer::new("foo ^").tokenize().unwrap_err();
    assert_eq!(err.position.offset, 4);
    assert_eq!(err.position.column, 5);
}

#[test]
fn test_positions_track_lines() {
    let tokens = Lexer::new("a\n  b").tokenize().unwrap();
    assert_eq!(tokens[1].position.line, 2);
    assert_eq!(tokens[1].position.column, 3);
    assert_eq!(tokens[1].text, "b");
}

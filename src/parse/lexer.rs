use winnow::combinator::{alt, delimited, opt};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

use super::error::{SyntaxError, SyntaxErrorKind};

/// Lexical category of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind<'a> {
    And,
    Or,
    Not,
    In,
    True,
    False,
    Null,
    Obj,
    User,
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
    Dot,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    /// String contents, quotes stripped, taken verbatim.
    Str(&'a str),
    Int(i64),
    Float(f64),
    Name(&'a str),
}

/// One lexeme borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// Exact source slice, including quotes for strings.
    pub text: &'a str,
    /// Zero-based character offset into the source.
    pub offset: usize,
}

enum Lexeme<'a> {
    Punct(TokenKind<'a>),
    Str(&'a str),
    Number(&'a str),
    Word(&'a str),
}

// -- Lexeme rules -----------------------------------------------------------

fn punct<'a>(input: &mut &'a str) -> ModalResult<TokenKind<'a>> {
    alt((
        "==".value(TokenKind::Eq),
        "!=".value(TokenKind::Ne),
        ">=".value(TokenKind::Ge),
        "<=".value(TokenKind::Le),
        '>'.value(TokenKind::Gt),
        '<'.value(TokenKind::Lt),
        '.'.value(TokenKind::Dot),
        '('.value(TokenKind::LParen),
        ')'.value(TokenKind::RParen),
        '['.value(TokenKind::LBracket),
        ']'.value(TokenKind::RBracket),
        ','.value(TokenKind::Comma),
    ))
    .parse_next(input)
}

fn string_literal<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited('"', take_while(0.., |c: char| c != '"'), '"').parse_next(input)
}

fn digits<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)
}

fn number<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    (opt('-'), digits, opt(('.', digits)))
        .take()
        .parse_next(input)
}

fn word<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn lexeme<'a>(input: &mut &'a str) -> ModalResult<Lexeme<'a>> {
    alt((
        string_literal.map(Lexeme::Str),
        number.map(Lexeme::Number),
        word.map(Lexeme::Word),
        punct.map(Lexeme::Punct),
    ))
    .parse_next(input)
}

fn keyword(word: &str) -> Option<TokenKind<'static>> {
    Some(match word {
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "in" => TokenKind::In,
        "true" | "True" => TokenKind::True,
        "false" | "False" => TokenKind::False,
        "null" | "None" => TokenKind::Null,
        "obj" => TokenKind::Obj,
        "user" => TokenKind::User,
        _ => return None,
    })
}

// -- Tokenizer --------------------------------------------------------------

/// Split `source` into tokens, skipping spaces and tabs.
///
/// # Errors
///
/// Returns [`SyntaxError`] at the first character no token rule accepts, or
/// for an integer literal that does not fit in `i64`.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, SyntaxError> {
    let mut input = source;
    let mut tokens = Vec::new();

    loop {
        input = input.trim_start_matches([' ', '\t']);
        if input.is_empty() {
            break;
        }

        let start = source.len() - input.len();
        let offset = source[..start].chars().count();

        let Ok(lex) = lexeme.parse_next(&mut input) else {
            let bad = source[start..].chars().next().unwrap_or_default();
            return Err(SyntaxError::new(
                SyntaxErrorKind::InvalidCharacter(bad),
                source,
                Some(offset),
            ));
        };
        let text = &source[start..source.len() - input.len()];

        let kind = match lex {
            Lexeme::Punct(kind) => kind,
            Lexeme::Str(content) => TokenKind::Str(content),
            Lexeme::Word(word) => keyword(word).unwrap_or(TokenKind::Name(word)),
            Lexeme::Number(literal) => number_kind(literal).ok_or_else(|| {
                SyntaxError::new(
                    SyntaxErrorKind::InvalidNumber(literal.to_owned()),
                    source,
                    Some(offset),
                )
            })?,
        };

        tokens.push(Token { kind, text, offset });
    }

    Ok(tokens)
}

fn number_kind(text: &str) -> Option<TokenKind<'static>> {
    if text.contains('.') {
        text.parse().ok().map(TokenKind::Float)
    } else {
        text.parse().ok().map(TokenKind::Int)
    }
}

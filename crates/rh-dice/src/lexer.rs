//! Tokenizer for dice expressions.

use logos::Logos;
use std::fmt;

use crate::error::{DiceError, DiceResult};

/// Token type for dice expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Plus sign `+` (binary or unary).
    Plus,
    /// Minus sign `-` (binary or unary).
    Minus,
    /// Multiplication `*`.
    Star,
    /// Left parenthesis `(`.
    LParen,
    /// Right parenthesis `)`.
    RParen,
    /// Dice marker `d` or `D`.
    Die,
    /// Unsigned integer literal.
    Number(i64),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Die => write!(f, "d"),
            Token::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Internal logos token, converted to an owned `Token` after lexing.
#[derive(Logos, Debug)]
#[logos(skip r"\s+")]
enum RawToken {
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[regex("[dD]")]
    Die,

    #[regex("[0-9]+")]
    Number,
}

/// Lex an expression into `(Token, offset)` pairs.
///
/// Unlike a source-file lexer this stops at the first bad character: dice
/// expressions are one-liners and there is nothing useful to recover.
pub fn lex(source: &str) -> DiceResult<Vec<(Token, usize)>> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let raw = result.map_err(|()| DiceError::InvalidCharacter {
            position: span.start,
            ch: source[span.start..].chars().next().unwrap_or('?'),
        })?;
        let token = match raw {
            RawToken::Plus => Token::Plus,
            RawToken::Minus => Token::Minus,
            RawToken::Star => Token::Star,
            RawToken::LParen => Token::LParen,
            RawToken::RParen => Token::RParen,
            RawToken::Die => Token::Die,
            RawToken::Number => {
                let n = lexer
                    .slice()
                    .parse::<i64>()
                    .map_err(|_| DiceError::Overflow)?;
                Token::Number(n)
            }
        };
        tokens.push((token, span.start));
    }

    Ok(tokens)
}

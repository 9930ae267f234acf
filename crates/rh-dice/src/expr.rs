//! Expression syntax tree and recursive-descent parser.
//!
//! Grammar (standard precedence, left-associative):
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor ('*' factor)*
//! factor := ('+' | '-') factor | '(' expr ')' | dice | integer
//! dice   := [signed-int] ('d' | 'D') unsigned-int
//! ```
//!
//! A sign directly followed by digits and a `d` belongs to the dice count,
//! so `-2d6` is a dice term with count -2 (and fails validation) rather
//! than the negation of `2d6`.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{DiceError, DiceResult};
use crate::lexer::{Token, lex};

/// Allowed number of dice in a single term.
pub const COUNT_RANGE: RangeInclusive<i64> = 1..=100;

/// Allowed number of sides on a die.
pub const SIDES_RANGE: RangeInclusive<i64> = 2..=1000;

/// Deepest syntax tree the parser will build. Counts nested parentheses,
/// unary signs and chained operators.
pub const MAX_DEPTH: usize = 200;

/// A single `NdM` term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceTerm {
    /// Number of dice (signed, as written).
    pub count: i64,
    /// Number of sides per die.
    pub sides: i64,
}

impl DiceTerm {
    /// Create a dice term without validating it.
    pub fn new(count: i64, sides: i64) -> Self {
        Self { count, sides }
    }

    /// Check the term against the count and sides limits.
    pub fn validate(&self) -> DiceResult<()> {
        if COUNT_RANGE.contains(&self.count) && SIDES_RANGE.contains(&self.sides) {
            Ok(())
        } else {
            Err(DiceError::OutOfRange {
                count: self.count,
                sides: self.sides,
            })
        }
    }
}

impl fmt::Display for DiceTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// A binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
}

impl BinOp {
    /// Apply the operator with overflow checking.
    pub fn apply(self, lhs: i64, rhs: i64) -> DiceResult<i64> {
        let value = match self {
            Self::Add => lhs.checked_add(rhs),
            Self::Sub => lhs.checked_sub(rhs),
            Self::Mul => lhs.checked_mul(rhs),
        };
        value.ok_or(DiceError::Overflow)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mul => write!(f, "*"),
        }
    }
}

/// A node in the expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Integer literal.
    Number(i64),
    /// Dice term.
    Dice(DiceTerm),
    /// Unary negation.
    Neg(Box<Expr>),
    /// Parenthesized sub-expression.
    Group(Box<Expr>),
    /// Binary operation.
    Binary {
        /// Operator.
        op: BinOp,
        /// Left operand (evaluated first).
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Collect dice terms in evaluation order (left-to-right, depth-first).
    fn collect_dice(&self, out: &mut Vec<DiceTerm>) {
        match self {
            Expr::Number(_) => {}
            Expr::Dice(term) => out.push(*term),
            Expr::Neg(inner) | Expr::Group(inner) => inner.collect_dice(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_dice(out);
                rhs.collect_dice(out);
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Dice(term) => write!(f, "{term}"),
            // `-2d6` would read back as a signed dice count
            Expr::Neg(inner) if matches!(**inner, Expr::Dice(_)) => write!(f, "-({inner})"),
            Expr::Neg(inner) => write!(f, "-{inner}"),
            Expr::Group(inner) => write!(f, "({inner})"),
            Expr::Binary { op, lhs, rhs } => write!(f, "{lhs}{op}{rhs}"),
        }
    }
}

/// A parsed dice expression, ready to be validated and rolled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    root: Expr,
}

impl Expression {
    /// Parse an expression. Whitespace anywhere in the input is ignored.
    pub fn parse(source: &str) -> DiceResult<Self> {
        let stripped: String = source.chars().filter(|c| !c.is_whitespace()).collect();
        if stripped.is_empty() {
            return Err(DiceError::EmptyExpression);
        }

        let tokens = lex(&stripped)?;
        let mut parser = Parser::new(&tokens, stripped.len());
        let (root, _) = parser.expr()?;
        if parser.pos < tokens.len() {
            return Err(DiceError::TrailingGarbage {
                position: parser.offset(),
            });
        }

        Ok(Self { root })
    }

    /// The root node of the syntax tree.
    pub fn root(&self) -> &Expr {
        &self.root
    }

    /// All dice terms in evaluation order.
    pub fn dice_terms(&self) -> Vec<DiceTerm> {
        let mut terms = Vec::new();
        self.root.collect_dice(&mut terms);
        terms
    }

    /// Validate every dice term; reports the first violation in evaluation order.
    pub fn validate(&self) -> DiceResult<()> {
        self.dice_terms().iter().try_for_each(DiceTerm::validate)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl std::str::FromStr for Expression {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Recursive-descent parser over a lexed token slice.
///
/// Every rule returns the node together with its depth so that later tree
/// walks stay within [`MAX_DEPTH`].
struct Parser<'t> {
    tokens: &'t [(Token, usize)],
    pos: usize,
    end: usize,
}

type Node = (Expr, usize);

impl<'t> Parser<'t> {
    fn new(tokens: &'t [(Token, usize)], end: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            end,
        }
    }

    fn peek(&self) -> Option<Token> {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> Option<Token> {
        self.tokens.get(self.pos + ahead).map(|(t, _)| *t)
    }

    /// Offset of the current token, or the end of input.
    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, o)| *o)
            .unwrap_or(self.end)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn nest(&self, depth: usize, position: usize) -> DiceResult<usize> {
        let depth = depth + 1;
        if depth > MAX_DEPTH {
            return Err(DiceError::TooDeep { position });
        }
        Ok(depth)
    }

    fn binary(&self, op: BinOp, lhs: Node, rhs: Node, position: usize) -> DiceResult<Node> {
        let depth = self.nest(lhs.1.max(rhs.1), position)?;
        let node = Expr::Binary {
            op,
            lhs: Box::new(lhs.0),
            rhs: Box::new(rhs.0),
        };
        Ok((node, depth))
    }

    fn expr(&mut self) -> DiceResult<Node> {
        self.expr_at(0)
    }

    fn expr_at(&mut self, nesting: usize) -> DiceResult<Node> {
        let mut lhs = self.term(nesting)?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(lhs),
            };
            let position = self.offset();
            self.advance();
            let rhs = self.term(nesting)?;
            lhs = self.binary(op, lhs, rhs, position)?;
        }
    }

    fn term(&mut self, nesting: usize) -> DiceResult<Node> {
        let mut lhs = self.factor(nesting)?;
        while self.peek() == Some(Token::Star) {
            let position = self.offset();
            self.advance();
            let rhs = self.factor(nesting)?;
            lhs = self.binary(BinOp::Mul, lhs, rhs, position)?;
        }
        Ok(lhs)
    }

    /// `nesting` counts the enclosing parentheses and unary signs, which
    /// bounds the parser's own recursion.
    fn factor(&mut self, nesting: usize) -> DiceResult<Node> {
        match self.peek() {
            Some(sign @ (Token::Plus | Token::Minus)) => {
                // Signed dice count: `-2d6`, `+3d4`
                if let (Some(Token::Number(n)), Some(Token::Die)) =
                    (self.peek_at(1), self.peek_at(2))
                {
                    self.advance();
                    self.advance();
                    let count = if sign == Token::Minus { -n } else { n };
                    return self.dice_tail(count);
                }
                let nesting = self.nest(nesting, self.offset())?;
                self.advance();
                let (inner, depth) = self.factor(nesting)?;
                Ok(match sign {
                    Token::Minus => (Expr::Neg(Box::new(inner)), depth + 1),
                    _ => (inner, depth),
                })
            }
            Some(Token::LParen) => {
                let open = self.offset();
                let nesting = self.nest(nesting, open)?;
                self.advance();
                let (inner, depth) = self.expr_at(nesting)?;
                if self.peek() != Some(Token::RParen) {
                    return Err(DiceError::UnbalancedParentheses { position: open });
                }
                self.advance();
                Ok((Expr::Group(Box::new(inner)), depth + 1))
            }
            Some(Token::Number(n)) => {
                self.advance();
                if self.peek() == Some(Token::Die) {
                    self.dice_tail(n)
                } else {
                    Ok((Expr::Number(n), 1))
                }
            }
            Some(Token::Die) => self.dice_tail(1),
            Some(Token::Star | Token::RParen) | None => Err(DiceError::ExpectedOperand {
                position: self.offset(),
            }),
        }
    }

    /// Parse `d<sides>`; the current token must be the `d`.
    fn dice_tail(&mut self, count: i64) -> DiceResult<Node> {
        let position = self.offset();
        self.advance();
        match self.peek() {
            Some(Token::Number(sides)) => {
                self.advance();
                Ok((Expr::Dice(DiceTerm::new(count, sides)), 1))
            }
            _ => Err(DiceError::MalformedDiceTerm { position }),
        }
    }
}

//! Error types for dice parsing, evaluation and list picking.

/// Errors produced while parsing or evaluating a dice expression.
///
/// Positions are byte offsets into the expression after whitespace removal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    /// The expression contained nothing but whitespace.
    #[error("empty expression")]
    EmptyExpression,

    /// A `d` was not followed by a number of sides.
    #[error("malformed dice term at {position}: expected sides after 'd'")]
    MalformedDiceTerm {
        /// Offset of the `d`.
        position: usize,
    },

    /// A `(` was never closed.
    #[error("unbalanced parentheses: '(' at {position} is never closed")]
    UnbalancedParentheses {
        /// Offset of the unmatched `(`.
        position: usize,
    },

    /// Input remained after a complete expression was parsed.
    #[error("unexpected input at {position} after end of expression")]
    TrailingGarbage {
        /// Offset of the first unconsumed token.
        position: usize,
    },

    /// A dice term violates `1 <= count <= 100` or `2 <= sides <= 1000`.
    #[error("out of range: {count}d{sides} (require 1 <= N <= 100 and 2 <= M <= 1000)")]
    OutOfRange {
        /// Requested number of dice.
        count: i64,
        /// Requested number of sides.
        sides: i64,
    },

    /// A character outside the expression alphabet.
    #[error("invalid character {ch:?} at {position}")]
    InvalidCharacter {
        /// Offset of the character.
        position: usize,
        /// The offending character.
        ch: char,
    },

    /// An operator or `(` was not followed by an operand.
    #[error("expected a number, dice term or '(' at {position}")]
    ExpectedOperand {
        /// Offset where the operand was expected.
        position: usize,
    },

    /// Parentheses, signs or operators are nested beyond the parser's limit.
    #[error("expression too deeply nested at {position}")]
    TooDeep {
        /// Offset where the limit was reached.
        position: usize,
    },

    /// A literal or intermediate result does not fit in a signed 64-bit integer.
    #[error("arithmetic overflow")]
    Overflow,
}

/// Convenience result type for dice operations.
pub type DiceResult<T> = Result<T, DiceError>;

/// Errors produced by the list pickers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PickError {
    /// The item list was empty after splitting.
    #[error("no items provided")]
    NoItems,

    /// A count argument was outside its allowed range.
    #[error("out of range: require {min} <= {what} <= {max}, got {value}")]
    PickOutOfRange {
        /// Name of the argument.
        what: &'static str,
        /// Value supplied.
        value: i64,
        /// Smallest allowed value.
        min: i64,
        /// Largest allowed value.
        max: i64,
    },

    /// More picks were requested than there are items.
    #[error("cannot pick {num} from {available} items")]
    TooManyPicks {
        /// Requested number of picks.
        num: usize,
        /// Number of items available.
        available: usize,
    },

    /// The list exceeds the shuffle limit.
    #[error("too many items: {count} (maximum {max})")]
    TooManyItems {
        /// Number of items supplied.
        count: usize,
        /// Largest allowed list.
        max: usize,
    },
}

/// Convenience result type for picker operations.
pub type PickResult<T> = Result<T, PickError>;

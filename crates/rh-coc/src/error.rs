//! Error types for the percentile rules.

use rh_dice::DiceError;

/// Errors that can occur while applying percentile rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CocError {
    /// A dice expression used by a rule failed to parse or evaluate.
    #[error(transparent)]
    Dice(#[from] DiceError),

    /// A repetition count was outside its allowed range.
    #[error("invalid count {count}: require 1 <= count <= {max}")]
    InvalidCount {
        /// Count requested.
        count: usize,
        /// Largest allowed count.
        max: usize,
    },
}

/// Convenience result type for percentile rule operations.
pub type CocResult<T> = Result<T, CocError>;

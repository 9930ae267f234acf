//! Error types for the table service.

use rh_coc::CocError;
use rh_dice::{DiceError, PickError};
use thiserror::Error;

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Errors returned by the table service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A dice expression failed to parse or evaluate.
    #[error(transparent)]
    Dice(#[from] DiceError),

    /// A list picker rejected its input.
    #[error(transparent)]
    Pick(#[from] PickError),

    /// A percentile rule failed.
    #[error(transparent)]
    Coc(#[from] CocError),

    /// The subject has no attribute with this label.
    #[error("attribute not found: {label}")]
    AttributeNotFound {
        /// Label as requested.
        label: String,
    },

    /// An attribute value could not be used as requested.
    #[error("invalid value for {label}: {reason}")]
    InvalidAttributeValue {
        /// Label of the offending attribute.
        label: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Another subject already holds the moderator role in this scope.
    #[error("scope {scope} already has a moderator ({holder})")]
    AlreadyClaimed {
        /// Scope the claim was made in.
        scope: u64,
        /// Current holder of the role.
        holder: u64,
    },

    /// A `label value` segment could not be parsed.
    #[error("cannot parse '{raw}': expected a label followed by an integer")]
    InvalidSegment {
        /// The raw segment.
        raw: String,
    },

    /// A check target was outside 1..=100.
    #[error("target {0} out of range (require 1 <= target <= 100)")]
    TargetOutOfRange(i64),

    /// The display name can only be changed through the rename operation.
    #[error("NAME is reserved; use the name command to change or clear it")]
    ProtectedAttribute,

    /// No pending offer with this id exists in the scope.
    #[error("no pending check #{0}")]
    UnknownOffer(u64),

    /// The caller does not hold the moderator role.
    #[error("only the moderator can do that")]
    NotModerator,

    /// A moderator tried to accept their own offer.
    #[error("the moderator cannot accept their own offer")]
    SelfAccept,
}

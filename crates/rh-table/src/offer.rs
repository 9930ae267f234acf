//! Checks offered by a moderator for other subjects to roll.

use rh_dice::Expression;

use crate::table::{AttributeCheck, SanityReport};

/// What an offer asks the accepting subject to roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferKind {
    /// A percentile check against one of the subject's attributes.
    Skill {
        /// Attribute label to check.
        label: String,
    },
    /// A sanity check with success and failure loss expressions.
    Sanity {
        /// Loss rolled on any success tier.
        on_success: Expression,
        /// Loss rolled on failure.
        on_failure: Expression,
    },
}

/// A check waiting to be accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCheck {
    /// Offer id, unique within a table.
    pub id: u64,
    /// Scope the offer was made in.
    pub scope_id: u64,
    /// Moderator who made the offer.
    pub offered_by: u64,
    /// The check to roll.
    pub kind: OfferKind,
}

impl std::fmt::Display for PendingCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            OfferKind::Skill { label } => write!(f, "#{} check {label}", self.id),
            OfferKind::Sanity {
                on_success,
                on_failure,
            } => write!(f, "#{} sanity {on_success}/{on_failure}", self.id),
        }
    }
}

/// How a requested check was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckDisposition<T> {
    /// The requester is the moderator; the check was offered with this id.
    Offered(u64),
    /// The requester rolled the check themselves.
    Resolved(T),
}

/// The result of accepting an offer.
#[derive(Debug, Clone)]
pub enum OfferResolution {
    /// A skill check was rolled.
    Skill(AttributeCheck),
    /// A sanity check was rolled.
    Sanity(SanityReport),
}

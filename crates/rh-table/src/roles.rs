//! Moderator (keeper) role per scope.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{TableError, TableResult};

/// The result of a successful claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimOutcome {
    /// The role was free and is now held by the claimant.
    Claimed,
    /// The claimant already held the role.
    AlreadyHolder,
}

/// At most one moderator per scope.
#[derive(Debug, Clone, Default)]
pub struct RoleState {
    holders: HashMap<u64, u64>,
}

impl RoleState {
    /// Create an empty role map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the moderator role in `scope`.
    pub fn claim(&mut self, scope: u64, subject: u64) -> TableResult<ClaimOutcome> {
        match self.holders.get(&scope) {
            Some(&holder) if holder == subject => Ok(ClaimOutcome::AlreadyHolder),
            Some(&holder) => Err(TableError::AlreadyClaimed { scope, holder }),
            None => {
                self.holders.insert(scope, subject);
                tracing::info!(scope, subject, "moderator role claimed");
                Ok(ClaimOutcome::Claimed)
            }
        }
    }

    /// Release the role if `subject` holds it. Returns true if released.
    pub fn release_if_holder(&mut self, scope: u64, subject: u64) -> bool {
        if self.holders.get(&scope) != Some(&subject) {
            return false;
        }
        self.holders.remove(&scope);
        tracing::info!(scope, subject, "moderator role released");
        true
    }

    /// The current holder of the role in `scope`.
    pub fn holder_of(&self, scope: u64) -> Option<u64> {
        self.holders.get(&scope).copied()
    }

    /// Returns true if `subject` holds the role in `scope`.
    pub fn is_holder(&self, scope: u64, subject: u64) -> bool {
        self.holder_of(scope) == Some(subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_is_exclusive() {
        let mut roles = RoleState::new();
        assert_eq!(roles.claim(1, 10), Ok(ClaimOutcome::Claimed));
        assert_eq!(roles.claim(1, 10), Ok(ClaimOutcome::AlreadyHolder));
        assert_eq!(
            roles.claim(1, 20),
            Err(TableError::AlreadyClaimed {
                scope: 1,
                holder: 10
            })
        );
        assert_eq!(roles.holder_of(1), Some(10));
    }

    #[test]
    fn scopes_independent() {
        let mut roles = RoleState::new();
        roles.claim(1, 10).unwrap();
        assert_eq!(roles.claim(2, 20), Ok(ClaimOutcome::Claimed));
        assert!(roles.is_holder(2, 20));
        assert!(!roles.is_holder(1, 20));
    }

    #[test]
    fn release_only_by_holder() {
        let mut roles = RoleState::new();
        roles.claim(1, 10).unwrap();
        assert!(!roles.release_if_holder(1, 20));
        assert_eq!(roles.holder_of(1), Some(10));
        assert!(roles.release_if_holder(1, 10));
        assert_eq!(roles.holder_of(1), None);
        assert!(!roles.release_if_holder(1, 10));
        assert_eq!(roles.claim(1, 20), Ok(ClaimOutcome::Claimed));
    }
}

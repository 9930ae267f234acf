//! Sanity checks.
//!
//! A sanity check is a percentile check against current SAN. The loss
//! expression for the matching branch is rolled and subtracted, never
//! taking SAN below zero. Losing 5 or more in one check triggers a bout of
//! madness.

use rand::Rng;
use rh_dice::{Evaluation, Expression};
use serde::Serialize;

use crate::check::{CheckResult, check};
use crate::error::CocResult;
use crate::insanity::{BoutOfMadness, roll_bout};

/// Loss at or above which a bout of madness is rolled.
pub const BOUT_THRESHOLD: i64 = 5;

/// The result of a sanity check.
#[derive(Debug, Clone, Serialize)]
pub struct SanityResult {
    /// The percentile check against current SAN.
    pub check: CheckResult,
    /// The rolled loss expression for the branch taken.
    pub loss_roll: Evaluation,
    /// SAN actually lost, clamped to `0..=current`.
    pub loss: i64,
    /// SAN after the loss.
    pub new_sanity: i64,
    /// Bout of madness, when the loss reached the threshold.
    pub bout: Option<BoutOfMadness>,
}

/// Roll a sanity check.
///
/// `on_success` is rolled for any success tier, `on_failure` otherwise.
/// Both expressions are validated before the check is rolled.
pub fn sanity_check<R: Rng + ?Sized>(
    current: i64,
    on_success: &Expression,
    on_failure: &Expression,
    rng: &mut R,
) -> CocResult<SanityResult> {
    on_success.validate()?;
    on_failure.validate()?;

    let target = current.clamp(0, 100) as u32;
    let check = check(target, rng);
    let branch = if check.outcome.is_success() {
        on_success
    } else {
        on_failure
    };
    let loss_roll = branch.roll(rng)?;
    let loss = loss_roll.total.clamp(0, current.max(0));
    let new_sanity = current - loss;
    let bout = (loss >= BOUT_THRESHOLD).then(|| roll_bout(rng));

    tracing::debug!(
        current,
        roll = check.roll,
        outcome = check.outcome.as_str(),
        loss,
        "sanity check"
    );

    Ok(SanityResult {
        check,
        loss_roll,
        loss,
        new_sanity,
        bout,
    })
}

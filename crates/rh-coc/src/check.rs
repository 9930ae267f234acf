//! Percentile (d100 roll-under) checks.
//!
//! A single 1-100 roll is compared with a target value and classified into
//! six ordered tiers. Classification priority is fixed: a roll of 1-5 at or
//! under the target is always a critical success, even when it would also
//! qualify as extreme or hard. A roll of 96-100 above the target is a
//! critical failure.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// The classified result of a percentile check, best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Roll of 1-5 at or under the target.
    CriticalSuccess,
    /// Roll at or under one fifth of the target.
    ExtremeSuccess,
    /// Roll at or under half the target.
    HardSuccess,
    /// Roll at or under the target.
    Success,
    /// Roll above the target.
    Failure,
    /// Roll of 96-100 above the target.
    CriticalFailure,
}

impl CheckOutcome {
    /// All outcomes in order from best to worst.
    pub fn all() -> &'static [CheckOutcome] {
        &[
            Self::CriticalSuccess,
            Self::ExtremeSuccess,
            Self::HardSuccess,
            Self::Success,
            Self::Failure,
            Self::CriticalFailure,
        ]
    }

    /// Returns true for any of the four success tiers.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            Self::CriticalSuccess | Self::ExtremeSuccess | Self::HardSuccess | Self::Success
        )
    }

    /// Stable snake-case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CriticalSuccess => "critical_success",
            Self::ExtremeSuccess => "extreme_success",
            Self::HardSuccess => "hard_success",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::CriticalFailure => "critical_failure",
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CriticalSuccess => write!(f, "Critical Success"),
            Self::ExtremeSuccess => write!(f, "Extreme Success"),
            Self::HardSuccess => write!(f, "Hard Success"),
            Self::Success => write!(f, "Success"),
            Self::Failure => write!(f, "Failure"),
            Self::CriticalFailure => write!(f, "Critical Failure"),
        }
    }
}

/// Classify a roll against a target.
pub fn classify(roll: u32, target: u32) -> CheckOutcome {
    if roll <= target {
        if (1..=5).contains(&roll) {
            CheckOutcome::CriticalSuccess
        } else if roll <= target / 5 {
            CheckOutcome::ExtremeSuccess
        } else if roll <= target / 2 {
            CheckOutcome::HardSuccess
        } else {
            CheckOutcome::Success
        }
    } else if (96..=100).contains(&roll) {
        CheckOutcome::CriticalFailure
    } else {
        CheckOutcome::Failure
    }
}

/// A rolled percentile check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The d100 roll (1-100).
    pub roll: u32,
    /// The target rolled against.
    pub target: u32,
    /// The classified outcome.
    pub outcome: CheckOutcome,
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D100={}/{}: {}", self.roll, self.target, self.outcome)
    }
}

/// Roll a d100 against `target`.
///
/// The caller guarantees `1 <= target <= 100`; the target is not re-validated.
pub fn check<R: Rng + ?Sized>(target: u32, rng: &mut R) -> CheckResult {
    let roll: u32 = rng.random_range(1..=100);
    CheckResult {
        roll,
        target,
        outcome: classify(roll, target),
    }
}

/// A growth (improvement) check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthResult {
    /// The underlying percentile check.
    pub check: CheckResult,
    /// Points gained (1-10), or `None` when the check succeeded.
    pub gain: Option<u32>,
}

/// Roll a growth check: the attribute improves only when the check fails.
pub fn growth<R: Rng + ?Sized>(target: u32, rng: &mut R) -> GrowthResult {
    let check = check(target, rng);
    let gain = if check.outcome.is_success() {
        None
    } else {
        Some(rng.random_range(1..=10))
    };
    GrowthResult { check, gain }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn classify_target_fifty() {
        assert_eq!(classify(3, 50), CheckOutcome::CriticalSuccess);
        assert_eq!(classify(10, 50), CheckOutcome::ExtremeSuccess);
        assert_eq!(classify(25, 50), CheckOutcome::HardSuccess);
        assert_eq!(classify(50, 50), CheckOutcome::Success);
        assert_eq!(classify(51, 50), CheckOutcome::Failure);
        assert_eq!(classify(97, 50), CheckOutcome::CriticalFailure);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(classify(6, 50), CheckOutcome::ExtremeSuccess);
        assert_eq!(classify(11, 50), CheckOutcome::HardSuccess);
        assert_eq!(classify(26, 50), CheckOutcome::Success);
        assert_eq!(classify(95, 50), CheckOutcome::Failure);
        assert_eq!(classify(96, 50), CheckOutcome::CriticalFailure);
        assert_eq!(classify(100, 50), CheckOutcome::CriticalFailure);
    }

    #[test]
    fn critical_takes_precedence_over_extreme() {
        // 1..=5 would also be extreme/hard for large targets
        for roll in 1..=5 {
            assert_eq!(classify(roll, 90), CheckOutcome::CriticalSuccess);
        }
    }

    #[test]
    fn small_target_crit_needs_roll_under_target() {
        assert_eq!(classify(2, 3), CheckOutcome::CriticalSuccess);
        assert_eq!(classify(4, 3), CheckOutcome::Failure);
    }

    #[test]
    fn high_target_roll_in_fumble_band_succeeds() {
        assert_eq!(classify(97, 99), CheckOutcome::Success);
        assert_eq!(classify(100, 99), CheckOutcome::CriticalFailure);
        assert_eq!(classify(100, 100), CheckOutcome::Success);
    }

    #[test]
    fn outcome_ordering() {
        let all = CheckOutcome::all();
        for pair in all.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(all.iter().filter(|o| o.is_success()).count(), 4);
    }

    #[test]
    fn outcome_names() {
        assert_eq!(CheckOutcome::HardSuccess.as_str(), "hard_success");
        assert_eq!(
            CheckOutcome::CriticalFailure.to_string(),
            "Critical Failure"
        );
    }

    #[test]
    fn check_deterministic() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        assert_eq!(check(60, &mut rng1), check(60, &mut rng2));
    }

    #[test]
    fn check_always_valid() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..1000 {
            let r = check(45, &mut rng);
            assert!((1..=100).contains(&r.roll));
            assert_eq!(r.outcome, classify(r.roll, 45));
        }
    }

    #[test]
    fn growth_only_on_failure() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            let g = growth(50, &mut rng);
            match g.gain {
                Some(gain) => {
                    assert!(!g.check.outcome.is_success());
                    assert!((1..=10).contains(&gain));
                }
                None => assert!(g.check.outcome.is_success()),
            }
        }
    }

    #[test]
    fn check_result_display() {
        let r = CheckResult {
            roll: 12,
            target: 60,
            outcome: CheckOutcome::ExtremeSuccess,
        };
        assert_eq!(r.to_string(), "D100=12/60: Extreme Success");
    }
}

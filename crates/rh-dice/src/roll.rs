//! Quick single-term rolls (`d6 3`, `d20`, `dice 2d6`) and roll previews.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DiceResult;
use crate::expr::DiceTerm;

/// How many values a preview shows before truncating.
pub const DEFAULT_PREVIEW_LIMIT: usize = 50;

/// The result of a quick roll of one dice term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    /// Number of dice rolled.
    pub count: i64,
    /// Number of sides per die.
    pub sides: i64,
    /// Individual die values.
    pub rolls: Vec<i64>,
}

impl DiceRoll {
    /// Sum of all die values.
    pub fn total(&self) -> i64 {
        self.rolls.iter().sum()
    }

    /// The highest single die value, or 0 if empty.
    pub fn highest(&self) -> i64 {
        self.rolls.iter().copied().max().unwrap_or(0)
    }

    /// The lowest single die value, or 0 if empty.
    pub fn lowest(&self) -> i64 {
        self.rolls.iter().copied().min().unwrap_or(0)
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d{} -> {} = {}",
            self.count,
            self.sides,
            preview(&self.rolls, DEFAULT_PREVIEW_LIMIT, "rolls"),
            self.total()
        )
    }
}

/// Roll `count` dice with `sides` sides.
///
/// A count of zero or below is treated as one die, so `d6 0` rolls a single d6.
pub fn quick_roll<R: Rng + ?Sized>(count: i64, sides: i64, rng: &mut R) -> DiceResult<DiceRoll> {
    let count = if count > 0 { count } else { 1 };
    DiceTerm::new(count, sides).validate()?;
    let rolls = (0..count).map(|_| rng.random_range(1..=sides)).collect();
    Ok(DiceRoll {
        count,
        sides,
        rolls,
    })
}

/// Render values as `[a, b, c]`, truncated to `limit` entries.
///
/// Truncated output ends in `...` and carries a
/// `(showing first {limit} of {n} {noun})` suffix.
pub fn preview<T: fmt::Display>(values: &[T], limit: usize, noun: &str) -> String {
    let shown: Vec<String> = values.iter().take(limit).map(ToString::to_string).collect();
    if values.len() <= limit {
        format!("[{}]", shown.join(", "))
    } else {
        format!(
            "[{}, ...] (showing first {limit} of {} {noun})",
            shown.join(", "),
            values.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiceError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn quick_roll_produces_valid_values() {
        let mut rng = StdRng::seed_from_u64(42);
        let roll = quick_roll(10, 6, &mut rng).unwrap();
        assert_eq!(roll.rolls.len(), 10);
        assert!(roll.rolls.iter().all(|v| (1..=6).contains(v)));
        assert_eq!(roll.total(), roll.rolls.iter().sum::<i64>());
    }

    #[test]
    fn zero_count_rolls_one_die() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(quick_roll(0, 20, &mut rng).unwrap().count, 1);
        assert_eq!(quick_roll(-4, 20, &mut rng).unwrap().count, 1);
    }

    #[test]
    fn quick_roll_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(
            quick_roll(101, 6, &mut rng),
            Err(DiceError::OutOfRange {
                count: 101,
                sides: 6
            })
        );
        assert!(quick_roll(1, 1, &mut rng).is_err());
    }

    #[test]
    fn highest_and_lowest() {
        let roll = DiceRoll {
            count: 3,
            sides: 6,
            rolls: vec![3, 6, 1],
        };
        assert_eq!(roll.highest(), 6);
        assert_eq!(roll.lowest(), 1);
        assert_eq!(roll.to_string(), "3d6 -> [3, 6, 1] = 10");
    }

    #[test]
    fn preview_short_list() {
        assert_eq!(preview(&[1, 2, 3], 50, "rolls"), "[1, 2, 3]");
    }

    #[test]
    fn preview_truncates() {
        let values: Vec<i64> = (1..=60).collect();
        let text = preview(&values, 50, "rolls");
        assert!(text.starts_with("[1, 2, 3"));
        assert!(text.contains("50, ...]"));
        assert!(text.ends_with("(showing first 50 of 60 rolls)"));
        assert!(!text.contains("51"));
    }
}

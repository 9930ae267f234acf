//! Random list pickers: choice, shuffle and coin flips.

use std::fmt;

use rand::Rng;
use rand::seq::{SliceRandom, index};
use serde::{Deserialize, Serialize};

use crate::error::{PickError, PickResult};

/// Largest number of picks, list items or coins accepted by a single call.
pub const MAX_ITEMS: usize = 1000;

/// Characters that separate items in a list argument.
const SEPARATORS: [char; 5] = [',', ';', '|', '，', '、'];

/// Split a raw list argument into trimmed, non-empty items.
///
/// Runs of separators count as one; newlines are not separators.
pub fn split_items(raw: &str) -> Vec<String> {
    raw.split(SEPARATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pick `num` distinct items, in random order.
pub fn choose<T: Clone, R: Rng + ?Sized>(items: &[T], num: i64, rng: &mut R) -> PickResult<Vec<T>> {
    if items.is_empty() {
        return Err(PickError::NoItems);
    }
    let num = check_range("num", num)?;
    if num > items.len() {
        return Err(PickError::TooManyPicks {
            num,
            available: items.len(),
        });
    }
    Ok(index::sample(rng, items.len(), num)
        .into_iter()
        .map(|i| items[i].clone())
        .collect())
}

/// Return the items in a random order.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> PickResult<Vec<T>> {
    if items.is_empty() {
        return Err(PickError::NoItems);
    }
    if items.len() > MAX_ITEMS {
        return Err(PickError::TooManyItems {
            count: items.len(),
            max: MAX_ITEMS,
        });
    }
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    Ok(shuffled)
}

/// One side of a coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Coin {
    /// Heads.
    Heads,
    /// Tails.
    Tails,
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heads => write!(f, "H"),
            Self::Tails => write!(f, "T"),
        }
    }
}

/// The result of flipping several coins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipResult {
    /// Each flip in order.
    pub flips: Vec<Coin>,
}

impl FlipResult {
    /// Number of heads.
    pub fn heads(&self) -> usize {
        self.flips.iter().filter(|c| **c == Coin::Heads).count()
    }

    /// Number of tails.
    pub fn tails(&self) -> usize {
        self.flips.len() - self.heads()
    }
}

/// Flip `coins` fair coins.
pub fn flip<R: Rng + ?Sized>(coins: i64, rng: &mut R) -> PickResult<FlipResult> {
    let coins = check_range("coins", coins)?;
    let flips = (0..coins)
        .map(|_| {
            if rng.random_bool(0.5) {
                Coin::Heads
            } else {
                Coin::Tails
            }
        })
        .collect();
    Ok(FlipResult { flips })
}

fn check_range(what: &'static str, value: i64) -> PickResult<usize> {
    let max = MAX_ITEMS as i64;
    if (1..=max).contains(&value) {
        Ok(value as usize)
    } else {
        Err(PickError::PickOutOfRange {
            what,
            value,
            min: 1,
            max,
        })
    }
}

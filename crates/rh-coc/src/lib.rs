//! Percentile rules for RngHelper.
//!
//! Provides the six-tier percentile check, growth and sanity checks built on
//! top of it, the temporary insanity table, and the characteristic generator.

pub mod check;
pub mod error;
pub mod generate;
pub mod insanity;
pub mod sanity;

pub use check::{CheckOutcome, CheckResult, GrowthResult, check, classify, growth};
pub use error::{CocError, CocResult};
pub use generate::{CHARACTERISTICS, Character, DerivedStats, MAX_CANDIDATES, generate, generate_many};
pub use insanity::{BoutOfMadness, InsanityBout, TEMPORARY_INSANITY, roll_bout};
pub use sanity::{SanityResult, sanity_check};

//! Characteristic generation for new investigators.
//!
//! Every characteristic is rolled from its own formula with independent
//! draws. Derived statistics (HP, MP, starting SAN, MOV) follow from the
//! rolled values.

use rand::Rng;
use rh_dice::evaluate;
use serde::Serialize;

use crate::error::{CocError, CocResult};

/// Characteristic keys and their formulas, in display order.
pub const CHARACTERISTICS: [(&str, &str); 9] = [
    ("STR", "3d6*5"),
    ("CON", "3d6*5"),
    ("DEX", "3d6*5"),
    ("APP", "3d6*5"),
    ("POW", "3d6*5"),
    ("SIZ", "(2d6+6)*5"),
    ("INT", "(2d6+6)*5"),
    ("EDU", "(2d6+6)*5"),
    ("LUCK", "3d6*5"),
];

/// Largest number of candidates rolled by [`generate_many`].
pub const MAX_CANDIDATES: usize = 10;

/// Characteristics per row in [`Character::render_block`].
const BLOCK_COLUMNS: usize = 3;

/// A freshly rolled set of characteristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Character {
    values: Vec<(&'static str, i64)>,
}

impl Character {
    /// Characteristics in canonical order.
    pub fn values(&self) -> &[(&'static str, i64)] {
        &self.values
    }

    /// Look up a characteristic by key (case-insensitive).
    pub fn get(&self, key: &str) -> Option<i64> {
        self.values
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| *v)
    }

    /// Sum of every characteristic except LUCK.
    pub fn total_without_luck(&self) -> i64 {
        self.values
            .iter()
            .filter(|(k, _)| *k != "LUCK")
            .map(|(_, v)| v)
            .sum()
    }

    /// Sum of every characteristic including LUCK.
    pub fn total_with_luck(&self) -> i64 {
        self.values.iter().map(|(_, v)| v).sum()
    }

    /// Statistics derived from the characteristics.
    pub fn derived(&self) -> DerivedStats {
        DerivedStats::from_character(self)
    }

    /// Render a fixed-width block with derived statistics and both totals.
    pub fn render_block(&self) -> String {
        let mut lines: Vec<String> = self
            .values
            .chunks(BLOCK_COLUMNS)
            .map(|row| {
                row.iter()
                    .map(|(k, v)| format!("{:<5}{v:>3}", format!("{k}:")))
                    .collect::<Vec<_>>()
                    .join("  ")
            })
            .collect();
        lines.push(self.derived().to_string());
        lines.push(format!("Total (excl. LUCK): {}", self.total_without_luck()));
        lines.push(format!("Total (incl. LUCK): {}", self.total_with_luck()));
        lines.join("\n")
    }
}

/// Statistics derived from a character's characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedStats {
    /// Hit points: (CON + SIZ) / 10.
    pub hp: i64,
    /// Magic points: POW / 5.
    pub mp: i64,
    /// Starting sanity: POW.
    pub san: i64,
    /// Movement rate (7, 8 or 9).
    pub mov: i64,
}

impl DerivedStats {
    /// Compute derived statistics.
    pub fn from_character(character: &Character) -> Self {
        let get = |key| character.get(key).unwrap_or(0);
        let (str_val, con, dex, siz, pow) =
            (get("STR"), get("CON"), get("DEX"), get("SIZ"), get("POW"));
        Self {
            hp: (con + siz) / 10,
            mp: pow / 5,
            san: pow,
            mov: move_rate(str_val, dex, siz),
        }
    }

    /// Derived statistics as `(key, value)` pairs in display order.
    pub fn pairs(&self) -> [(&'static str, i64); 4] {
        [
            ("HP", self.hp),
            ("MP", self.mp),
            ("SAN", self.san),
            ("MOV", self.mov),
        ]
    }
}

impl std::fmt::Display for DerivedStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .pairs()
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect();
        write!(f, "{}", parts.join("  "))
    }
}

fn move_rate(str_val: i64, dex: i64, siz: i64) -> i64 {
    if str_val < siz && dex < siz {
        7
    } else if str_val > siz && dex > siz {
        9
    } else {
        8
    }
}

/// Roll a full set of characteristics.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> CocResult<Character> {
    let values = CHARACTERISTICS
        .iter()
        .map(|(key, formula)| Ok((*key, evaluate(formula, rng)?.total)))
        .collect::<CocResult<Vec<_>>>()?;
    Ok(Character { values })
}

/// Roll `count` independent candidates (1 to [`MAX_CANDIDATES`]).
pub fn generate_many<R: Rng + ?Sized>(count: usize, rng: &mut R) -> CocResult<Vec<Character>> {
    if !(1..=MAX_CANDIDATES).contains(&count) {
        return Err(CocError::InvalidCount {
            count,
            max: MAX_CANDIDATES,
        });
    }
    (0..count).map(|_| generate(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fixed(values: [i64; 9]) -> Character {
        Character {
            values: CHARACTERISTICS
                .iter()
                .zip(values)
                .map(|((k, _), v)| (*k, v))
                .collect(),
        }
    }

    #[test]
    fn keys_in_canonical_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let c = generate(&mut rng).unwrap();
        let keys: Vec<&str> = c.values().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec!["STR", "CON", "DEX", "APP", "POW", "SIZ", "INT", "EDU", "LUCK"]
        );
    }

    #[test]
    fn values_within_formula_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            let c = generate(&mut rng).unwrap();
            for (key, value) in c.values() {
                let range = if matches!(*key, "SIZ" | "INT" | "EDU") {
                    40..=90
                } else {
                    15..=90
                };
                assert!(range.contains(value), "{key}={value}");
                assert_eq!(value % 5, 0);
            }
        }
    }

    #[test]
    fn keys_rolled_independently() {
        let mut rng = StdRng::seed_from_u64(3);
        let distinct = (0..20).any(|_| {
            let c = generate(&mut rng).unwrap();
            let first = c.values()[0].1;
            c.values()[1..5].iter().any(|(_, v)| *v != first)
        });
        assert!(distinct);
    }

    #[test]
    fn totals() {
        let c = fixed([50, 60, 45, 70, 55, 65, 80, 75, 40]);
        assert_eq!(c.total_without_luck(), 500);
        assert_eq!(c.total_with_luck(), 540);
        assert_eq!(c.get("luck"), Some(40));
    }

    #[test]
    fn derived_stats() {
        let c = fixed([50, 60, 45, 70, 55, 65, 80, 75, 40]);
        let d = c.derived();
        assert_eq!(d.hp, 12);
        assert_eq!(d.mp, 11);
        assert_eq!(d.san, 55);
        assert_eq!(d.mov, 7);
    }

    #[test]
    fn move_rate_bands() {
        assert_eq!(move_rate(40, 40, 50), 7);
        assert_eq!(move_rate(60, 60, 50), 9);
        assert_eq!(move_rate(60, 40, 50), 8);
        assert_eq!(move_rate(50, 50, 50), 8);
    }

    #[test]
    fn render_block_layout() {
        let c = fixed([50, 60, 45, 70, 55, 65, 80, 75, 40]);
        let block = c.render_block();
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0], "STR:  50  CON:  60  DEX:  45");
        assert_eq!(lines[1], "APP:  70  POW:  55  SIZ:  65");
        assert_eq!(lines[2], "INT:  80  EDU:  75  LUCK: 40");
        assert_eq!(lines[3], "HP: 12  MP: 11  SAN: 55  MOV: 7");
        assert_eq!(lines[4], "Total (excl. LUCK): 500");
        assert_eq!(lines[5], "Total (incl. LUCK): 540");
    }

    #[test]
    fn generate_many_limits() {
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(generate_many(3, &mut rng).unwrap().len(), 3);
        assert_eq!(
            generate_many(0, &mut rng),
            Err(CocError::InvalidCount { count: 0, max: 10 })
        );
        assert!(generate_many(11, &mut rng).is_err());
    }
}

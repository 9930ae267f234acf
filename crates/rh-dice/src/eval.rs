//! Expression evaluation and roll traces.
//!
//! Evaluation is validate-then-roll: every dice term is bounds-checked
//! before the first random draw, so a rejected expression never consumes
//! randomness and never yields a partial trace.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{DiceError, DiceResult};
use crate::expr::{DiceTerm, Expr, Expression};

/// The rolled values of one dice term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRoll {
    /// The term that was rolled.
    pub term: DiceTerm,
    /// Individual die values, each in `1..=sides`.
    pub rolls: Vec<i64>,
}

impl TermRoll {
    /// Sum of the rolled values.
    pub fn total(&self) -> i64 {
        self.rolls.iter().sum()
    }
}

impl fmt::Display for TermRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.rolls.iter().map(|v| v.to_string()).collect();
        write!(f, "{}=[{}]", self.term, values.join(", "))
    }
}

/// Ordered record of every dice term rolled during one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollTrace {
    terms: Vec<TermRoll>,
}

impl RollTrace {
    /// The rolled terms in evaluation order.
    pub fn terms(&self) -> &[TermRoll] {
        &self.terms
    }

    /// Trace entries rendered as `"{count}d{sides}=[v1, v2, ...]"`.
    pub fn entries(&self) -> Vec<String> {
        self.terms.iter().map(ToString::to_string).collect()
    }

    /// Number of dice terms rolled.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if no dice were rolled (a pure arithmetic expression).
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn push(&mut self, roll: TermRoll) {
        self.terms.push(roll);
    }
}

impl fmt::Display for RollTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entries().join("; "))
    }
}

/// The result of evaluating a dice expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Final integer value.
    pub total: i64,
    /// Every dice term rolled, in evaluation order.
    pub trace: RollTrace,
}

impl Expression {
    /// Validate the expression, then roll it using the given random source.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> DiceResult<Evaluation> {
        self.validate()?;
        let mut trace = RollTrace::default();
        let total = eval_node(self.root(), rng, &mut trace)?;
        Ok(Evaluation { total, trace })
    }
}

fn eval_node<R: Rng + ?Sized>(node: &Expr, rng: &mut R, trace: &mut RollTrace) -> DiceResult<i64> {
    match node {
        Expr::Number(n) => Ok(*n),
        Expr::Dice(term) => {
            let rolls: Vec<i64> = (0..term.count)
                .map(|_| rng.random_range(1..=term.sides))
                .collect();
            let roll = TermRoll { term: *term, rolls };
            let total = roll.total();
            trace.push(roll);
            Ok(total)
        }
        Expr::Neg(inner) => {
            let value = eval_node(inner, rng, trace)?;
            value.checked_neg().ok_or(DiceError::Overflow)
        }
        Expr::Group(inner) => eval_node(inner, rng, trace),
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval_node(lhs, rng, trace)?;
            let rhs = eval_node(rhs, rng, trace)?;
            op.apply(lhs, rhs)
        }
    }
}

/// Parse and evaluate an expression in one step.
pub fn evaluate<R: Rng + ?Sized>(source: &str, rng: &mut R) -> DiceResult<Evaluation> {
    let expression = Expression::parse(source)?;
    let evaluation = expression.roll(rng)?;
    tracing::debug!(
        expr = %expression,
        total = evaluation.total,
        terms = evaluation.trace.len(),
        "evaluated dice expression"
    );
    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn arithmetic_only() {
        let mut rng = StdRng::seed_from_u64(1);
        let e = evaluate("2+3*4-(1-2)", &mut rng).unwrap();
        assert_eq!(e.total, 15);
        assert!(e.trace.is_empty());
    }

    #[test]
    fn unary_operators() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(evaluate("-3+5", &mut rng).unwrap().total, 2);
        assert_eq!(evaluate("--3", &mut rng).unwrap().total, 3);
        assert_eq!(evaluate("+4*-2", &mut rng).unwrap().total, -8);
    }

    #[test]
    fn single_term_trace() {
        let mut rng = StdRng::seed_from_u64(7);
        let e = evaluate("4d6", &mut rng).unwrap();
        assert_eq!(e.trace.len(), 1);
        let term = &e.trace.terms()[0];
        assert_eq!(term.term, DiceTerm::new(4, 6));
        assert_eq!(term.rolls.len(), 4);
        assert_eq!(term.total(), e.total);
        assert!(e.trace.entries()[0].starts_with("4d6=["));
    }

    #[test]
    fn trace_entry_format() {
        let roll = TermRoll {
            term: DiceTerm::new(3, 6),
            rolls: vec![2, 5, 6],
        };
        assert_eq!(roll.to_string(), "3d6=[2, 5, 6]");
    }

    #[test]
    fn trace_follows_evaluation_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let e = evaluate("(d4+2d8)*d6", &mut rng).unwrap();
        let terms: Vec<DiceTerm> = e.trace.terms().iter().map(|t| t.term).collect();
        assert_eq!(
            terms,
            vec![DiceTerm::new(1, 4), DiceTerm::new(2, 8), DiceTerm::new(1, 6)]
        );
    }

    #[test]
    fn characteristic_formula_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let total = evaluate("(2d6+6)*5", &mut rng).unwrap().total;
            assert!((40..=90).contains(&total), "{total}");
            let total = evaluate("3d6*5", &mut rng).unwrap().total;
            assert!((15..=90).contains(&total), "{total}");
        }
    }

    #[test]
    fn deterministic_with_seed() {
        let mut rng1 = StdRng::seed_from_u64(99);
        let mut rng2 = StdRng::seed_from_u64(99);
        let a = evaluate("3d6+2d10*2", &mut rng1).unwrap();
        let b = evaluate("3d6+2d10*2", &mut rng2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn out_of_range_rejects_whole_expression() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(
            evaluate("2d6+d0", &mut rng),
            Err(DiceError::OutOfRange { count: 1, sides: 0 })
        );
        assert_eq!(
            evaluate("d0*0", &mut rng),
            Err(DiceError::OutOfRange { count: 1, sides: 0 })
        );
        assert_eq!(
            evaluate("-2d6", &mut rng),
            Err(DiceError::OutOfRange { count: -2, sides: 6 })
        );
    }

    #[test]
    fn rejected_expression_draws_no_randomness() {
        let mut used = StdRng::seed_from_u64(21);
        let mut fresh = StdRng::seed_from_u64(21);
        assert!(evaluate("5d6+101d6", &mut used).is_err());
        let a = evaluate("5d6", &mut used).unwrap();
        let b = evaluate("5d6", &mut fresh).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn deeply_nested_input_is_an_error() {
        let mut rng = StdRng::seed_from_u64(4);
        let parens = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
        assert!(matches!(
            evaluate(&parens, &mut rng),
            Err(DiceError::TooDeep { .. })
        ));
        let signs = format!("{}d6", "-".repeat(200_000));
        assert!(matches!(
            evaluate(&signs, &mut rng),
            Err(DiceError::TooDeep { .. })
        ));
    }

    #[test]
    fn overflow_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            evaluate("9223372036854775807+1", &mut rng),
            Err(DiceError::Overflow)
        );
        assert_eq!(
            evaluate("3037000500*3037000500", &mut rng),
            Err(DiceError::Overflow)
        );
    }

    #[test]
    fn documented_error_cases() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            evaluate("2d", &mut rng),
            Err(DiceError::MalformedDiceTerm { .. })
        ));
        assert!(matches!(
            evaluate("(1+2", &mut rng),
            Err(DiceError::UnbalancedParentheses { .. })
        ));
        assert!(matches!(
            evaluate("1+2)", &mut rng),
            Err(DiceError::TrailingGarbage { .. })
        ));
    }

    proptest! {
        #[test]
        fn dice_total_is_sum_of_rolls(count in 1i64..=100, sides in 2i64..=1000, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let e = evaluate(&format!("{count}d{sides}"), &mut rng).unwrap();
            prop_assert_eq!(e.trace.len(), 1);
            let term = &e.trace.terms()[0];
            prop_assert_eq!(term.rolls.len() as i64, count);
            prop_assert!(term.rolls.iter().all(|v| (1..=sides).contains(v)));
            prop_assert_eq!(term.rolls.iter().sum::<i64>(), e.total);
            let entry = &e.trace.entries()[0];
            let inner = entry
                .split_once('[')
                .and_then(|(_, rest)| rest.strip_suffix(']'))
                .unwrap();
            prop_assert_eq!(inner.split(", ").count() as i64, count);
        }
    }
}

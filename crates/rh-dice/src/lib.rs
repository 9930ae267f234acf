//! Dice expression engine for RngHelper.
//!
//! Parses arithmetic expressions with dice terms (`3d6*5`, `(2d6+6)*5`,
//! `d100-10`), validates every dice term against the table limits, and
//! evaluates them against an injected random source. Also ships the quick
//! single-term rolls and the list pickers (choice, shuffle, coin flip).

pub mod error;
pub mod eval;
pub mod expr;
pub mod lexer;
pub mod pick;
pub mod roll;

pub use error::{DiceError, DiceResult, PickError, PickResult};
pub use eval::{Evaluation, RollTrace, TermRoll, evaluate};
pub use expr::{BinOp, DiceTerm, Expr, Expression, MAX_DEPTH};
pub use pick::{Coin, FlipResult, choose, flip, shuffle, split_items};
pub use roll::{DEFAULT_PREVIEW_LIMIT, DiceRoll, preview, quick_roll};

//! Request and response shapes exchanged with a messaging layer.
//!
//! All of them serialize with serde so a front end can log requests or ship
//! results as JSON.

use rh_dice::Evaluation;
use serde::{Deserialize, Serialize};

/// Evaluate a dice expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluateRequest {
    /// Expression text, e.g. `3d6*5`.
    pub expr: String,
}

/// The result of an [`EvaluateRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluateResult {
    /// The expression as submitted.
    pub expr: String,
    /// Final integer total.
    pub total: i64,
    /// One `NdM=[...]` entry per dice term, in evaluation order.
    pub trace: Vec<String>,
}

impl EvaluateResult {
    pub(crate) fn new(expr: &str, evaluation: &Evaluation) -> Self {
        Self {
            expr: expr.to_string(),
            total: evaluation.total,
            trace: evaluation.trace.entries(),
        }
    }
}

/// Roll a percentile check against a bare target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRequest {
    /// Target value; must be within 1..=100.
    pub target: i64,
}

/// Set integer attributes for a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSetRequest {
    /// Scope (channel) id.
    pub scope_id: u64,
    /// Subject (participant) id.
    pub subject_id: u64,
    /// `(label, value)` pairs to write.
    pub pairs: Vec<(String, i64)>,
}

/// Remove attributes from a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRemoveRequest {
    /// Scope (channel) id.
    pub scope_id: u64,
    /// Subject (participant) id.
    pub subject_id: u64,
    /// Labels to remove.
    pub labels: Vec<String>,
}

/// Generate a character and store it for a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateCharacterRequest {
    /// Scope (channel) id.
    pub scope_id: u64,
    /// Subject (participant) id.
    pub subject_id: u64,
}

/// The result of a [`GenerateCharacterRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCharacter {
    /// Characteristics followed by derived statistics, as written.
    pub attributes: Vec<(String, i64)>,
    /// Fixed-width rendering of the character.
    pub block: String,
}

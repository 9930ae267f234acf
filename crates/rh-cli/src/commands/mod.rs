pub mod check;
pub mod dice;
pub mod generate;
pub mod pick;
pub mod repl;
pub mod roll;

use colored::{ColoredString, Colorize};
use rh_coc::CheckOutcome;
use rh_table::{EvaluateResult, Table, TableConfig};

/// Build a table for a one-shot command.
fn table(seed: Option<u64>) -> Table {
    let config = match seed {
        Some(seed) => TableConfig::default().with_seed(seed),
        None => TableConfig::default(),
    };
    Table::new(config)
}

/// Render an outcome name in a color matching its tier.
fn paint(outcome: CheckOutcome) -> ColoredString {
    let text = outcome.to_string();
    match outcome {
        CheckOutcome::CriticalSuccess => text.green().bold(),
        CheckOutcome::ExtremeSuccess | CheckOutcome::HardSuccess => text.green(),
        CheckOutcome::Success => text.normal(),
        CheckOutcome::Failure => text.yellow(),
        CheckOutcome::CriticalFailure => text.red().bold(),
    }
}

/// `Roll: <expr> -> <trace> = <total>`, without the trace for dice-free input.
fn format_roll(result: &EvaluateResult) -> String {
    if result.trace.is_empty() {
        format!("Roll: {} = {}", result.expr, result.total)
    } else {
        format!(
            "Roll: {} -> {} = {}",
            result.expr,
            result.trace.join("; "),
            result.total
        )
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("failed to encode JSON: {e}"))
}

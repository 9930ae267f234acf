//! CLI frontend for the RngHelper dice and percentile rules engine.

mod commands;

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "RH_LOG";

#[derive(Parser)]
#[command(
    name = "rh",
    about = "RngHelper: dice expressions, percentile checks and character sheets",
    version,
    propagate_version = true
)]
struct Cli {
    /// RNG seed for reproducible rolls
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a dice expression such as `3d6*5` or `(2d6+6)*5`
    Roll {
        /// Dice expression
        expr: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Roll a number of identical dice
    Dice {
        /// Number of dice (0 rolls one)
        #[arg(allow_hyphen_values = true)]
        count: i64,

        /// Sides per die
        #[arg(short, long, default_value = "6")]
        sides: i64,
    },

    /// Roll a percentile check against a target value
    Check {
        /// Target value (1-100)
        #[arg(allow_hyphen_values = true)]
        target: i64,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Roll new investigator characteristics
    Generate {
        /// Number of candidates (1-10)
        #[arg(short, long, default_value = "1")]
        count: usize,
    },

    /// Pick items from a list separated by , ; | ， or 、
    Choice {
        /// The list of items
        items: String,

        /// How many distinct items to pick
        #[arg(short, long, default_value = "1", allow_hyphen_values = true)]
        num: i64,
    },

    /// Shuffle a list separated by , ; | ， or 、
    Shuffle {
        /// The list of items
        items: String,
    },

    /// Flip coins
    Flip {
        /// Number of coins (1-1000)
        #[arg(default_value = "1", allow_hyphen_values = true)]
        coins: i64,
    },

    /// Start an interactive session with attribute sheets and a moderator
    Repl {
        /// Scope (channel) id
        #[arg(long, default_value = "1")]
        scope: u64,

        /// Subject (participant) id to act as
        #[arg(long, default_value = "1")]
        subject: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let seed = cli.seed;
    tracing::debug!(?seed, "rh starting");
    let result = match cli.command {
        Commands::Roll { expr, json } => commands::roll::run(&expr, seed, json),
        Commands::Dice { count, sides } => commands::dice::run(count, sides, seed),
        Commands::Check { target, json } => commands::check::run(target, seed, json),
        Commands::Generate { count } => commands::generate::run(count, seed),
        Commands::Choice { items, num } => commands::pick::choice(&items, num, seed),
        Commands::Shuffle { items } => commands::pick::shuffle(&items, seed),
        Commands::Flip { coins } => commands::pick::flip(coins, seed),
        Commands::Repl { scope, subject } => commands::repl::run(scope, subject, seed),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

//! Hypothesis Checker Binary
//!
//! Generates string sets, runs random cyclic walks over each of them and
//! stops at the first counterexample to the collapse conjecture.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default: info for the checker, warn for the library)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin hypothesis_checker -- S --sets 1000 --seed 42
//! ```
//!
//! Without `--sets` the checker keeps generating sets until the conjecture
//! fails. A failure prints the counterexample as JSON and exits with status 1.

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use collapse_hypothesis::{
    CheckerConfig, GenerationMode, GeneratorConfig, HypothesisChecker, TrialOutcome, seeded_rng,
};

#[derive(Parser, Debug)]
#[command(
    name = "hypothesis_checker",
    about = "Search for counterexamples to the layered overlap-collapse conjecture",
    version
)]
struct Cli {
    /// Generation type: S (substrings of one superstring) or R (independent random strings)
    #[arg(value_parser = parse_mode)]
    mode: GenerationMode,

    /// Number of string sets to check (unbounded if omitted)
    #[arg(long)]
    sets: Option<u64>,

    /// Random cyclic orders tried per set
    #[arg(long, default_value_t = 5)]
    tries: usize,

    /// Seed for the whole run (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of distinct letters
    #[arg(long, default_value_t = 8)]
    alphabet_size: usize,

    /// Maximum number of strings per set
    #[arg(long, default_value_t = 10)]
    max_strings: usize,

    /// Maximum length of a generated string
    #[arg(long, default_value_t = 6)]
    max_length: usize,
}

fn parse_mode(s: &str) -> Result<GenerationMode, String> {
    GenerationMode::from_str(s).ok_or_else(|| format!("unknown generation type '{s}', expected S or R"))
}

/// Default `RUST_LOG` filter: progress from the binary, failures from the library.
const DEFAULT_LOG_FILTER: &str = "hypothesis_checker=info,collapse_hypothesis=warn";

/// Everything needed to replay a failure.
#[derive(Serialize)]
struct Counterexample<'a> {
    seed: u64,
    set_index: u64,
    strings: &'a [String],
    params_hash: String,
    outcome: &'a TrialOutcome,
}

/// Initialize the tracing subscriber with JSON or pretty format.
/// Logs go to stderr; stdout is reserved for the counterexample.
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let generator = GeneratorConfig {
        alphabet_size: cli.alphabet_size,
        max_strings: cli.max_strings,
        max_length: cli.max_length,
    };
    if let Err(e) = generator.validate() {
        error!(error = %e, "Invalid arguments");
        return ExitCode::from(2);
    }

    let config = CheckerConfig::default();
    let seed = cli.seed.unwrap_or_else(rand::random);
    let mut rng = seeded_rng(seed);

    info!(
        seed,
        mode = %cli.mode,
        tries = cli.tries,
        params_hash = %config.params_hash(),
        "Starting hypothesis checks"
    );

    let mut set_index = 0u64;
    while cli.sets.map_or(true, |n| set_index < n) {
        let strings = match generator.generate(&mut rng, cli.mode) {
            Ok(strings) => strings,
            Err(e) => {
                error!(error = %e, "Failed to generate string set");
                return ExitCode::from(2);
            }
        };
        info!(set = set_index, strings = ?strings, "Generated set");

        let summary = HypothesisChecker::new(&strings, config.clone())
            .and_then(|mut checker| checker.run_random_trials(&mut rng, cli.tries));
        let summary = match summary {
            Ok(summary) => summary,
            Err(e) => {
                error!(error = %e, set = set_index, "Trial setup failed");
                return ExitCode::from(2);
            }
        };

        if let Some(outcome) = &summary.failure {
            warn!(
                set = set_index,
                trial = summary.trials,
                layer = ?outcome.failed_layer,
                "Hypothesis failed"
            );
            let report = Counterexample {
                seed,
                set_index,
                strings: &strings,
                params_hash: config.params_hash(),
                outcome,
            };
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{json}"),
                Err(e) => error!(error = %e, "Failed to serialize counterexample"),
            }
            return ExitCode::FAILURE;
        }

        set_index += 1;
    }

    info!(sets = set_index, "All checks passed");
    ExitCode::SUCCESS
}

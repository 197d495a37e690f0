//! Lottery bet-code engine CLI
//!
//! # Usage
//!
//! ```bash
//! betcode parse --config config.json --draw-date 2024-01-05 code.txt > report.csv
//! betcode reconcile --config config.json --results results.csv bets.csv > outcomes.csv
//! betcode reconcile --config config.json --results results.csv --strategy sync bets.csv
//! betcode --log-level debug reconcile --config config.json --results results.csv \
//!     --batch-size 2000 --max-concurrent 8 bets.csv
//! ```
//!
//! `parse` prints the stake and prize report of a bet code; `reconcile`
//! prints one outcome per confirmed bet entry. CSV goes to stdout and logs
//! to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success (bet code errors are reported in the CSV, not fatal)
//! - 1: Error (unreadable config, input or results, output failure)

use lottery_betcode_engine::cli::{self, Command, ParseArgs, ReconcileArgs, StrategyType};
use lottery_betcode_engine::core::BetCodeEngine;
use lottery_betcode_engine::io::{load_config, load_results, write_report_csv};
use lottery_betcode_engine::strategy;
use std::process;
use std::sync::Arc;
use tracing::{info, warn};

fn run_parse(args: &ParseArgs) -> Result<(), String> {
    let catalog = load_config(&args.config).map_err(|e| e.to_string())?;
    let text = std::fs::read_to_string(&args.input_file).map_err(|e| {
        format!(
            "Failed to read bet code '{}': {}",
            args.input_file.display(),
            e
        )
    })?;

    let engine = BetCodeEngine::new(&catalog, args.draw_date);
    let report = engine.evaluate(&text);

    for issue in &report.code.errors {
        if issue.error.is_informational() {
            info!(line = issue.line, "{}", issue.error);
        } else {
            warn!(line = issue.line, "{}", issue.error);
        }
    }
    info!(
        success = report.code.success,
        total_stake = %report.stake.total_stake.normalize(),
        total_potential = %report.prize.total_potential.normalize(),
        "bet code evaluated"
    );

    let mut output = std::io::stdout();
    write_report_csv(&report, &mut output)
}

fn run_reconcile(args: &ReconcileArgs) -> Result<(), String> {
    let catalog = Arc::new(load_config(&args.config).map_err(|e| e.to_string())?);
    let results = Arc::new(load_results(&args.results)?);
    info!(results = results.len(), "draw results loaded");

    let strategy = {
        let config = if matches!(args.strategy, StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), config)
    };

    let mut output = std::io::stdout();
    strategy.process(&args.input_file, catalog, results, &mut output)
}

fn main() {
    let args = cli::parse_args();
    cli::init_logging(&args.log_level);

    let result = match &args.command {
        Command::Parse(parse) => run_parse(parse),
        Command::Reconcile(reconcile) => run_reconcile(reconcile),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

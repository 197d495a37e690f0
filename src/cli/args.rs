use crate::strategy::BatchConfig;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Parse lottery bet codes and reconcile confirmed bets against draw results
#[derive(Parser, Debug)]
#[command(name = "betcode")]
#[command(
    about = "Parse lottery bet codes and reconcile bets against draw results",
    long_about = None
)]
pub struct CliArgs {
    /// Log filter used when RUST_LOG is not set
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        global = true,
        default_value = "warn",
        help = "Log level or filter directive (overridden by RUST_LOG)"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a bet code file and print its stake and prize report
    Parse(ParseArgs),

    /// Reconcile confirmed bet entries against draw results
    Reconcile(ReconcileArgs),
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Configuration snapshot JSON
    #[arg(long = "config", value_name = "FILE", help = "Path to the configuration snapshot JSON")]
    pub config: PathBuf,

    /// Draw date used to break ties between stations sharing an alias
    #[arg(
        long = "draw-date",
        value_name = "DATE",
        help = "Draw date (YYYY-MM-DD) for day-dependent station aliases"
    )]
    pub draw_date: Option<NaiveDate>,

    /// Bet code text file
    #[arg(value_name = "INPUT", help = "Path to the bet code text file")]
    pub input_file: PathBuf,
}

#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Configuration snapshot JSON
    #[arg(long = "config", value_name = "FILE", help = "Path to the configuration snapshot JSON")]
    pub config: PathBuf,

    /// Draw results CSV
    #[arg(long = "results", value_name = "FILE", help = "Path to the draw results CSV file")]
    pub results: PathBuf,

    /// Processing strategy to use for reconciliation
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Number of bet entries per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of bet entries per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of concurrent tasks (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of tasks processing a batch (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Bet entries CSV
    #[arg(value_name = "INPUT", help = "Path to the bet entries CSV file")]
    pub input_file: PathBuf,
}

/// Available processing strategies for reconciliation
#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl ReconcileArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values take the defaults; zero values fall back to the
    /// defaults with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_none() && self.max_concurrent_batches.is_none() {
            return BatchConfig::default();
        }
        let default = BatchConfig::default();
        BatchConfig::new(
            self.batch_size.unwrap_or(default.batch_size),
            self.max_concurrent_batches
                .unwrap_or(default.max_concurrent_batches),
        )
    }
}

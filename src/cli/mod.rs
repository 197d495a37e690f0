// CLI module
// Command-line interface, argument parsing and log setup

mod args;

pub use args::{CliArgs, Command, ParseArgs, ReconcileArgs, StrategyType};

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help`, clap prints the message and exits.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Initialize the tracing subscriber
///
/// `RUST_LOG` wins over `level`. Logs go to stderr so stdout stays CSV.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

//! Lottery Bet-Code Engine Library
//! # Overview
//!
//! This library turns free-form lottery bet codes into validated bets,
//! computes the stake owed and the potential payout, and reconciles
//! confirmed bets against draw results with either a sync or an async
//! strategy.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (configuration snapshot, bet lines, draw results, errors)
//! - [`cli`] - CLI arguments parsing and log setup
//! - [`core`] - Business logic components:
//!   - [`core::normalizer`] - Raw text to canonical text
//!   - [`core::station_resolver`] - Station selector lines
//!   - [`core::line_parser`] - Bet lines, validated by [`core::validator`]
//!   - [`core::stake`] and [`core::prize`] - Stake and potential prize
//!   - [`core::matcher`] and [`core::reconciler`] - Matching against draw results
//!   - [`core::engine`] - Facade over the whole chain
//! - [`io`] - Configuration loading, CSV readers and writers
//! - [`strategy`] - Pluggable batch reconciliation strategies
//!
//! # Bet Code Shape
//!
//! The first line selects stations (`mb`, `2dmn`, `vl.ct`); every further
//! line holds numbers followed by one or more `<bet type><amount>` suffixes,
//! amounts in thousands:
//!
//! ```text
//! vl.ct
//! 25.36b10
//! 10/20keo90dd5
//! ```
//!
//! # Example
//!
//! ```no_run
//! use lottery_betcode_engine::core::BetCodeEngine;
//! use lottery_betcode_engine::io::load_config;
//! use std::path::Path;
//!
//! let catalog = load_config(Path::new("config.json")).unwrap();
//! let engine = BetCodeEngine::new(&catalog, None);
//! let report = engine.evaluate("mb\n25.36dd10");
//! println!("stake {}", report.stake.total_stake);
//! ```

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{BetCodeEngine, BetCodeReport, Catalog, ResultIndex};
pub use io::{load_config, load_results, write_outcomes_csv, write_report_csv};
pub use types::{
    BetCodeError, BetEntry, ConfigError, LotteryResult, ParsedBetCode, ParsedStation,
    PrizeTier, ReconciliationOutcome,
};

//! I/O module
//!
//! Handles configuration loading, CSV parsing and output.
//!
//! # Components
//!
//! - `config_loader` - JSON configuration snapshot loading
//! - `csv_format` - CSV format handling (record conversion, output serialization)
//! - `sync_reader` - Synchronous bet entry reader with iterator interface, results loader
//! - `async_reader` - Asynchronous bet entry reader with batch reading interface

pub mod async_reader;
pub mod config_loader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use config_loader::{load_config, parse_config};
pub use csv_format::{
    convert_bet_record, convert_result_record, write_outcomes_csv, write_report_csv,
    BetEntryRecord, ResultRecord, ResultRow,
};
pub use sync_reader::{load_results, SyncReader};

//! Synchronous CSV readers
//!
//! Provides a streaming iterator over bet entries and a loader for draw
//! results. Delegates CSV format concerns to the csv_format module.
//!
//! # Design
//!
//! The [`SyncReader`] uses `csv::Reader` to read and deserialize bet entry
//! rows one at a time, delegating conversion (including station resolution)
//! to the csv_format module. It keeps streaming behavior: memory use is per
//! record, not per file.
//!
//! Draw results are small and needed in full for lookups, so
//! [`load_results`] reads the whole file into a [`ResultIndex`].
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()` and `load_results()`
//! - Individual record errors are yielded as `Err` items (entries) or logged and skipped (results)
//! - Line numbers are included in error messages for debugging

use crate::core::catalog::Catalog;
use crate::core::result_store::ResultIndex;
use crate::io::csv_format::{convert_bet_record, convert_result_record, BetEntryRecord, ResultRecord};
use crate::types::BetEntry;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

fn open(path: &Path) -> Result<csv::Reader<File>, String> {
    let file = File::open(path)
        .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;
    Ok(ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .buffer_capacity(8 * 1024)
        .from_reader(file))
}

/// Synchronous bet entry reader
///
/// Provides an iterator interface over bet entries. Station selectors are
/// resolved against the catalog as rows are read.
///
/// # Examples
///
/// ```no_run
/// use lottery_betcode_engine::io::config_loader::load_config;
/// use lottery_betcode_engine::io::sync_reader::SyncReader;
/// use std::path::Path;
///
/// let catalog = load_config(Path::new("config.json")).unwrap();
/// let reader = SyncReader::new(Path::new("bets.csv"), &catalog).unwrap();
/// let entries: Vec<_> = reader.filter_map(Result::ok).collect();
/// println!("Read {} entries", entries.len());
/// ```
pub struct SyncReader<'c> {
    reader: csv::Reader<File>,
    catalog: &'c Catalog,
    line_num: usize,
}

impl<'c> SyncReader<'c> {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader trims whitespace from all fields, allows flexible field
    /// counts, and uses an 8KB buffer.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the bet entries CSV file
    /// * `catalog` - Configuration used to resolve station selectors
    ///
    /// # Returns
    ///
    /// * `Ok(SyncReader)` if file opened successfully
    /// * `Err(String)` if file could not be opened
    pub fn new(path: &Path, catalog: &'c Catalog) -> Result<Self, String> {
        Ok(Self {
            reader: open(path)?,
            catalog,
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader<'_> {
    type Item = Result<BetEntry, String>;

    /// Get the next bet entry from the CSV file
    ///
    /// Line numbers in errors count the header as line 1.
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<BetEntryRecord>();

        let item = deserializer.next()?;
        self.line_num += 1;
        Some(match item {
            Ok(record) => convert_bet_record(record, self.catalog)
                .map_err(|e| format!("Line {}: {}", self.line_num + 1, e)),
            Err(e) => Err(format!(
                "Line {}: CSV parse error: {}",
                self.line_num + 1,
                e
            )),
        })
    }
}

/// Read a draw results CSV file into an index
///
/// Rows that fail to parse are logged and skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub fn load_results(path: &Path) -> Result<ResultIndex, String> {
    let mut reader = open(path)?;
    let mut index = ResultIndex::new();

    for (row, record) in reader.deserialize::<ResultRecord>().enumerate() {
        let line = row + 2;
        match record
            .map_err(|e| format!("CSV parse error: {}", e))
            .and_then(convert_result_record)
        {
            Ok(result) => {
                index.add_numbers(result.station_id, result.draw_date, result.tier, result.numbers)
            }
            Err(e) => warn!(line, error = %e, "result row skipped"),
        }
    }

    debug!(path = %path.display(), results = index.len(), "results loaded");
    Ok(index)
}

//! Asynchronous batch reconciliation strategy
//!
//! This module provides a multi-threaded implementation of the
//! ReconcileStrategy trait. Bet entries are read in batches and every batch
//! is split across tokio tasks.
//!
//! # Architecture
//!
//! ```text
//! AsyncReconcileStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (chunking + tokio tasks)
//!     │   ├── Arc<Catalog> (read-only)
//!     │   └── Arc<ResultIndex> (read-only)
//!     └── AsyncOutcomeStore (DashMap, sorted on output)
//! ```
//!
//! Entries are independent, so no ordering is kept during processing; the
//! outcome store restores entry-id order before writing.

use crate::core::catalog::Catalog;
use crate::core::r#async::{AsyncOutcomeStore, BatchProcessor};
use crate::core::result_store::ResultIndex;
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_outcomes_csv;
use crate::strategy::ReconcileStrategy;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Configuration for batch processing
///
/// Controls how entries are batched and how many tasks share a batch.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of entries per batch
    pub batch_size: usize,
    /// Maximum number of tasks processing one batch, also the worker thread count
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid max_concurrent_batches, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch reconciliation strategy
///
/// # Configuration
///
/// - `batch_size`: Number of entries per batch (default: 1000)
/// - `max_concurrent_batches`: Worker threads and tasks per batch (default: CPU cores)
#[derive(Debug, Clone)]
pub struct AsyncReconcileStrategy {
    config: BatchConfig,
}

impl AsyncReconcileStrategy {
    /// Create a new AsyncReconcileStrategy with the specified configuration
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ReconcileStrategy for AsyncReconcileStrategy {
    /// Reconcile bet entries in parallel batches
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Reads entries in batches with `AsyncReader`
    /// 3. Splits each batch across tasks with `BatchProcessor`
    /// 4. Writes the collected outcomes sorted by entry id
    fn process(
        &self,
        input_path: &Path,
        catalog: Arc<Catalog>,
        results: Arc<ResultIndex>,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        let outcomes = runtime.block_on(async {
            let outcomes = Arc::new(AsyncOutcomeStore::new());
            let processor =
                BatchProcessor::new(Arc::clone(&catalog), results, Arc::clone(&outcomes));

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            loop {
                let batch = reader.read_batch(self.config.batch_size, &catalog).await;
                if batch.is_empty() {
                    break;
                }
                debug!(entries = batch.len(), "batch read");
                processor
                    .process_batch(batch, self.config.max_concurrent_batches)
                    .await;
            }

            Ok::<_, String>(outcomes.sorted())
        })?;

        debug!(outcomes = outcomes.len(), "async reconciliation finished");
        write_outcomes_csv(&outcomes, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::fixtures::catalog;
    use crate::strategy::SyncReconcileStrategy;
    use crate::types::{LotteryResult, PrizeTier};
    use chrono::NaiveDate;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn results() -> Arc<ResultIndex> {
        let friday = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        Arc::new(
            [
                LotteryResult::new(2, friday)
                    .with_tier(PrizeTier::Special, &["654325"])
                    .with_tier(PrizeTier::Eighth, &["25"]),
                LotteryResult::new(3, friday).with_tier(PrizeTier::Eighth, &["36"]),
            ]
            .into_iter()
            .collect(),
        )
    }

    fn bets_csv(count: u64) -> String {
        let mut csv = String::from("id,draw_date,station,numbers,bet_type,amount\n");
        for id in (1..=count).rev() {
            let (station, numbers, bet_type) = match id % 4 {
                0 => ("vl", "25.36", "dd"),
                1 => ("vl.ct", "25.36", "da"),
                2 => ("2dmn", "36", "b"),
                _ => ("ct", "99", "dd"),
            };
            csv.push_str(&format!(
                "{},2024-01-05,{},{},{},1\n",
                id, station, numbers, bet_type
            ));
        }
        csv
    }

    #[test]
    fn test_batch_config_zero_values_fall_back() {
        let config = BatchConfig::new(0, 0);
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.max_concurrent_batches, num_cpus::get());
    }

    #[test]
    fn test_batch_config_custom_values() {
        let config = BatchConfig::new(50, 3);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.max_concurrent_batches, 3);
    }

    #[rstest]
    #[case::single_batch(100, 4)]
    #[case::many_small_batches(3, 2)]
    #[case::one_by_one(1, 1)]
    fn test_async_output_matches_sync(#[case] batch_size: usize, #[case] concurrent: usize) {
        let file = create_temp_csv(&bets_csv(40));

        let mut sync_output = Vec::new();
        SyncReconcileStrategy
            .process(file.path(), Arc::new(catalog()), results(), &mut sync_output)
            .unwrap();

        let mut async_output = Vec::new();
        AsyncReconcileStrategy::new(BatchConfig::new(batch_size, concurrent))
            .process(file.path(), Arc::new(catalog()), results(), &mut async_output)
            .unwrap();

        assert_eq!(
            String::from_utf8(async_output).unwrap(),
            String::from_utf8(sync_output).unwrap()
        );
    }

    #[test]
    fn test_async_strategy_sorted_by_entry_id() {
        let file = create_temp_csv(&bets_csv(10));
        let mut output = Vec::new();
        AsyncReconcileStrategy::new(BatchConfig::new(2, 2))
            .process(file.path(), Arc::new(catalog()), results(), &mut output)
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        let ids: Vec<u64> = text
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap().parse().unwrap())
            .collect();
        assert_eq!(ids, (1..=10).collect::<Vec<u64>>());
    }

    #[test]
    fn test_async_strategy_missing_file() {
        let mut output = Vec::new();
        let result = AsyncReconcileStrategy::new(BatchConfig::default()).process(
            Path::new("nonexistent.csv"),
            Arc::new(catalog()),
            results(),
            &mut output,
        );
        assert!(result.unwrap_err().contains("Failed to open file"));
    }
}

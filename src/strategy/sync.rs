//! Synchronous reconciliation strategy
//!
//! This module provides a single-threaded implementation of the
//! ReconcileStrategy trait. It streams bet entries with the `SyncReader` and
//! reconciles them one at a time.
//!
//! # Design
//!
//! The SyncReconcileStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Matching to `reconciler::reconcile_entry`
//! - CSV output to `csv_format::write_outcomes_csv`

use crate::core::catalog::Catalog;
use crate::core::reconciler::reconcile_entry;
use crate::core::result_store::ResultIndex;
use crate::io::csv_format::write_outcomes_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ReconcileStrategy;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Synchronous reconciliation strategy
///
/// # Examples
///
/// ```no_run
/// use lottery_betcode_engine::io::{load_config, load_results};
/// use lottery_betcode_engine::strategy::{ReconcileStrategy, SyncReconcileStrategy};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// let catalog = Arc::new(load_config(Path::new("config.json")).unwrap());
/// let results = Arc::new(load_results(Path::new("results.csv")).unwrap());
/// let mut output = std::io::stdout();
///
/// SyncReconcileStrategy
///     .process(Path::new("bets.csv"), catalog, results, &mut output)
///     .expect("Reconciliation failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncReconcileStrategy;

impl ReconcileStrategy for SyncReconcileStrategy {
    fn process(
        &self,
        input_path: &Path,
        catalog: Arc<Catalog>,
        results: Arc<ResultIndex>,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        let reader = SyncReader::new(input_path, &catalog)?;

        let mut outcomes = Vec::new();
        for item in reader {
            match item {
                Ok(entry) => {
                    if let Some(outcome) = reconcile_entry(&entry, results.as_ref(), &catalog) {
                        outcomes.push(outcome);
                    }
                }
                Err(e) => warn!(error = %e, "bet entry skipped"),
            }
        }

        debug!(outcomes = outcomes.len(), "sync reconciliation finished");
        write_outcomes_csv(&outcomes, output)
    }
}

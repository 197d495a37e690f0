//! Reconciliation strategy module
//!
//! This module defines the Strategy pattern for complete batch reconciliation
//! pipelines, covering both CSV reading of bet entries and matching against
//! draw results. Different implementations (synchronous, asynchronous batch)
//! can be selected at runtime and produce identical output.

use crate::cli::StrategyType;
use crate::core::catalog::Catalog;
use crate::core::result_store::ResultIndex;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncReconcileStrategy, BatchConfig};
pub use sync::SyncReconcileStrategy;

/// Reconciliation strategy trait for complete batch pipelines
///
/// Each strategy reads bet entries from a CSV file, reconciles them against
/// the draw results, and writes the outcomes, sorted by entry id, as CSV.
pub trait ReconcileStrategy: Send + Sync {
    /// Reconcile the bet entries of a file and write the outcomes
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the bet entries CSV file
    /// * `catalog` - The resolved configuration snapshot
    /// * `results` - Draw results to match against
    /// * `output` - Mutable reference to a writer for outputting outcomes
    ///
    /// # Returns
    ///
    /// * `Ok(())` if all processing completed (possibly with skipped entries)
    /// * `Err(String)` if a fatal error occurred (file not found, I/O error, etc.)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened
    /// - The async runtime cannot be created
    /// - Output cannot be written
    ///
    /// Bad rows and entries without results are logged and skipped.
    fn process(
        &self,
        input_path: &Path,
        catalog: Arc<Catalog>,
        results: Arc<ResultIndex>,
        output: &mut dyn Write,
    ) -> Result<(), String>;
}

/// Create a reconciliation strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
///
/// # Returns
///
/// A boxed trait object implementing the ReconcileStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ReconcileStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncReconcileStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncReconcileStrategy::new(config))
        }
    }
}

//! Concurrent reconciliation of bet-entry batches
//!
//! Entries are independent of each other, so a batch is split into chunks
//! and every chunk is reconciled on its own tokio task. The catalog and the
//! result index are shared read-only behind `Arc`; outcomes go into the
//! shared [`AsyncOutcomeStore`].

use super::AsyncOutcomeStore;
use crate::core::catalog::Catalog;
use crate::core::reconciler::reconcile_entry;
use crate::core::result_store::ResultIndex;
use crate::types::{BetEntry, ReconciliationOutcome};
use std::sync::Arc;
use tracing::{error, warn};

/// Result of reconciling a single entry
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub entry_id: u64,
    /// `None` when the entry was skipped
    pub outcome: Option<ReconciliationOutcome>,
}

/// Reconciles batches of entries in parallel
///
/// Cloning is cheap: every clone shares the same catalog, results and store.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    catalog: Arc<Catalog>,
    results: Arc<ResultIndex>,
    outcomes: Arc<AsyncOutcomeStore>,
}

impl BatchProcessor {
    /// Create a processor over shared state
    pub fn new(
        catalog: Arc<Catalog>,
        results: Arc<ResultIndex>,
        outcomes: Arc<AsyncOutcomeStore>,
    ) -> Self {
        Self {
            catalog,
            results,
            outcomes,
        }
    }

    /// Split a batch into at most `parts` chunks of near-equal size
    ///
    /// Entry order is kept inside each chunk. An empty batch yields no chunk.
    pub fn partition(&self, batch: Vec<BetEntry>, parts: usize) -> Vec<Vec<BetEntry>> {
        if batch.is_empty() {
            return Vec::new();
        }
        let chunk_size = batch.len().div_ceil(parts.max(1));
        let mut chunks = Vec::new();
        let mut current = Vec::with_capacity(chunk_size);
        for entry in batch {
            current.push(entry);
            if current.len() == chunk_size {
                chunks.push(std::mem::replace(&mut current, Vec::with_capacity(chunk_size)));
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }

    /// Reconcile one chunk, recording every outcome
    pub async fn process_chunk(&self, entries: Vec<BetEntry>) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            let outcome = reconcile_entry(&entry, self.results.as_ref(), &self.catalog);
            if let Some(outcome) = &outcome {
                self.outcomes.record(outcome.clone());
            }
            results.push(ProcessingResult {
                entry_id: entry.id,
                outcome,
            });
        }
        results
    }

    /// Reconcile a batch across up to `parts` concurrent tasks
    ///
    /// # Returns
    ///
    /// One [`ProcessingResult`] per entry of every task that completed
    pub async fn process_batch(
        &self,
        batch: Vec<BetEntry>,
        parts: usize,
    ) -> Vec<ProcessingResult> {
        let mut tasks = Vec::new();
        for chunk in self.partition(batch, parts) {
            let processor = self.clone();
            tasks.push(tokio::spawn(
                async move { processor.process_chunk(chunk).await },
            ));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(chunk_results) => results.extend(chunk_results),
                Err(e) => error!(error = %e, "reconciliation task failed"),
            }
        }

        let skipped = results.iter().filter(|r| r.outcome.is_none()).count();
        if skipped > 0 {
            warn!(skipped, "entries skipped in batch");
        }
        results
    }
}

//! Thread-safe outcome storage for async batch reconciliation
//!
//! This module provides the `AsyncOutcomeStore` struct, which collects
//! reconciliation outcomes from concurrently running tasks.
//!
//! # Design
//!
//! The store uses `DashMap` (a concurrent HashMap) keyed by bet entry id, so
//! tasks working on different entries never contend for one lock. Output
//! order is restored at the end by sorting on the entry id, which makes the
//! async strategy's output identical to the sync one.

use crate::types::ReconciliationOutcome;
use dashmap::DashMap;

/// Concurrent map of bet entry id to outcome
#[derive(Debug, Default)]
pub struct AsyncOutcomeStore {
    outcomes: DashMap<u64, ReconciliationOutcome>,
}

impl AsyncOutcomeStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            outcomes: DashMap::new(),
        }
    }

    /// Store an outcome
    ///
    /// If an outcome for the same entry id already exists, the new one is
    /// ignored (first occurrence wins).
    pub fn record(&self, outcome: ReconciliationOutcome) {
        self.outcomes
            .entry(outcome.bet_entry_id)
            .or_insert(outcome);
    }

    /// Outcome of one entry, if recorded
    pub fn get(&self, bet_entry_id: u64) -> Option<ReconciliationOutcome> {
        self.outcomes
            .get(&bet_entry_id)
            .map(|entry| entry.value().clone())
    }

    /// Number of recorded outcomes
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Every outcome, sorted by entry id
    pub fn sorted(&self) -> Vec<ReconciliationOutcome> {
        let mut outcomes: Vec<ReconciliationOutcome> = self
            .outcomes
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        outcomes.sort_by_key(|outcome| outcome.bet_entry_id);
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use std::thread;

    fn winning(id: u64, amount: i64) -> ReconciliationOutcome {
        ReconciliationOutcome {
            bet_entry_id: id,
            is_winning: true,
            matched_numbers: vec!["25".to_string()],
            matched_prize_levels: vec!["eighth_prize".to_string()],
            win_amount: Decimal::new(amount, 0),
        }
    }

    #[test]
    fn test_record_and_get() {
        let store = AsyncOutcomeStore::new();
        assert!(store.is_empty());

        store.record(winning(3, 75));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(3), Some(winning(3, 75)));
        assert_eq!(store.get(4), None);
    }

    #[test]
    fn test_first_record_wins() {
        let store = AsyncOutcomeStore::new();
        store.record(winning(1, 75));
        store.record(ReconciliationOutcome::losing(1));
        assert_eq!(store.get(1), Some(winning(1, 75)));
    }

    #[test]
    fn test_sorted_by_entry_id() {
        let store = AsyncOutcomeStore::new();
        for id in [5, 1, 3] {
            store.record(ReconciliationOutcome::losing(id));
        }
        let ids: Vec<u64> = store.sorted().iter().map(|o| o.bet_entry_id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn test_concurrent_records() {
        let store = Arc::new(AsyncOutcomeStore::new());
        let handles: Vec<_> = (0..8u64)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..100u64 {
                        store.record(ReconciliationOutcome::losing(worker * 100 + i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 800);
        let sorted = store.sorted();
        assert!(sorted
            .windows(2)
            .all(|pair| pair[0].bet_entry_id < pair[1].bet_entry_id));
    }
}

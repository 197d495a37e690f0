//! In-memory index of official draw results
//!
//! Results are keyed by (station, draw date). The results CSV carries one row
//! per tier, so the index is filled tier by tier.
//!
//! # Duplicate Handling
//!
//! When a whole result is inserted twice for the same key, the first one is
//! kept. Rows for the same tier are appended, so a tier may be split across
//! several rows.

use crate::core::traits::ResultStore;
use crate::types::{LotteryResult, PrizeTier, StationId};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// Draw results keyed by station and date
#[derive(Debug, Clone, Default)]
pub struct ResultIndex {
    results: HashMap<(StationId, NaiveDate), LotteryResult>,
    dates: HashSet<NaiveDate>,
}

impl ResultIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a complete result
    ///
    /// If a result for the same station and date already exists, the new one
    /// is ignored.
    pub fn insert(&mut self, result: LotteryResult) {
        self.dates.insert(result.draw_date);
        self.results
            .entry((result.station_id, result.draw_date))
            .or_insert(result);
    }

    /// Append numbers to one tier, creating the result if needed
    ///
    /// # Arguments
    ///
    /// * `station_id` - Station that held the draw
    /// * `draw_date` - Date of the draw
    /// * `tier` - Prize tier the numbers belong to
    /// * `numbers` - Prize numbers, in draw order
    pub fn add_numbers(
        &mut self,
        station_id: StationId,
        draw_date: NaiveDate,
        tier: PrizeTier,
        numbers: impl IntoIterator<Item = String>,
    ) {
        self.dates.insert(draw_date);
        let result = self
            .results
            .entry((station_id, draw_date))
            .or_insert_with(|| LotteryResult::new(station_id, draw_date));
        result.tiers[tier.index()].extend(numbers);
    }

    /// Result of a station's draw on a date
    pub fn get(&self, station_id: StationId, draw_date: NaiveDate) -> Option<&LotteryResult> {
        self.results.get(&(station_id, draw_date))
    }

    /// Number of stored results
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the index holds no result
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl ResultStore for ResultIndex {
    fn result(&self, station_id: StationId, draw_date: NaiveDate) -> Option<&LotteryResult> {
        self.get(station_id, draw_date)
    }

    fn has_date(&self, draw_date: NaiveDate) -> bool {
        self.dates.contains(&draw_date)
    }
}

impl FromIterator<LotteryResult> for ResultIndex {
    fn from_iter<I: IntoIterator<Item = LotteryResult>>(iter: I) -> Self {
        let mut index = ResultIndex::new();
        for result in iter {
            index.insert(result);
        }
        index
    }
}

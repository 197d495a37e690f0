//! Core traits for draw-result lookup
//!
//! Reconciliation only needs to look results up by station and date, so the
//! sync path (an owned index) and the async path (the same index behind an
//! `Arc`) share one interface.

use crate::types::{LotteryResult, StationId};
use chrono::NaiveDate;
use std::sync::Arc;

/// Read access to official draw results
pub trait ResultStore {
    /// Result of a station's draw on a date
    fn result(&self, station_id: StationId, draw_date: NaiveDate) -> Option<&LotteryResult>;

    /// Whether any result exists for a date
    fn has_date(&self, draw_date: NaiveDate) -> bool;
}

impl<T: ResultStore + ?Sized> ResultStore for Arc<T> {
    fn result(&self, station_id: StationId, draw_date: NaiveDate) -> Option<&LotteryResult> {
        (**self).result(station_id, draw_date)
    }

    fn has_date(&self, draw_date: NaiveDate) -> bool {
        (**self).has_date(draw_date)
    }
}

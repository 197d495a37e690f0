//! CSV format handling for bet entries, draw results and outputs
//!
//! This module centralizes all CSV format concerns, providing:
//! - Record structures for deserialization of bets and results
//! - Conversion from CSV records to domain types
//! - Outcome and calculation-report serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::core::catalog::Catalog;
use crate::core::engine::BetCodeReport;
use crate::core::station_resolver::resolve_station;
use crate::core::text::fold_key;
use crate::types::{
    BetEntry, PrizeTier, ReconciliationOutcome, StationId, StationTarget,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Date format of every CSV file
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Bet entry row: `id,draw_date,station,numbers,bet_type,amount`
///
/// `station` is a selector as typed on a ticket (`vl`, `2dmn`, `vl.ct`);
/// `numbers` are dot separated.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BetEntryRecord {
    pub id: u64,
    pub draw_date: String,
    pub station: String,
    pub numbers: String,
    pub bet_type: String,
    pub amount: String,
}

/// Draw result row: `station_id,draw_date,tier,numbers`
///
/// `numbers` are space separated; `tier` is a label such as `special_prize`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ResultRecord {
    pub station_id: StationId,
    pub draw_date: String,
    pub tier: String,
    pub numbers: String,
}

/// Numbers of one tier of one draw
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub station_id: StationId,
    pub draw_date: NaiveDate,
    pub tier: PrizeTier,
    pub numbers: Vec<String>,
}

fn parse_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|e| format!("Invalid draw date '{}': {}", text, e))
}

/// Convert a bet entry record into a [`BetEntry`]
///
/// The station selector is resolved for the entry's draw date, so aliases
/// shared by several stations follow that day's priorities.
///
/// # Arguments
///
/// * `record` - The deserialized CSV record
/// * `catalog` - The resolved configuration snapshot
///
/// # Returns
///
/// * `Ok(BetEntry)` - Successfully converted entry
/// * `Err(String)` - Error message naming the entry id
pub fn convert_bet_record(record: BetEntryRecord, catalog: &Catalog) -> Result<BetEntry, String> {
    let draw_date = parse_date(&record.draw_date)
        .map_err(|e| format!("{} for entry {}", e, record.id))?;

    let station = resolve_station(&record.station, catalog, Some(draw_date))
        .map_err(|e| format!("{} for entry {}", e, record.id))?;

    let numbers: Vec<String> = record
        .numbers
        .split(|c: char| c == '.' || c == ',' || c.is_whitespace())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();
    if numbers.is_empty() {
        return Err(format!("Entry {} has no numbers", record.id));
    }
    if let Some(bad) = numbers
        .iter()
        .find(|n| !n.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(format!("Invalid number '{}' for entry {}", bad, record.id));
    }

    let amount = match Decimal::from_str(record.amount.trim()) {
        Ok(amount) if amount > Decimal::ZERO => amount,
        _ => {
            return Err(format!(
                "Invalid amount '{}' for entry {}",
                record.amount, record.id
            ))
        }
    };

    Ok(BetEntry {
        id: record.id,
        draw_date,
        target: StationTarget::from(&station),
        bet_type: fold_key(&record.bet_type),
        numbers,
        amount,
    })
}

/// Convert a draw result record into a [`ResultRow`]
///
/// # Errors
///
/// Returns an error for an unknown tier label, a bad date, or a number that
/// is not all digits.
pub fn convert_result_record(record: ResultRecord) -> Result<ResultRow, String> {
    let draw_date = parse_date(&record.draw_date)?;
    let tier = PrizeTier::from_label(&record.tier)
        .ok_or_else(|| format!("Unknown prize tier '{}'", record.tier))?;

    let numbers: Vec<String> = record
        .numbers
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if let Some(bad) = numbers
        .iter()
        .find(|n| !n.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(format!(
            "Invalid prize number '{}' for station {} on {}",
            bad, record.station_id, draw_date
        ));
    }

    Ok(ResultRow {
        station_id: record.station_id,
        draw_date,
        tier,
        numbers,
    })
}

/// Write reconciliation outcomes to CSV format
///
/// Writes columns `bet_entry_id,is_winning,matched_numbers,
/// matched_prize_levels,win_amount`. Lists are joined with `|`. Outcomes are
/// sorted by entry id for deterministic output.
///
/// # Arguments
///
/// * `outcomes` - Outcomes to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_outcomes_csv(
    outcomes: &[ReconciliationOutcome],
    output: &mut dyn Write,
) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record([
            "bet_entry_id",
            "is_winning",
            "matched_numbers",
            "matched_prize_levels",
            "win_amount",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted: Vec<&ReconciliationOutcome> = outcomes.iter().collect();
    sorted.sort_by_key(|outcome| outcome.bet_entry_id);

    for outcome in sorted {
        writer
            .write_record(&[
                outcome.bet_entry_id.to_string(),
                outcome.is_winning.to_string(),
                outcome.matched_numbers.join("|"),
                outcome.matched_prize_levels.join("|"),
                outcome.win_amount.normalize().to_string(),
            ])
            .map_err(|e| format!("Failed to write outcome record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;
    Ok(())
}

/// Write the calculation report of one bet code
///
/// One row per stake detail with the matching prize detail:
/// `line,bet_type,numbers,stake,potential_prize,valid,error`. `line` is the
/// 1-based position among the code's bet lines.
pub fn write_report_csv(report: &BetCodeReport, output: &mut dyn Write) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record([
            "line",
            "bet_type",
            "numbers",
            "stake",
            "potential_prize",
            "valid",
            "error",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for (stake, prize) in report.stake.details.iter().zip(&report.prize.details) {
        writer
            .write_record(&[
                (stake.line_index + 1).to_string(),
                stake.bet_type.clone(),
                stake.numbers.join("."),
                stake.stake.normalize().to_string(),
                prize.potential.normalize().to_string(),
                stake.is_valid.to_string(),
                stake
                    .error
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            ])
            .map_err(|e| format!("Failed to write report record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;
    Ok(())
}

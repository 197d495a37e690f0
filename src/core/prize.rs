//! Potential prize calculation
//!
//! The potential prize of a (line, bet type) pair is `amount × payout rate`.
//! Default and permutation bets read the rate by digit length; bridge bets
//! read it by bridge class (north, single station, two stations).

use crate::types::{
    BetClass, BetCodeError, BetLine, BetPart, ParsedBetCode, ParsedStation, PrizeDetail,
    PrizeResult, ResolvedRate,
};
use rust_decimal::Decimal;
use tracing::debug;

/// Payout rate of one bet type on a line placed on `station`
pub fn payout_rate(line: &BetLine, part: &BetPart, station: &ParsedStation) -> ResolvedRate {
    match part.class() {
        BetClass::Bridge => part.rule.payout_for_bridge(station.bridge_class()),
        BetClass::Default | BetClass::Permutation => {
            part.rule.payout_for_digits(line.digit_length())
        }
    }
}

/// Potential prize of one bet type on a valid line
pub fn prize_detail(
    line_index: usize,
    line: &BetLine,
    part: &BetPart,
    station: &ParsedStation,
) -> PrizeDetail {
    let rate = payout_rate(line, part, station);
    PrizeDetail {
        line_index,
        bet_type: part.rule.name.clone(),
        numbers: line.numbers.clone(),
        amount: part.amount,
        payout_rate: rate.rate,
        rate_source: rate.source,
        potential: part.amount * rate.rate,
        is_valid: true,
        error: None,
    }
}

fn invalid_detail(line_index: usize, line: &BetLine, error: BetCodeError) -> PrizeDetail {
    PrizeDetail {
        line_index,
        bet_type: line
            .primary
            .as_ref()
            .map(|part| part.rule.name.clone())
            .unwrap_or_default(),
        numbers: line.numbers.clone(),
        amount: Decimal::ZERO,
        payout_rate: Decimal::ZERO,
        rate_source: String::new(),
        potential: Decimal::ZERO,
        is_valid: false,
        error: Some(error),
    }
}

/// Potential prize of a whole parsed bet code
///
/// Mirrors [`crate::core::stake::compute_stake`]: one detail per bet type
/// of every valid line, one invalid detail per invalid line, and a total
/// over the valid details.
pub fn compute_prize(code: &ParsedBetCode) -> PrizeResult {
    let mut details = Vec::new();

    for (index, line) in code.lines.iter().enumerate() {
        match &code.station {
            Some(station) if line.is_valid => {
                details.extend(
                    line.parts()
                        .map(|part| prize_detail(index, line, part, station)),
                );
            }
            _ => {
                let error = line
                    .error
                    .clone()
                    .or_else(|| code.error().cloned())
                    .unwrap_or_else(|| BetCodeError::station_not_found(""));
                details.push(invalid_detail(index, line, error));
            }
        }
    }

    let total_potential: Decimal = details
        .iter()
        .filter(|detail| detail.is_valid)
        .map(|detail| detail.potential)
        .sum();
    let has_errors = details.iter().any(|detail| !detail.is_valid);

    debug!(%total_potential, details = details.len(), has_errors, "prize computed");

    PrizeResult {
        total_potential,
        details,
        has_errors,
    }
}

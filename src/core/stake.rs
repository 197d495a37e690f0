//! Stake calculation
//!
//! The stake is what the player owes for a bet. It is computed per
//! (line, bet type) pair with the formula of the bet type's class:
//!
//! - **Default**: `stations × numbers × combination × amount × commission`
//! - **Bridge**: `stations × n(n−1)/2 × amount × 2 × combination × commission`
//! - **Permutation**: `stations × Σ|perms(n)| × combination × amount × commission`
//!
//! All arithmetic uses `Decimal`, so results are exact.

use crate::core::catalog::Catalog;
use crate::types::{
    BetClass, BetCodeError, BetLine, BetPart, ParsedBetCode, ParsedStation, StakeDetail,
    StakeFormula, StakeResult,
};
use rust_decimal::Decimal;
use tracing::debug;

/// Formula and its class-specific count for one bet type on a line
pub fn stake_formula(line: &BetLine, part: &BetPart) -> StakeFormula {
    match part.class() {
        BetClass::Default => StakeFormula::Default {
            number_count: line.numbers.len() as u32,
        },
        BetClass::Bridge => {
            let n = line.numbers.len() as u32;
            StakeFormula::Bridge {
                pair_factor: n * n.saturating_sub(1) / 2,
            }
        }
        BetClass::Permutation => StakeFormula::Permutation {
            total_permutations: line.total_permutations() as u32,
        },
    }
}

/// Stake of one bet type on a valid line
///
/// # Arguments
///
/// * `line_index` - Position of the line in the bet code
/// * `line` - The parsed line
/// * `part` - The bet type and amount (primary or additional)
/// * `station` - The station selector the line is placed on
/// * `commission_rate` - Rate applied to the stake
///
/// # Returns
///
/// A valid [`StakeDetail`] with every formula input filled in
pub fn stake_detail(
    line_index: usize,
    line: &BetLine,
    part: &BetPart,
    station: &ParsedStation,
    commission_rate: Decimal,
) -> StakeDetail {
    let station_count = station.station_count();
    let combination_multiplier = station
        .primary_region()
        .map(|region| part.rule.combination_multiplier(region, line.digit_length()))
        .unwrap_or(1);
    let formula = stake_formula(line, part);

    let units = match formula {
        StakeFormula::Default { number_count } => Decimal::from(number_count),
        StakeFormula::Bridge { pair_factor } => Decimal::from(pair_factor) * Decimal::TWO,
        StakeFormula::Permutation { total_permutations } => Decimal::from(total_permutations),
    };
    let stake = Decimal::from(station_count)
        * units
        * Decimal::from(combination_multiplier)
        * part.amount
        * commission_rate;

    StakeDetail {
        line_index,
        bet_type: part.rule.name.clone(),
        numbers: line.numbers.clone(),
        formula: Some(formula),
        station_count,
        combination_multiplier,
        amount: part.amount,
        commission_rate,
        stake,
        is_valid: true,
        error: None,
    }
}

fn invalid_detail(
    line_index: usize,
    line: &BetLine,
    station_count: u32,
    commission_rate: Decimal,
    error: BetCodeError,
) -> StakeDetail {
    StakeDetail {
        line_index,
        bet_type: line
            .primary
            .as_ref()
            .map(|part| part.rule.name.clone())
            .unwrap_or_default(),
        numbers: line.numbers.clone(),
        formula: None,
        station_count,
        combination_multiplier: 0,
        amount: line
            .primary
            .as_ref()
            .map(|part| part.amount)
            .unwrap_or(Decimal::ZERO),
        commission_rate,
        stake: Decimal::ZERO,
        is_valid: false,
        error: Some(error),
    }
}

/// Stake of a whole parsed bet code
///
/// Valid lines produce one detail per bet type. Invalid lines produce one
/// invalid detail carrying the line's error, so every problem stays
/// visible; only valid details are summed.
///
/// # Arguments
///
/// * `code` - The parsed bet code
/// * `catalog` - Source of the commission rate
pub fn compute_stake(code: &ParsedBetCode, catalog: &Catalog) -> StakeResult {
    let commission_rate = catalog.commission_rate();
    let mut details = Vec::new();

    for (index, line) in code.lines.iter().enumerate() {
        let station = match &code.station {
            Some(station) if line.is_valid => station,
            _ => {
                let error = line
                    .error
                    .clone()
                    .or_else(|| code.error().cloned())
                    .unwrap_or_else(|| BetCodeError::station_not_found(""));
                let station_count = code.station.as_ref().map_or(0, |s| s.station_count());
                details.push(invalid_detail(index, line, station_count, commission_rate, error));
                continue;
            }
        };

        for part in line.parts() {
            details.push(stake_detail(index, line, part, station, commission_rate));
        }
    }

    let total_stake: Decimal = details
        .iter()
        .filter(|detail| detail.is_valid)
        .map(|detail| detail.stake)
        .sum();
    let has_errors = details.iter().any(|detail| !detail.is_valid);

    debug!(%total_stake, details = details.len(), has_errors, "stake computed");

    StakeResult {
        total_stake,
        details,
        has_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::fixtures::catalog;
    use crate::core::line_parser::parse_line;
    use crate::types::RegionCode;
    use rstest::rstest;

    fn code(station: ParsedStation, lines: &[&str], catalog: &Catalog) -> ParsedBetCode {
        let lines: Vec<BetLine> = lines
            .iter()
            .map(|line| parse_line(line, &station, catalog))
            .collect();
        ParsedBetCode {
            success: lines.iter().all(|line| line.is_valid),
            station: Some(station),
            lines,
            errors: Vec::new(),
        }
    }

    fn vinh_long(catalog: &Catalog) -> ParsedStation {
        ParsedStation::Single(catalog.station(2).cloned().unwrap())
    }

    fn two_south(catalog: &Catalog) -> ParsedStation {
        ParsedStation::List(vec![
            catalog.station(2).cloned().unwrap(),
            catalog.station(3).cloned().unwrap(),
        ])
    }

    #[rstest]
    // 1 station × 2 numbers × 2 (dd south) × 10 × 0.8
    #[case::dd_single("25.36dd10", false, "32")]
    // 2 stations × 2 numbers × 2 × 10 × 0.8
    #[case::dd_two("25.36dd10", true, "64")]
    // 1 × 3 numbers × 18 (bao 2 digits south) × 1 × 0.8
    #[case::bao("25.36.47b1", false, "43.2")]
    // 1 × 1 × 17 (bao 3 digits south) × 2 × 0.8
    #[case::bao_three("123b2", false, "27.2")]
    fn test_default_formula(
        #[case] line: &str,
        #[case] two_stations: bool,
        #[case] expected: &str,
    ) {
        let catalog = catalog();
        let station = if two_stations {
            two_south(&catalog)
        } else {
            vinh_long(&catalog)
        };
        let result = compute_stake(&code(station, &[line], &catalog), &catalog);
        assert!(!result.has_errors);
        assert_eq!(result.total_stake, expected.parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_default_formula_components() {
        let catalog = catalog();
        let result = compute_stake(&code(two_south(&catalog), &["25.36dd10"], &catalog), &catalog);
        let detail = &result.details[0];
        assert_eq!(detail.formula, Some(StakeFormula::Default { number_count: 2 }));
        assert_eq!(detail.station_count, 2);
        assert_eq!(detail.combination_multiplier, 2);
        assert_eq!(detail.amount, Decimal::new(10, 0));
        assert_eq!(detail.commission_rate, Decimal::new(8, 1));
        assert_eq!(
            detail.stake,
            Decimal::from(detail.station_count)
                * Decimal::from(2u32)
                * Decimal::from(detail.combination_multiplier)
                * detail.amount
                * detail.commission_rate
        );
    }

    #[test]
    fn test_bridge_formula() {
        let catalog = catalog();
        let result = compute_stake(&code(vinh_long(&catalog), &["25.36.47da5"], &catalog), &catalog);
        let detail = &result.details[0];
        // 3 numbers → 3 pairs; 1 × 3 × 5 × 2 × 18 × 0.8
        assert_eq!(detail.formula, Some(StakeFormula::Bridge { pair_factor: 3 }));
        assert_eq!(detail.stake, Decimal::new(432, 0));
    }

    #[test]
    fn test_permutation_formula() {
        let catalog = catalog();
        let result = compute_stake(&code(vinh_long(&catalog), &["123.112bdao1"], &catalog), &catalog);
        let detail = &result.details[0];
        // 6 + 3 permutations; 1 × 9 × 17 × 1 × 0.8
        assert_eq!(
            detail.formula,
            Some(StakeFormula::Permutation { total_permutations: 9 })
        );
        assert_eq!(detail.stake, "122.4".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_region_uses_north_combinations() {
        let catalog = catalog();
        let result = compute_stake(
            &code(ParsedStation::Region(RegionCode::North), &["25dd10"], &catalog),
            &catalog,
        );
        // 1 × 1 × 5 × 10 × 0.8
        assert_eq!(result.total_stake, Decimal::new(40, 0));
    }

    #[test]
    fn test_additional_parts_get_own_details() {
        let catalog = catalog();
        let result = compute_stake(&code(vinh_long(&catalog), &["25.36dd10.b1"], &catalog), &catalog);
        assert_eq!(result.details.len(), 2);
        // dd: 32, b: 1 × 2 × 18 × 1 × 0.8 = 28.8
        assert_eq!(result.total_stake, "60.8".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_invalid_lines_reported_not_summed() {
        let catalog = catalog();
        let result = compute_stake(
            &code(vinh_long(&catalog), &["25.36dd10", "25da10"], &catalog),
            &catalog,
        );
        assert!(result.has_errors);
        assert_eq!(result.details.len(), 2);
        assert_eq!(result.total_stake, Decimal::new(32, 0));
        let invalid = &result.details[1];
        assert!(!invalid.is_valid);
        assert_eq!(invalid.stake, Decimal::ZERO);
        assert_eq!(
            invalid.error,
            Some(BetCodeError::insufficient_for_bridge("Da", 1))
        );
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 0)]
    #[case(2, 1)]
    #[case(4, 6)]
    fn test_pair_factor(#[case] n: usize, #[case] expected: u32) {
        let catalog = catalog();
        let mut line = parse_line("25.36da1", &vinh_long(&catalog), &catalog);
        line.numbers = (0..n).map(|i| format!("{:02}", i)).collect();
        let part = line.primary.clone().unwrap();
        assert_eq!(
            stake_formula(&line, &part),
            StakeFormula::Bridge { pair_factor: expected }
        );
    }
}

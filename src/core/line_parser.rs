//! Bet line parsing
//!
//! Turns one canonical bet line into a [`BetLine`]: number items are
//! expanded (kéo sequences, keywords, concatenated digit runs), numbers are
//! deduplicated and checked for equal length, permutations are generated
//! when any bet type on the line permutes, and every bet type is validated
//! against the station.

use crate::core::catalog::Catalog;
use crate::core::grammar::{self, NumberItem, Segment};
use crate::core::permutations::permutations;
use crate::core::rules::is_permutation_alias;
use crate::core::text::fold_line;
use crate::core::validator::validate_line;
use crate::types::{BetClass, BetCodeError, BetLine, BetPart, BetRule, ParsedStation};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;
use tracing::debug;

/// Longest kéo expansion accepted
const MAX_SEQUENCE_LEN: u64 = 10_000;

/// Split a concatenated digit run into numbers
///
/// A run of four or more digits is split when the bet type is a bridge or
/// does not accept the run's length. It is cut into chunks of the smallest
/// accepted length (at least 2) that divides it evenly; a run no accepted
/// length divides stays whole. Without a bet type nothing is split.
pub fn split_digit_run(run: &str, rule: Option<&BetRule>) -> Vec<String> {
    let len = run.len();
    let Some(rule) = rule else {
        return vec![run.to_string()];
    };
    if len < 4 || (rule.class != BetClass::Bridge && rule.accepts_digits(len)) {
        return vec![run.to_string()];
    }

    let chunk = rule
        .digit_rules
        .iter()
        .copied()
        .find(|&d| d >= 2 && d < len && len % d == 0);

    match chunk {
        Some(size) => run
            .as_bytes()
            .chunks(size)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect(),
        None => vec![run.to_string()],
    }
}

/// Expand a kéo sequence
///
/// `next` gives the step (`next - start`, must be positive); without it the
/// step is 1. Numbers run from `start` to `end` inclusive and are padded to
/// the widest of the three inputs.
///
/// # Errors
///
/// Returns `InvalidStepSequence` when the step is not positive, `end` is
/// before `start`, or the sequence is unreasonably long.
pub fn expand_sequence(
    start: &str,
    next: Option<&str>,
    end: &str,
) -> Result<Vec<String>, BetCodeError> {
    let invalid = || BetCodeError::invalid_step(start, next.unwrap_or(""), end);

    let first: u64 = start.parse().map_err(|_| invalid())?;
    let last: u64 = end.parse().map_err(|_| invalid())?;
    let step = match next {
        Some(next) => {
            let second: u64 = next.parse().map_err(|_| invalid())?;
            second.checked_sub(first).filter(|step| *step > 0).ok_or_else(invalid)?
        }
        None => 1,
    };
    if last < first || (last - first) / step >= MAX_SEQUENCE_LEN {
        return Err(invalid());
    }

    let width = start
        .len()
        .max(next.map(str::len).unwrap_or(0))
        .max(end.len());

    Ok((first..=last)
        .step_by(step as usize)
        .map(|n| format!("{:0width$}", n, width = width))
        .collect())
}

/// Expand the items of a number group
///
/// # Errors
///
/// Returns `InvalidStepSequence` for a bad kéo sequence.
pub fn expand_items(
    items: &[NumberItem],
    rule: Option<&BetRule>,
) -> Result<Vec<String>, BetCodeError> {
    let mut numbers = Vec::new();
    for item in items {
        match item {
            NumberItem::Digits(run) => numbers.extend(split_digit_run(run, rule)),
            NumberItem::Sequence { start, next, end } => {
                numbers.extend(expand_sequence(start, next.as_deref(), end)?)
            }
            NumberItem::Keyword(set) => numbers.extend(set.numbers()),
        }
    }
    Ok(numbers)
}

/// Parse an amount in thousands
///
/// # Errors
///
/// Returns `InvalidAmount` unless the text is a positive decimal.
pub fn parse_amount(text: &str) -> Result<Decimal, BetCodeError> {
    match Decimal::from_str(&text.replace(',', ".")) {
        Ok(amount) if amount > Decimal::ZERO => Ok(amount),
        _ => Err(BetCodeError::invalid_amount(text)),
    }
}

fn dedupe(numbers: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    numbers
        .into_iter()
        .filter(|number| seen.insert(number.clone()))
        .collect()
}

fn bet_part(alias: &str, amount: &str, catalog: &Catalog) -> Result<BetPart, BetCodeError> {
    let rule = catalog
        .rule(alias)
        .ok_or_else(|| BetCodeError::unrecognized_bet_type(alias))?;
    Ok(BetPart {
        rule: rule.clone(),
        alias: alias.to_string(),
        amount: parse_amount(amount)?,
        is_permutation: rule.is_permutation || is_permutation_alias(alias),
    })
}

fn build_line(
    source: &str,
    segment: &Segment,
    station: &ParsedStation,
    catalog: &Catalog,
) -> Result<BetLine, BetCodeError> {
    let parts = segment
        .suffixes
        .iter()
        .map(|suffix| bet_part(&suffix.alias, &suffix.amount, catalog))
        .collect::<Result<Vec<_>, _>>()?;

    let numbers = dedupe(expand_items(
        &segment.items,
        parts.first().map(|part| &part.rule),
    )?);
    let Some(expected) = numbers.first().map(String::len) else {
        return Err(BetCodeError::EmptyNumbers {
            line: source.to_string(),
        });
    };
    if let Some(number) = numbers.iter().find(|n| n.len() != expected) {
        return Err(BetCodeError::inconsistent_digit_length(expected, number));
    }

    let is_permutation = parts.iter().any(|part| part.is_permutation);
    let permutations: BTreeMap<String, Vec<String>> = if is_permutation {
        numbers
            .iter()
            .map(|number| (number.clone(), permutations(number)))
            .collect()
    } else {
        BTreeMap::new()
    };

    let mut parts = parts.into_iter();
    let mut line = BetLine {
        source: source.to_string(),
        numbers,
        primary: parts.next(),
        additional: parts.collect(),
        is_permutation,
        permutations,
        is_valid: true,
        error: None,
    };

    if let Err(error) = validate_line(&line, station) {
        line.is_valid = false;
        line.error = Some(error);
    }
    Ok(line)
}

/// Parse one canonical bet line
///
/// Never fails: problems are reported on the returned line through
/// `is_valid` and `error`.
///
/// # Arguments
///
/// * `line` - One bet line, normally the output of the normalizer
/// * `station` - The station the line is placed on
/// * `catalog` - The resolved configuration snapshot
pub fn parse_line(line: &str, station: &ParsedStation, catalog: &Catalog) -> BetLine {
    let text = fold_line(line);

    let parsed = grammar::parse(&text, catalog).and_then(|syntax| match syntax.segments.as_slice() {
        [segment] => build_line(&text, segment, station, catalog),
        segments => Err(BetCodeError::MultipleBetGroups {
            line: text.clone(),
            count: segments.len(),
        }),
    });

    match parsed {
        Ok(bet_line) => {
            debug!(
                line = %text,
                numbers = bet_line.numbers.len(),
                valid = bet_line.is_valid,
                "bet line parsed"
            );
            bet_line
        }
        Err(error) => {
            debug!(line = %text, %error, "bet line rejected");
            BetLine::invalid(&text, error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::fixtures::catalog;
    use crate::types::rule::fixtures::rule;
    use crate::types::RegionCode;
    use rstest::rstest;

    fn south(catalog: &Catalog) -> ParsedStation {
        ParsedStation::Single(catalog.station(2).cloned().unwrap())
    }

    fn numbers(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    #[rstest]
    #[case("10", Some("12"), "20", &["10", "12", "14", "16", "18", "20"])]
    #[case("1", Some("3"), "9", &["1", "3", "5", "7", "9"])]
    #[case("05", None, "9", &["05", "06", "07", "08", "09"])]
    #[case("00", Some("25"), "99", &["00", "25", "50", "75"])]
    #[case("100", Some("101"), "102", &["100", "101", "102"])]
    fn test_expand_sequence(
        #[case] start: &str,
        #[case] next: Option<&str>,
        #[case] end: &str,
        #[case] expected: &[&str],
    ) {
        assert_eq!(expand_sequence(start, next, end), Ok(numbers(expected)));
    }

    #[rstest]
    #[case("20", Some("10"), "30")]
    #[case("10", Some("10"), "30")]
    #[case("50", None, "10")]
    fn test_invalid_sequence(#[case] start: &str, #[case] next: Option<&str>, #[case] end: &str) {
        assert!(matches!(
            expand_sequence(start, next, end),
            Err(BetCodeError::InvalidStepSequence { .. })
        ));
    }

    #[rstest]
    #[case("1234", BetClass::Default, &[2], &["12", "34"])]
    #[case("1234", BetClass::Default, &[2, 3, 4], &["1234"])]
    #[case("1234", BetClass::Bridge, &[2], &["12", "34"])]
    #[case("123456", BetClass::Default, &[3], &["123", "456"])]
    #[case("12345", BetClass::Default, &[2], &["12345"])]
    #[case("123", BetClass::Default, &[2], &["123"])]
    fn test_split_digit_run(
        #[case] run: &str,
        #[case] class: BetClass,
        #[case] digits: &[usize],
        #[case] expected: &[&str],
    ) {
        let bet = rule("Test", "t", class, digits, 75);
        assert_eq!(split_digit_run(run, Some(&bet)), numbers(expected));
    }

    #[test]
    fn test_split_without_rule_keeps_run() {
        assert_eq!(split_digit_run("1234", None), numbers(&["1234"]));
    }

    #[rstest]
    #[case("10", Decimal::new(10, 0))]
    #[case("2.5", Decimal::new(25, 1))]
    #[case("2,5", Decimal::new(25, 1))]
    fn test_parse_amount(#[case] text: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(text), Ok(expected));
    }

    #[test]
    fn test_zero_amount_rejected() {
        assert_eq!(parse_amount("0"), Err(BetCodeError::invalid_amount("0")));
    }

    #[test]
    fn test_parse_simple_line() {
        let catalog = catalog();
        let line = parse_line("25.36dd10", &south(&catalog), &catalog);
        assert!(line.is_valid, "{:?}", line.error);
        assert_eq!(line.numbers, numbers(&["25", "36"]));
        let primary = line.primary.unwrap();
        assert_eq!(primary.rule.name, "Dau duoi");
        assert_eq!(primary.amount, Decimal::new(10, 0));
        assert!(!line.is_permutation);
    }

    #[test]
    fn test_keo_line() {
        let catalog = catalog();
        let line = parse_line("10/12keo20b5", &south(&catalog), &catalog);
        assert!(line.is_valid);
        assert_eq!(line.numbers, numbers(&["10", "12", "14", "16", "18", "20"]));
    }

    #[test]
    fn test_grouped_digits_split_for_two_digit_type() {
        let catalog = catalog();
        let line = parse_line("1234dd10", &south(&catalog), &catalog);
        assert!(line.is_valid);
        assert_eq!(line.numbers, numbers(&["12", "34"]));
    }

    #[test]
    fn test_grouped_digits_kept_for_four_digit_type() {
        let catalog = catalog();
        let line = parse_line("1234b10", &south(&catalog), &catalog);
        assert_eq!(line.numbers, numbers(&["1234"]));
    }

    #[test]
    fn test_bridge_run_split_into_pairs() {
        let catalog = catalog();
        let line = parse_line("12345678da1", &south(&catalog), &catalog);
        assert!(line.is_valid);
        assert_eq!(line.numbers, numbers(&["12", "34", "56", "78"]));
    }

    #[test]
    fn test_mixed_lengths_rejected() {
        let catalog = catalog();
        let line = parse_line("12.345dd10", &south(&catalog), &catalog);
        assert!(!line.is_valid);
        assert_eq!(
            line.error,
            Some(BetCodeError::inconsistent_digit_length(2, "345"))
        );
    }

    #[test]
    fn test_single_number_bridge_rejected() {
        let catalog = catalog();
        let line = parse_line("25da10", &south(&catalog), &catalog);
        assert!(!line.is_valid);
        assert_eq!(
            line.error,
            Some(BetCodeError::insufficient_for_bridge("Da", 1))
        );
    }

    #[test]
    fn test_numbers_deduplicated_in_order() {
        let catalog = catalog();
        let line = parse_line("36.25.36dd10", &south(&catalog), &catalog);
        assert_eq!(line.numbers, numbers(&["36", "25"]));
    }

    #[test]
    fn test_permutation_rule_generates_permutations() {
        let catalog = catalog();
        let line = parse_line("123.112bdao1", &south(&catalog), &catalog);
        assert!(line.is_valid);
        assert!(line.is_permutation);
        assert_eq!(line.permutations["123"].len(), 6);
        assert_eq!(line.permutations["112"], numbers(&["112", "121", "211"]));
        assert_eq!(line.total_permutations(), 9);
    }

    #[test]
    fn test_permutation_alias_marks_line() {
        let catalog = catalog();
        let line = parse_line("123dxc1", &south(&catalog), &catalog);
        assert!(line.is_permutation);
        assert_eq!(line.primary.map(|p| p.class()), Some(BetClass::Permutation));
    }

    #[test]
    fn test_additional_bet_types_share_numbers() {
        let catalog = catalog();
        let line = parse_line("25.36dd10.b5", &south(&catalog), &catalog);
        assert!(line.is_valid);
        assert_eq!(line.primary.as_ref().map(|p| p.alias.as_str()), Some("dd"));
        assert_eq!(line.additional.len(), 1);
        assert_eq!(line.additional[0].amount, Decimal::new(5, 0));
    }

    #[test]
    fn test_keyword_expands() {
        let catalog = catalog();
        let line = parse_line("tài b1", &south(&catalog), &catalog);
        assert!(line.is_valid);
        assert_eq!(line.numbers.len(), 50);
        assert_eq!(line.numbers.first().map(String::as_str), Some("50"));
    }

    #[test]
    fn test_region_mismatch_reported() {
        let catalog = catalog();
        let line = parse_line("25b7l10", &ParsedStation::Region(RegionCode::North), &catalog);
        assert!(!line.is_valid);
        assert_eq!(
            line.error,
            Some(BetCodeError::region_mismatch("Bao 7 lo", RegionCode::North))
        );
    }

    #[rstest]
    #[case("25dd10 36b5", "MultipleBetGroups")]
    #[case("25dd0", "InvalidAmount")]
    #[case("20/10keo30b1", "InvalidStepSequence")]
    #[case("25xx10", "UnrecognizedBetType")]
    fn test_rejected_lines(#[case] text: &str, #[case] variant: &str) {
        let catalog = catalog();
        let line = parse_line(text, &south(&catalog), &catalog);
        assert!(!line.is_valid);
        let error = format!("{:?}", line.error.unwrap());
        assert!(error.starts_with(variant), "{}", error);
    }
}

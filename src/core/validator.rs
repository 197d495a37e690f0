//! Rule validation of parsed bet lines

use crate::types::{BetClass, BetCodeError, BetLine, BetRule, ParsedStation};

/// Check one bet type against a line and its station
///
/// # Errors
///
/// - `BetTypeDigitMismatch` if the bet type does not accept the line's digit length
/// - `BetTypeRegionMismatch` if any region covered by the station is not served
/// - `InsufficientNumbersForBridge` if a bridge bet has fewer than two numbers
pub fn validate(
    line: &BetLine,
    station: &ParsedStation,
    rule: &BetRule,
) -> Result<(), BetCodeError> {
    let digits = line.digit_length();
    if !rule.accepts_digits(digits) {
        return Err(BetCodeError::digit_mismatch(&rule.name, digits));
    }

    if let Some(region) = station
        .regions()
        .into_iter()
        .find(|region| !rule.accepts_region(*region))
    {
        return Err(BetCodeError::region_mismatch(&rule.name, region));
    }

    if rule.class == BetClass::Bridge && line.numbers.len() < 2 {
        return Err(BetCodeError::insufficient_for_bridge(
            &rule.name,
            line.numbers.len(),
        ));
    }

    Ok(())
}

/// Check every bet type of a line, primary first
pub fn validate_line(line: &BetLine, station: &ParsedStation) -> Result<(), BetCodeError> {
    line.parts()
        .try_for_each(|part| validate(line, station, &part.rule))
}

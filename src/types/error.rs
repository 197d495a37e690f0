//! Error types for the bet-code engine
//!
//! This module defines the errors raised while parsing, validating and
//! pricing bet codes, plus the errors raised while loading a configuration
//! snapshot.
//!
//! # Error Categories
//!
//! - **Station errors**: unknown or ambiguous station selectors
//! - **Grammar errors**: unknown bet types, missing amounts, bad kéo sequences
//! - **Rule errors**: digit length and region incompatibilities
//! - **Configuration errors**: unreadable or inconsistent snapshots
//!
//! Every [`BetCodeError`] is recoverable: parsing and calculation attach it
//! to the offending line and keep going.

use crate::types::config::RegionCode;
use thiserror::Error;

/// Error raised for one bet code line
///
/// These errors are reported, never fatal. A line carrying one of them is
/// marked invalid and skipped by the calculators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BetCodeError {
    /// No station, region or counted group matches the selector
    #[error("Station not found: '{selector}'")]
    StationNotFound {
        /// The selector text as typed
        selector: String,
    },

    /// An alias matches several stations and no priority rule decides
    #[error("Station alias '{alias}' is ambiguous between {}", candidates.join(", "))]
    AmbiguousStationAlias {
        /// The shared alias
        alias: String,
        /// Names of the matching stations
        candidates: Vec<String>,
    },

    /// A valid station with nothing to parse yet
    ///
    /// Informational only: the user has typed the station line and not the
    /// bets.
    #[error("Station '{station}' has no bet lines yet")]
    StationOnlyNoBetInfo {
        /// The station selector
        station: String,
    },

    /// A station selector appears after bet lines have started
    #[error("Line {line}: unexpected station selector '{selector}'")]
    UnexpectedStationLine {
        /// 1-based line number in the input
        line: usize,
        /// The selector text
        selector: String,
    },

    /// Numbers of one line have different digit counts
    #[error("Inconsistent digit length: expected {expected} digits, '{number}' has {found}")]
    InconsistentDigitLength {
        /// Digit count of the first number
        expected: usize,
        /// Digit count of the offending number
        found: usize,
        /// The offending number
        number: String,
    },

    /// The bet type does not accept numbers of this length
    #[error("Bet type '{bet_type}' does not accept {digits}-digit numbers")]
    BetTypeDigitMismatch {
        /// Bet type name
        bet_type: String,
        /// Digit count of the line
        digits: usize,
    },

    /// The bet type is not played in the station's region
    #[error("Bet type '{bet_type}' is not available in region {region}")]
    BetTypeRegionMismatch {
        /// Bet type name
        bet_type: String,
        /// Region of the resolved station
        region: RegionCode,
    },

    /// A bridge bet with fewer than two numbers
    #[error("Bet type '{bet_type}' needs at least 2 numbers, got {count}")]
    InsufficientNumbersForBridge {
        /// Bet type name
        bet_type: String,
        /// Numbers on the line
        count: usize,
    },

    /// A kéo sequence whose step is not positive or whose end precedes its start
    #[error("Invalid stepped sequence {start}/{next} to {end}")]
    InvalidStepSequence {
        start: String,
        next: String,
        end: String,
    },

    /// A letter token that is not a bet-type alias
    #[error("Unrecognized bet type '{token}'")]
    UnrecognizedBetType {
        /// The token as typed (folded)
        token: String,
    },

    /// Numbers without any bet type
    #[error("Missing bet type in '{line}'")]
    MissingBetType {
        /// The line text
        line: String,
    },

    /// A bet type not followed by an amount
    #[error("Missing amount for bet type '{bet_type}'")]
    MissingAmount {
        /// Alias as typed
        bet_type: String,
    },

    /// An amount that does not parse as a positive decimal
    #[error("Invalid amount '{amount}'")]
    InvalidAmount {
        /// Amount text
        amount: String,
    },

    /// A line holding several number groups, each with its own bet types
    #[error("Line '{line}' holds {count} separate bet groups")]
    MultipleBetGroups {
        /// The line text
        line: String,
        /// Number of groups found
        count: usize,
    },

    /// A bet line without numbers
    #[error("No numbers in '{line}'")]
    EmptyNumbers {
        /// The line text
        line: String,
    },
}

impl BetCodeError {
    /// Whether the error only informs the user (the input is incomplete, not wrong)
    pub fn is_informational(&self) -> bool {
        matches!(self, BetCodeError::StationOnlyNoBetInfo { .. })
    }

    /// Create a StationNotFound error
    pub fn station_not_found(selector: &str) -> Self {
        BetCodeError::StationNotFound {
            selector: selector.to_string(),
        }
    }

    /// Create an InconsistentDigitLength error
    pub fn inconsistent_digit_length(expected: usize, number: &str) -> Self {
        BetCodeError::InconsistentDigitLength {
            expected,
            found: number.len(),
            number: number.to_string(),
        }
    }

    /// Create a BetTypeDigitMismatch error
    pub fn digit_mismatch(bet_type: &str, digits: usize) -> Self {
        BetCodeError::BetTypeDigitMismatch {
            bet_type: bet_type.to_string(),
            digits,
        }
    }

    /// Create a BetTypeRegionMismatch error
    pub fn region_mismatch(bet_type: &str, region: RegionCode) -> Self {
        BetCodeError::BetTypeRegionMismatch {
            bet_type: bet_type.to_string(),
            region,
        }
    }

    /// Create an InsufficientNumbersForBridge error
    pub fn insufficient_for_bridge(bet_type: &str, count: usize) -> Self {
        BetCodeError::InsufficientNumbersForBridge {
            bet_type: bet_type.to_string(),
            count,
        }
    }

    /// Create an InvalidStepSequence error
    pub fn invalid_step(start: &str, next: &str, end: &str) -> Self {
        BetCodeError::InvalidStepSequence {
            start: start.to_string(),
            next: next.to_string(),
            end: end.to_string(),
        }
    }

    /// Create an UnrecognizedBetType error
    pub fn unrecognized_bet_type(token: &str) -> Self {
        BetCodeError::UnrecognizedBetType {
            token: token.to_string(),
        }
    }

    /// Create a MissingAmount error
    pub fn missing_amount(bet_type: &str) -> Self {
        BetCodeError::MissingAmount {
            bet_type: bet_type.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str) -> Self {
        BetCodeError::InvalidAmount {
            amount: amount.to_string(),
        }
    }
}

/// Error raised while loading or resolving a configuration snapshot
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The snapshot file could not be read
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON for the expected shape
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two bet types share an alias
    #[error("Alias '{alias}' is used by both '{first}' and '{second}'")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    /// A number-combination entry with a name the engine does not know
    #[error("Unknown number combination '{name}'")]
    UnknownCombination { name: String },

    /// A bet type with an empty alias list or digit rule set
    #[error("Bet type '{bet_type}' is incomplete: {reason}")]
    IncompleteBetType { bet_type: String, reason: String },

    /// A commission rate that is negative
    #[error("Invalid commission rate '{field}': {value}")]
    InvalidCommission {
        field: &'static str,
        value: rust_decimal::Decimal,
    },
}

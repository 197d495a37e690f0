//! Parsed bet-code types
//!
//! This module defines the structured form of a bet code: the resolved
//! station selector, the bet lines under it, and the ticket that groups them.

use crate::types::config::{RegionCode, Station};
use crate::types::error::BetCodeError;
use crate::types::rule::{BetClass, BetRule, BridgeClass};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Resolved station selector
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedStation {
    /// One station
    Single(Station),
    /// The region's main draw ("all stations, region R"), counted as one station
    Region(RegionCode),
    /// An explicit list of stations
    List(Vec<Station>),
    /// The first `count` stations drawing in `region` on the draw day
    Counted { region: RegionCode, count: u32 },
}

impl ParsedStation {
    /// Number of stations the bet is placed on
    pub fn station_count(&self) -> u32 {
        match self {
            ParsedStation::Single(_) | ParsedStation::Region(_) => 1,
            ParsedStation::List(stations) => stations.len() as u32,
            ParsedStation::Counted { count, .. } => *count,
        }
    }

    /// Distinct regions covered, in region order
    pub fn regions(&self) -> Vec<RegionCode> {
        let mut regions: Vec<RegionCode> = match self {
            ParsedStation::Single(station) => vec![station.region],
            ParsedStation::Region(region) | ParsedStation::Counted { region, .. } => {
                vec![*region]
            }
            ParsedStation::List(stations) => stations.iter().map(|s| s.region).collect(),
        };
        regions.sort();
        regions.dedup();
        regions
    }

    /// Region used for combination lookups (the first covered region)
    pub fn primary_region(&self) -> Option<RegionCode> {
        self.regions().first().copied()
    }

    /// Bridge payout class for bets on this selector
    pub fn bridge_class(&self) -> BridgeClass {
        BridgeClass::for_stations(
            self.station_count(),
            self.regions().contains(&RegionCode::North),
        )
    }
}

/// One bet type and stake applied to the numbers of a line
#[derive(Debug, Clone, PartialEq)]
pub struct BetPart {
    pub rule: BetRule,
    /// Alias as typed (folded)
    pub alias: String,
    /// Stake per unit, in thousands
    pub amount: Decimal,
    /// Rule flag, or alias in the permutation family
    pub is_permutation: bool,
}

impl BetPart {
    /// Calculation family, promoting default rules typed with a permutation alias
    pub fn class(&self) -> BetClass {
        match self.rule.class {
            BetClass::Default if self.is_permutation => BetClass::Permutation,
            class => class,
        }
    }
}

/// One parsed bet line
#[derive(Debug, Clone, PartialEq)]
pub struct BetLine {
    /// Canonical text the line was parsed from
    pub source: String,
    /// Ordered, deduplicated numbers of equal length
    pub numbers: Vec<String>,
    /// First bet type on the line
    pub primary: Option<BetPart>,
    /// Further bet types sharing the same numbers
    pub additional: Vec<BetPart>,
    pub is_permutation: bool,
    /// Distinct sorted permutations per number, filled when any part permutes
    pub permutations: BTreeMap<String, Vec<String>>,
    pub is_valid: bool,
    pub error: Option<BetCodeError>,
}

impl BetLine {
    /// An invalid line carrying `error`
    pub fn invalid(source: &str, error: BetCodeError) -> Self {
        BetLine {
            source: source.to_string(),
            numbers: Vec::new(),
            primary: None,
            additional: Vec::new(),
            is_permutation: false,
            permutations: BTreeMap::new(),
            is_valid: false,
            error: Some(error),
        }
    }

    /// Digit count shared by every number
    pub fn digit_length(&self) -> usize {
        self.numbers.first().map(String::len).unwrap_or(0)
    }

    /// Primary part followed by the additional parts
    pub fn parts(&self) -> impl Iterator<Item = &BetPart> {
        self.primary.iter().chain(self.additional.iter())
    }

    /// Total number of distinct permutations over all numbers
    pub fn total_permutations(&self) -> usize {
        self.numbers
            .iter()
            .map(|n| self.permutations.get(n).map(Vec::len).unwrap_or(1))
            .sum()
    }
}

/// An error tied to a line of the canonical input
#[derive(Debug, Clone, PartialEq)]
pub struct LineIssue {
    /// 1-based line number in the canonical text
    pub line: usize,
    pub error: BetCodeError,
}

/// A fully parsed bet code (one station block)
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBetCode {
    pub station: Option<ParsedStation>,
    pub lines: Vec<BetLine>,
    pub success: bool,
    /// Every problem found, so the user can fix them in one pass
    pub errors: Vec<LineIssue>,
}

impl ParsedBetCode {
    /// First error, if any
    pub fn error(&self) -> Option<&BetCodeError> {
        self.errors.first().map(|issue| &issue.error)
    }

    /// Lines that passed validation
    pub fn valid_lines(&self) -> impl Iterator<Item = &BetLine> {
        self.lines.iter().filter(|line| line.is_valid)
    }
}

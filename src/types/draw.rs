//! Draw results, confirmed bet entries and reconciliation outcomes

use crate::types::bet::ParsedStation;
use crate::types::config::{RegionCode, StationId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prize tier of an official draw, in result order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrizeTier {
    #[serde(rename = "special_prize")]
    Special,
    #[serde(rename = "first_prize")]
    First,
    #[serde(rename = "second_prize")]
    Second,
    #[serde(rename = "third_prize")]
    Third,
    #[serde(rename = "fourth_prize")]
    Fourth,
    #[serde(rename = "fifth_prize")]
    Fifth,
    #[serde(rename = "sixth_prize")]
    Sixth,
    #[serde(rename = "seventh_prize")]
    Seventh,
    #[serde(rename = "eighth_prize")]
    Eighth,
}

impl PrizeTier {
    /// Every tier in result order
    pub const ALL: [PrizeTier; 9] = [
        PrizeTier::Special,
        PrizeTier::First,
        PrizeTier::Second,
        PrizeTier::Third,
        PrizeTier::Fourth,
        PrizeTier::Fifth,
        PrizeTier::Sixth,
        PrizeTier::Seventh,
        PrizeTier::Eighth,
    ];

    /// Position in [`LotteryResult::tiers`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Label used in outcomes and CSV files
    pub fn label(&self) -> &'static str {
        match self {
            PrizeTier::Special => "special_prize",
            PrizeTier::First => "first_prize",
            PrizeTier::Second => "second_prize",
            PrizeTier::Third => "third_prize",
            PrizeTier::Fourth => "fourth_prize",
            PrizeTier::Fifth => "fifth_prize",
            PrizeTier::Sixth => "sixth_prize",
            PrizeTier::Seventh => "seventh_prize",
            PrizeTier::Eighth => "eighth_prize",
        }
    }

    /// Parse a tier label
    pub fn from_label(label: &str) -> Option<Self> {
        PrizeTier::ALL
            .into_iter()
            .find(|tier| tier.label() == label.trim().to_lowercase())
    }
}

impl fmt::Display for PrizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Official result of one station's draw
///
/// `tiers` holds the special prize followed by the first to eighth prizes.
/// Northern draws have no eighth prize and leave that slot empty.
#[derive(Debug, Clone, PartialEq)]
pub struct LotteryResult {
    pub station_id: StationId,
    pub draw_date: NaiveDate,
    pub tiers: [Vec<String>; 9],
}

impl LotteryResult {
    /// Empty result for a station and date
    pub fn new(station_id: StationId, draw_date: NaiveDate) -> Self {
        Self {
            station_id,
            draw_date,
            tiers: Default::default(),
        }
    }

    /// Numbers of one tier
    pub fn tier(&self, tier: PrizeTier) -> &[String] {
        &self.tiers[tier.index()]
    }

    /// Builder-style setter used by loaders and tests
    pub fn with_tier(mut self, tier: PrizeTier, numbers: &[&str]) -> Self {
        self.tiers[tier.index()] = numbers.iter().map(|n| n.to_string()).collect();
        self
    }
}

/// Stations a confirmed bet targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationTarget {
    Single(StationId),
    /// Main draw of the region on the draw day
    Region(RegionCode),
    List(Vec<StationId>),
    Counted { region: RegionCode, count: u32 },
}

impl From<&ParsedStation> for StationTarget {
    fn from(station: &ParsedStation) -> Self {
        match station {
            ParsedStation::Single(station) => StationTarget::Single(station.id),
            ParsedStation::Region(region) => StationTarget::Region(*region),
            ParsedStation::List(stations) => {
                StationTarget::List(stations.iter().map(|s| s.id).collect())
            }
            ParsedStation::Counted { region, count } => StationTarget::Counted {
                region: *region,
                count: *count,
            },
        }
    }
}

/// A confirmed bet handed to reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct BetEntry {
    pub id: u64,
    pub draw_date: NaiveDate,
    pub target: StationTarget,
    /// Bet-type alias (folded)
    pub bet_type: String,
    pub numbers: Vec<String>,
    /// Stake per unit, in thousands
    pub amount: Decimal,
}

/// Result of reconciling one bet entry against one draw date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationOutcome {
    pub bet_entry_id: u64,
    pub is_winning: bool,
    pub matched_numbers: Vec<String>,
    pub matched_prize_levels: Vec<String>,
    pub win_amount: Decimal,
}

impl ReconciliationOutcome {
    /// A non-winning outcome
    pub fn losing(bet_entry_id: u64) -> Self {
        Self {
            bet_entry_id,
            is_winning: false,
            matched_numbers: Vec::new(),
            matched_prize_levels: Vec::new(),
            win_amount: Decimal::ZERO,
        }
    }
}

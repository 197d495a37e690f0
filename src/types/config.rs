//! Configuration snapshot types
//!
//! These types mirror the configuration handed to the engine by the caller:
//! bet types, regions, stations, number-combination keywords, commission
//! settings, station schedules and alias-priority rules. They are plain serde
//! structures; [`crate::core::Catalog`] resolves them into lookup tables.

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Station identifier
pub type StationId = u32;

/// Bet type identifier
pub type BetTypeId = u32;

/// Lottery region (miền)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionCode {
    North,
    Central,
    South,
}

impl RegionCode {
    /// Key used in combination tables and log output
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionCode::North => "north",
            RegionCode::Central => "central",
            RegionCode::South => "south",
        }
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payout rate of a bet type
///
/// Either a single multiplier, or a table keyed by `"<n> digits"` or by
/// bridge class (`single_station`, `two_station`, `north`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayoutRate {
    Scalar(Decimal),
    Table(BTreeMap<String, Decimal>),
}

impl Default for PayoutRate {
    fn default() -> Self {
        PayoutRate::Table(BTreeMap::new())
    }
}

/// One entry of a combination table
///
/// A region key may map straight to a count or to a digit-keyed sub-table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CombinationValue {
    Count(u32),
    ByDigits(BTreeMap<String, u32>),
}

/// Special calculation tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialCalc {
    #[default]
    #[serde(rename = "none")]
    Standard,
    Bridge,
}

/// How a confirmed bet is matched against draw results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Head tier and special tier
    HeadTail,
    /// Head tier only
    Head,
    /// Special tier only
    Tail,
    /// All eight tiers
    CoverAll,
    /// Special, fifth, sixth, seventh and eighth tiers (south/central)
    #[serde(rename = "cover_all_7")]
    CoverAll7,
    /// Special, sixth and seventh tiers (north)
    #[serde(rename = "cover_all_8")]
    CoverAll8,
    /// First tier only (north)
    FirstPrize,
    /// Two or more numbers hitting together
    Bridge,
    /// Exact suffix match against all tiers
    Exact,
}

/// Bet type as configured by the operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetTypeConfig {
    pub id: BetTypeId,
    pub name: String,
    pub aliases: Vec<String>,
    pub digit_rules: Vec<usize>,
    pub applicable_regions: Vec<RegionCode>,
    #[serde(default)]
    pub payout_rate: PayoutRate,
    #[serde(default)]
    pub is_permutation: bool,
    #[serde(default)]
    pub special_calc: SpecialCalc,
    #[serde(default)]
    pub combinations: BTreeMap<String, CombinationValue>,
    /// Overrides the match rule inferred from the aliases
    #[serde(default)]
    pub match_rule: Option<MatchRule>,
}

/// Region as configured by the operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub code: RegionCode,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

fn default_active() -> bool {
    true
}

/// A single lottery draw location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub region: RegionCode,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Number-combination keyword (tài, xỉu, chẵn, lẻ, …)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberCombinationConfig {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Commission rates applied to stakes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionSettings {
    /// Rate applied to every stake (1 = no commission)
    pub price_rate: Decimal,
    pub export_price_rate: Decimal,
    pub return_price_rate: Decimal,
}

impl Default for CommissionSettings {
    fn default() -> Self {
        Self {
            price_rate: Decimal::ONE,
            export_price_rate: Decimal::ONE,
            return_price_rate: Decimal::ONE,
        }
    }
}

/// Day of a station schedule entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    Daily,
}

impl ScheduleDay {
    /// Whether this entry is the given weekday (daily entries never match)
    pub fn is(&self, weekday: Weekday) -> bool {
        matches!(
            (self, weekday),
            (ScheduleDay::Monday, Weekday::Mon)
                | (ScheduleDay::Tuesday, Weekday::Tue)
                | (ScheduleDay::Wednesday, Weekday::Wed)
                | (ScheduleDay::Thursday, Weekday::Thu)
                | (ScheduleDay::Friday, Weekday::Fri)
                | (ScheduleDay::Saturday, Weekday::Sat)
                | (ScheduleDay::Sunday, Weekday::Sun)
        )
    }
}

/// Weekly draw schedule entry for a station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSchedule {
    pub station_id: StationId,
    pub day_of_week: ScheduleDay,
    pub order_number: u32,
}

/// Explicit tie-break for an alias shared by several stations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasPriority {
    pub alias: String,
    pub station_id: StationId,
    /// Weekdays the rule applies to; empty means every day
    #[serde(default)]
    pub days: Vec<ScheduleDay>,
}

/// Immutable configuration supplied by the caller for one parse/reconcile chain
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigSnapshot {
    pub bet_types: Vec<BetTypeConfig>,
    pub regions: Vec<RegionConfig>,
    pub accessible_stations: Vec<Station>,
    pub number_combinations: Vec<NumberCombinationConfig>,
    pub commission_settings: CommissionSettings,
    pub station_schedules: Vec<StationSchedule>,
    pub alias_priorities: Vec<AliasPriority>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_deserialize_bet_type_with_table_rate() {
        let json = r#"{
            "id": 1,
            "name": "Bao lo",
            "aliases": ["b", "bao"],
            "digit_rules": [2, 3, 4],
            "applicable_regions": ["north", "south"],
            "payout_rate": {"2 digits": 75, "3 digits": 650},
            "combinations": {"north": {"2": 27, "3": 23}, "south": 18}
        }"#;

        let bet_type: BetTypeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(bet_type.aliases, vec!["b", "bao"]);
        assert_eq!(bet_type.special_calc, SpecialCalc::Standard);
        assert!(!bet_type.is_permutation);
        assert!(matches!(bet_type.payout_rate, PayoutRate::Table(ref t) if t.len() == 2));
        assert_eq!(
            bet_type.combinations.get("south"),
            Some(&CombinationValue::Count(18))
        );
        assert!(matches!(
            bet_type.combinations.get("north"),
            Some(CombinationValue::ByDigits(_))
        ));
    }

    #[test]
    fn test_deserialize_scalar_rate_and_bridge() {
        let json = r#"{
            "id": 2,
            "name": "Da",
            "aliases": ["da"],
            "digit_rules": [2],
            "applicable_regions": ["south"],
            "payout_rate": 750,
            "special_calc": "bridge",
            "match_rule": "bridge"
        }"#;

        let bet_type: BetTypeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(bet_type.payout_rate, PayoutRate::Scalar(Decimal::new(750, 0)));
        assert_eq!(bet_type.special_calc, SpecialCalc::Bridge);
        assert_eq!(bet_type.match_rule, Some(MatchRule::Bridge));
    }

    #[test]
    fn test_commission_defaults_to_one() {
        let snapshot: ConfigSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot.commission_settings.price_rate, Decimal::ONE);
        assert!(snapshot.bet_types.is_empty());
    }

    #[test]
    fn test_station_active_by_default() {
        let station: Station =
            serde_json::from_str(r#"{"id": 7, "name": "Vinh Long", "region": "south"}"#).unwrap();
        assert!(station.is_active);
        assert!(station.aliases.is_empty());
    }

    #[rstest]
    #[case(ScheduleDay::Monday, Weekday::Mon, true)]
    #[case(ScheduleDay::Sunday, Weekday::Sun, true)]
    #[case(ScheduleDay::Monday, Weekday::Tue, false)]
    #[case(ScheduleDay::Daily, Weekday::Wed, false)]
    fn test_schedule_day_matches_weekday(
        #[case] day: ScheduleDay,
        #[case] weekday: Weekday,
        #[case] expected: bool,
    ) {
        assert_eq!(day.is(weekday), expected);
    }

    #[test]
    fn test_match_rule_names() {
        let rule: MatchRule = serde_json::from_str(r#""cover_all_7""#).unwrap();
        assert_eq!(rule, MatchRule::CoverAll7);
        let rule: MatchRule = serde_json::from_str(r#""head_tail""#).unwrap();
        assert_eq!(rule, MatchRule::HeadTail);
    }
}

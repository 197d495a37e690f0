//! Resolved bet-type rules
//!
//! A [`BetRule`] is a configured bet type after resolution: its class is a
//! closed set of variants, its digit and region sets are ordered sets, and
//! its payout and combination tables answer lookups with documented
//! fallbacks.

use crate::types::config::{
    BetTypeId, CombinationValue, MatchRule, PayoutRate, RegionCode,
};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// Calculation family of a bet type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BetClass {
    /// One stake per number
    Default,
    /// Pairs of numbers (đá)
    Bridge,
    /// One stake per distinct digit permutation (đảo)
    Permutation,
}

/// Payout class of a bridge bet, chosen from station count and region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BridgeClass {
    SingleStation,
    TwoStation,
    North,
}

impl BridgeClass {
    /// Pick the class for a bet spanning `station_count` stations
    pub fn for_stations(station_count: u32, includes_north: bool) -> Self {
        if includes_north {
            BridgeClass::North
        } else if station_count <= 1 {
            BridgeClass::SingleStation
        } else {
            BridgeClass::TwoStation
        }
    }

    /// Key in a bridge payout table
    pub fn key(&self) -> &'static str {
        match self {
            BridgeClass::SingleStation => "single_station",
            BridgeClass::TwoStation => "two_station",
            BridgeClass::North => "north",
        }
    }

    fn fallback_rate(&self) -> Decimal {
        match self {
            BridgeClass::SingleStation => Decimal::new(750, 0),
            BridgeClass::TwoStation => Decimal::new(550, 0),
            BridgeClass::North => Decimal::new(650, 0),
        }
    }
}

/// Payout rate used when a digit-keyed table has no entry for the length
fn fallback_digit_rate(digits: usize) -> Decimal {
    match digits {
        3 => Decimal::new(650, 0),
        4 => Decimal::new(5500, 0),
        _ => Decimal::new(75, 0),
    }
}

/// Payout rate with the key it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRate {
    pub rate: Decimal,
    /// Table key, `"scalar"`, or `"default"` when a fallback was used
    pub source: String,
}

/// A bet type resolved from the configuration snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct BetRule {
    pub id: BetTypeId,
    pub name: String,
    /// Folded aliases
    pub aliases: Vec<String>,
    pub class: BetClass,
    pub is_permutation: bool,
    pub digit_rules: BTreeSet<usize>,
    pub regions: BTreeSet<RegionCode>,
    pub payout: PayoutRate,
    pub combinations: BTreeMap<String, CombinationValue>,
    pub match_rule: MatchRule,
}

impl BetRule {
    /// Whether numbers of `digits` length may be played
    pub fn accepts_digits(&self, digits: usize) -> bool {
        self.digit_rules.contains(&digits)
    }

    /// Whether the bet type is played in `region`
    pub fn accepts_region(&self, region: RegionCode) -> bool {
        self.regions.contains(&region)
    }

    /// Payout rate for a `digits`-long number
    pub fn payout_for_digits(&self, digits: usize) -> ResolvedRate {
        match &self.payout {
            PayoutRate::Scalar(rate) => ResolvedRate {
                rate: *rate,
                source: "scalar".to_string(),
            },
            PayoutRate::Table(table) => {
                let key = format!("{} digits", digits);
                match table.get(&key) {
                    Some(rate) => ResolvedRate { rate: *rate, source: key },
                    None => ResolvedRate {
                        rate: fallback_digit_rate(digits),
                        source: "default".to_string(),
                    },
                }
            }
        }
    }

    /// Payout rate of a bridge bet for the given class
    pub fn payout_for_bridge(&self, class: BridgeClass) -> ResolvedRate {
        match &self.payout {
            PayoutRate::Scalar(rate) => ResolvedRate {
                rate: *rate,
                source: "scalar".to_string(),
            },
            PayoutRate::Table(table) => match table.get(class.key()) {
                Some(rate) => ResolvedRate {
                    rate: *rate,
                    source: class.key().to_string(),
                },
                None => ResolvedRate {
                    rate: class.fallback_rate(),
                    source: "default".to_string(),
                },
            },
        }
    }

    /// Number of physical variants one entry covers
    ///
    /// Looks up the region key first (a count, or a digit-keyed sub-table),
    /// then a top-level digit key, and defaults to 1.
    pub fn combination_multiplier(&self, region: RegionCode, digits: usize) -> u32 {
        let digit_key = digits.to_string();
        let by_region = match self.combinations.get(region.as_str()) {
            Some(CombinationValue::Count(count)) => Some(*count),
            Some(CombinationValue::ByDigits(table)) => table.get(&digit_key).copied(),
            None => None,
        };

        by_region
            .or_else(|| match self.combinations.get(&digit_key) {
                Some(CombinationValue::Count(count)) => Some(*count),
                _ => None,
            })
            .unwrap_or(1)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::rule;
    use super::*;
    use rstest::rstest;

    fn table(entries: &[(&str, i64)]) -> PayoutRate {
        PayoutRate::Table(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), Decimal::new(*v, 0)))
                .collect(),
        )
    }

    #[rstest]
    #[case::present(2, 80, "2 digits")]
    #[case::present_three(3, 700, "3 digits")]
    #[case::fallback_four(4, 5500, "default")]
    fn test_payout_for_digits_table(
        #[case] digits: usize,
        #[case] expected: i64,
        #[case] source: &str,
    ) {
        let mut bet = rule("Bao", "b", BetClass::Default, &[2, 3, 4], 0);
        bet.payout = table(&[("2 digits", 80), ("3 digits", 700)]);

        let resolved = bet.payout_for_digits(digits);
        assert_eq!(resolved.rate, Decimal::new(expected, 0));
        assert_eq!(resolved.source, source);
    }

    #[rstest]
    #[case(2, 75)]
    #[case(3, 650)]
    #[case(4, 5500)]
    fn test_payout_fallbacks(#[case] digits: usize, #[case] expected: i64) {
        let mut bet = rule("Bao", "b", BetClass::Default, &[2, 3, 4], 0);
        bet.payout = PayoutRate::default();
        assert_eq!(bet.payout_for_digits(digits).rate, Decimal::new(expected, 0));
    }

    #[test]
    fn test_scalar_payout_ignores_digits() {
        let bet = rule("Dau duoi", "dd", BetClass::Default, &[2], 75);
        assert_eq!(bet.payout_for_digits(3).rate, Decimal::new(75, 0));
        assert_eq!(bet.payout_for_digits(3).source, "scalar");
    }

    #[rstest]
    #[case(BridgeClass::SingleStation, 760)]
    #[case(BridgeClass::TwoStation, 550)]
    #[case(BridgeClass::North, 650)]
    fn test_bridge_payout(#[case] class: BridgeClass, #[case] expected: i64) {
        let mut bet = rule("Da", "da", BetClass::Bridge, &[2], 0);
        bet.payout = table(&[("single_station", 760)]);
        assert_eq!(bet.payout_for_bridge(class).rate, Decimal::new(expected, 0));
    }

    #[rstest]
    #[case(1, false, BridgeClass::SingleStation)]
    #[case(2, false, BridgeClass::TwoStation)]
    #[case(1, true, BridgeClass::North)]
    #[case(3, true, BridgeClass::North)]
    fn test_bridge_class_selection(
        #[case] count: u32,
        #[case] north: bool,
        #[case] expected: BridgeClass,
    ) {
        assert_eq!(BridgeClass::for_stations(count, north), expected);
    }

    #[test]
    fn test_combination_multiplier_lookup_order() {
        let mut bet = rule("Bao", "b", BetClass::Default, &[2, 3], 75);
        bet.combinations.insert(
            "north".to_string(),
            CombinationValue::ByDigits(
                [("2".to_string(), 27), ("3".to_string(), 23)].into_iter().collect(),
            ),
        );
        bet.combinations
            .insert("south".to_string(), CombinationValue::Count(18));
        bet.combinations
            .insert("3".to_string(), CombinationValue::Count(17));

        assert_eq!(bet.combination_multiplier(RegionCode::North, 2), 27);
        assert_eq!(bet.combination_multiplier(RegionCode::North, 3), 23);
        assert_eq!(bet.combination_multiplier(RegionCode::South, 3), 18);
        assert_eq!(bet.combination_multiplier(RegionCode::Central, 3), 17);
        assert_eq!(bet.combination_multiplier(RegionCode::Central, 2), 1);
    }

    #[test]
    fn test_accepts_digits_and_region() {
        let mut bet = rule("Bao 7 lo", "b7l", BetClass::Default, &[2], 75);
        bet.regions = [RegionCode::South].into_iter().collect();
        assert!(bet.accepts_digits(2));
        assert!(!bet.accepts_digits(3));
        assert!(bet.accepts_region(RegionCode::South));
        assert!(!bet.accepts_region(RegionCode::North));
    }
}

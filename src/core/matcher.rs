//! Prize-tier matching against one draw result
//!
//! A bet number matches a prize number when the prize number ends with it.
//! Which tiers are searched depends on the bet type's [`MatchRule`], the
//! station's region and the number's digit length.

use crate::types::{LotteryResult, MatchRule, PrizeTier, RegionCode};

/// Tiers covered by the "bao 7 lo" family outside the north
const COVER_ALL_7: [PrizeTier; 5] = [
    PrizeTier::Special,
    PrizeTier::Fifth,
    PrizeTier::Sixth,
    PrizeTier::Seventh,
    PrizeTier::Eighth,
];

/// Tiers covered by the "bao 8 lo" family in the north
const COVER_ALL_8: [PrizeTier; 3] = [PrizeTier::Special, PrizeTier::Sixth, PrizeTier::Seventh];

/// Head tier for a digit length: the lowest tier whose numbers have that length
pub fn head_tier(region: RegionCode, digits: usize) -> Option<PrizeTier> {
    match (region, digits) {
        (RegionCode::North, 2) => Some(PrizeTier::Seventh),
        (_, 2) => Some(PrizeTier::Eighth),
        (RegionCode::North, 3) => Some(PrizeTier::Sixth),
        (_, 3) => Some(PrizeTier::Seventh),
        _ => None,
    }
}

/// Tiers searched for a number of `digits` digits on a station of `region`
///
/// Rules that do not apply to the region (`CoverAll7` in the north,
/// `CoverAll8` and `FirstPrize` outside it) search nothing.
pub fn tiers_for(rule: MatchRule, region: RegionCode, digits: usize) -> Vec<PrizeTier> {
    let north = region == RegionCode::North;
    match rule {
        MatchRule::HeadTail => head_tier(region, digits)
            .into_iter()
            .chain(std::iter::once(PrizeTier::Special))
            .collect(),
        MatchRule::Head => head_tier(region, digits).into_iter().collect(),
        MatchRule::Tail => vec![PrizeTier::Special],
        MatchRule::CoverAll | MatchRule::Bridge | MatchRule::Exact => PrizeTier::ALL.to_vec(),
        MatchRule::CoverAll7 if !north => COVER_ALL_7.to_vec(),
        MatchRule::CoverAll8 if north => COVER_ALL_8.to_vec(),
        MatchRule::FirstPrize if north => vec![PrizeTier::First],
        MatchRule::CoverAll7 | MatchRule::CoverAll8 | MatchRule::FirstPrize => Vec::new(),
    }
}

/// Occurrences of a number in one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierHit {
    pub tier: PrizeTier,
    pub count: usize,
}

/// Whether a prize number ends with the bet number
pub fn is_match(prize: &str, number: &str) -> bool {
    !number.is_empty() && prize.trim().ends_with(number)
}

/// Hits of `number` in the given tiers of a result, in tier order
///
/// Every prize number ending with `number` counts once, so a number drawn
/// twice in a tier is paid twice.
pub fn find_hits(result: &LotteryResult, tiers: &[PrizeTier], number: &str) -> Vec<TierHit> {
    tiers
        .iter()
        .filter_map(|&tier| {
            let count = result
                .tier(tier)
                .iter()
                .filter(|prize| is_match(prize, number))
                .count();
            (count > 0).then_some(TierHit { tier, count })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn south_result() -> LotteryResult {
        LotteryResult::new(2, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
            .with_tier(PrizeTier::Special, &["123456"])
            .with_tier(PrizeTier::First, &["45678"])
            .with_tier(PrizeTier::Fourth, &["11156", "22256", "33399"])
            .with_tier(PrizeTier::Seventh, &["456"])
            .with_tier(PrizeTier::Eighth, &["56"])
    }

    #[rstest]
    #[case(RegionCode::North, 2, Some(PrizeTier::Seventh))]
    #[case(RegionCode::South, 2, Some(PrizeTier::Eighth))]
    #[case(RegionCode::Central, 2, Some(PrizeTier::Eighth))]
    #[case(RegionCode::North, 3, Some(PrizeTier::Sixth))]
    #[case(RegionCode::South, 3, Some(PrizeTier::Seventh))]
    #[case(RegionCode::South, 4, None)]
    fn test_head_tier(
        #[case] region: RegionCode,
        #[case] digits: usize,
        #[case] expected: Option<PrizeTier>,
    ) {
        assert_eq!(head_tier(region, digits), expected);
    }

    #[rstest]
    #[case(MatchRule::HeadTail, RegionCode::South, 2, vec![PrizeTier::Eighth, PrizeTier::Special])]
    #[case(MatchRule::HeadTail, RegionCode::South, 4, vec![PrizeTier::Special])]
    #[case(MatchRule::Head, RegionCode::North, 3, vec![PrizeTier::Sixth])]
    #[case(MatchRule::Tail, RegionCode::North, 2, vec![PrizeTier::Special])]
    #[case(MatchRule::CoverAll8, RegionCode::North, 2, COVER_ALL_8.to_vec())]
    #[case(MatchRule::CoverAll8, RegionCode::South, 2, vec![])]
    #[case(MatchRule::CoverAll7, RegionCode::Central, 2, COVER_ALL_7.to_vec())]
    #[case(MatchRule::CoverAll7, RegionCode::North, 2, vec![])]
    #[case(MatchRule::FirstPrize, RegionCode::North, 2, vec![PrizeTier::First])]
    #[case(MatchRule::FirstPrize, RegionCode::South, 2, vec![])]
    fn test_tiers_for(
        #[case] rule: MatchRule,
        #[case] region: RegionCode,
        #[case] digits: usize,
        #[case] expected: Vec<PrizeTier>,
    ) {
        assert_eq!(tiers_for(rule, region, digits), expected);
    }

    #[test]
    fn test_cover_all_searches_every_tier() {
        assert_eq!(
            tiers_for(MatchRule::CoverAll, RegionCode::South, 2),
            PrizeTier::ALL.to_vec()
        );
    }

    #[test]
    fn test_find_hits_counts_each_prize() {
        let hits = find_hits(&south_result(), &PrizeTier::ALL, "56");
        assert_eq!(
            hits,
            vec![
                TierHit { tier: PrizeTier::Special, count: 1 },
                TierHit { tier: PrizeTier::Fourth, count: 2 },
                TierHit { tier: PrizeTier::Seventh, count: 1 },
                TierHit { tier: PrizeTier::Eighth, count: 1 },
            ]
        );
    }

    #[test]
    fn test_find_hits_limited_to_tiers() {
        let tiers = tiers_for(MatchRule::HeadTail, RegionCode::South, 2);
        let hits = find_hits(&south_result(), &tiers, "56");
        assert_eq!(hits.len(), 2);
        assert!(find_hits(&south_result(), &tiers, "99").is_empty());
    }

    #[rstest]
    #[case("123456", "56", true)]
    #[case("123456", "456", true)]
    #[case("56", "456", false)]
    #[case("123456", "", false)]
    fn test_is_match(#[case] prize: &str, #[case] number: &str, #[case] expected: bool) {
        assert_eq!(is_match(prize, number), expected);
    }
}

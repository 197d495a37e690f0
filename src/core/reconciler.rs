//! Reconciliation of confirmed bets against official results
//!
//! For every entry the target is resolved into concrete stations for the
//! draw date, each station with a result is searched with the bet type's
//! match rule, and the winnings are summed into one
//! [`ReconciliationOutcome`].
//!
//! # Payouts
//!
//! - Non-bridge: `amount × rate(digits) × hits` per station, where every
//!   prize number ending with the bet number is one hit. Permutation bets
//!   use the first permutation (in sorted order) that hits.
//! - Bridge: all numbers are searched across every tier of every station.
//!   Two or more distinct matches win `base × (matches − 1)` plus a bonus of
//!   `(maxDup − 1) × 0.5 × base` when one number hit more than once.

use crate::core::catalog::Catalog;
use crate::core::matcher::{find_hits, is_match, tiers_for};
use crate::core::permutations::permutations;
use crate::core::rules::is_permutation_alias;
use crate::core::traits::ResultStore;
use crate::types::{
    BetClass, BetEntry, BetRule, BridgeClass, LotteryResult, MatchRule, PrizeTier, RegionCode,
    ReconciliationOutcome, ScheduleDay, Station, StationId, StationTarget,
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Stations of `region` drawing on `draw_date`, in draw order
///
/// Stations scheduled on the weekday come first by `order_number`; stations
/// scheduled `daily` follow, also by `order_number`. Inactive stations and
/// stations of other regions are skipped.
pub fn scheduled_stations<'c>(
    region: RegionCode,
    draw_date: NaiveDate,
    catalog: &'c Catalog,
) -> Vec<&'c Station> {
    let weekday = draw_date.weekday();
    let in_region = |station_id: StationId| {
        catalog
            .station(station_id)
            .filter(|station| station.region == region && station.is_active)
    };

    let mut on_day: Vec<_> = catalog
        .schedules()
        .iter()
        .filter(|schedule| schedule.day_of_week.is(weekday))
        .collect();
    on_day.sort_by_key(|schedule| schedule.order_number);
    let mut daily: Vec<_> = catalog
        .schedules()
        .iter()
        .filter(|schedule| schedule.day_of_week == ScheduleDay::Daily)
        .collect();
    daily.sort_by_key(|schedule| schedule.order_number);

    let mut stations: Vec<&Station> = Vec::new();
    for schedule in on_day.into_iter().chain(daily) {
        if let Some(station) = in_region(schedule.station_id) {
            if !stations.iter().any(|s| s.id == station.id) {
                stations.push(station);
            }
        }
    }
    stations
}

/// Concrete stations a bet targets on its draw date
///
/// Unknown station ids are dropped.
pub fn resolve_target<'c>(
    target: &StationTarget,
    draw_date: NaiveDate,
    catalog: &'c Catalog,
) -> Vec<&'c Station> {
    match target {
        StationTarget::Single(id) => catalog.station(*id).into_iter().collect(),
        StationTarget::List(ids) => ids.iter().filter_map(|id| catalog.station(*id)).collect(),
        StationTarget::Region(region) => scheduled_stations(*region, draw_date, catalog)
            .into_iter()
            .take(1)
            .collect(),
        StationTarget::Counted { region, count } => scheduled_stations(*region, draw_date, catalog)
            .into_iter()
            .take(*count as usize)
            .collect(),
    }
}

/// Bridge winnings for `distinct` matched numbers
///
/// # Arguments
///
/// * `amount` - Stake per unit
/// * `rate` - Bridge payout rate
/// * `distinct` - Number of distinct bet numbers that hit
/// * `max_dup` - Highest hit count of a single number
///
/// # Returns
///
/// Zero when fewer than two numbers hit
pub fn bridge_win(amount: Decimal, rate: Decimal, distinct: usize, max_dup: usize) -> Decimal {
    if distinct < 2 {
        return Decimal::ZERO;
    }
    let base = amount * rate;
    let multiplier = Decimal::from(distinct - 1);
    let bonus = if max_dup > 1 {
        Decimal::from(max_dup - 1) * Decimal::new(5, 1) * base
    } else {
        Decimal::ZERO
    };
    base * multiplier + bonus
}

fn level(tier: PrizeTier, station: &Station, annotate: bool) -> String {
    if annotate {
        format!("{} ({})", tier.label(), station.name)
    } else {
        tier.label().to_string()
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

fn is_bridge(rule: &BetRule) -> bool {
    rule.class == BetClass::Bridge || rule.match_rule == MatchRule::Bridge
}

/// Sorted permutations of each number, or the numbers themselves
fn candidates(number: &str, permuting: bool) -> Vec<String> {
    if permuting {
        permutations(number)
    } else {
        vec![number.to_string()]
    }
}

fn reconcile_default(
    entry: &BetEntry,
    rule: &BetRule,
    permuting: bool,
    drawn: &[(&Station, &LotteryResult)],
    annotate: bool,
) -> ReconciliationOutcome {
    let mut outcome = ReconciliationOutcome::losing(entry.id);

    for (station, result) in drawn {
        for number in &entry.numbers {
            let digits = number.len();
            let tiers = tiers_for(rule.match_rule, station.region, digits);
            if tiers.is_empty() {
                continue;
            }

            let hit = candidates(number, permuting)
                .into_iter()
                .map(|candidate| {
                    let hits = find_hits(result, &tiers, &candidate);
                    (candidate, hits)
                })
                .find(|(_, hits)| !hits.is_empty());
            let Some((candidate, hits)) = hit else {
                continue;
            };

            let count: usize = hits.iter().map(|hit| hit.count).sum();
            let rate = rule.payout_for_digits(digits).rate;
            outcome.win_amount += entry.amount * rate * Decimal::from(count);
            push_unique(&mut outcome.matched_numbers, candidate);
            for hit in hits {
                push_unique(
                    &mut outcome.matched_prize_levels,
                    level(hit.tier, station, annotate),
                );
            }
        }
    }

    outcome.is_winning = outcome.win_amount > Decimal::ZERO;
    outcome
}

fn reconcile_bridge(
    entry: &BetEntry,
    rule: &BetRule,
    permuting: bool,
    stations: &[&Station],
    drawn: &[(&Station, &LotteryResult)],
    annotate: bool,
) -> ReconciliationOutcome {
    let mut numbers: Vec<String> = Vec::new();
    for number in &entry.numbers {
        for candidate in candidates(number, permuting) {
            push_unique(&mut numbers, candidate);
        }
    }

    let mut counts = vec![0usize; numbers.len()];
    let mut levels = Vec::new();
    for (station, result) in drawn {
        for tier in PrizeTier::ALL {
            for prize in result.tier(tier) {
                for (index, number) in numbers.iter().enumerate() {
                    if is_match(prize, number) {
                        counts[index] += 1;
                        push_unique(&mut levels, level(tier, station, annotate));
                    }
                }
            }
        }
    }

    let distinct = counts.iter().filter(|count| **count > 0).count();
    let max_dup = counts.iter().copied().max().unwrap_or(0);
    let class = BridgeClass::for_stations(
        stations.len() as u32,
        stations.iter().any(|s| s.region == RegionCode::North),
    );
    let rate = rule.payout_for_bridge(class).rate;
    let win_amount = bridge_win(entry.amount, rate, distinct, max_dup);

    if win_amount.is_zero() {
        return ReconciliationOutcome::losing(entry.id);
    }
    ReconciliationOutcome {
        bet_entry_id: entry.id,
        is_winning: true,
        matched_numbers: numbers
            .into_iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(number, _)| number)
            .collect(),
        matched_prize_levels: levels,
        win_amount,
    }
}

/// Reconcile one confirmed bet
///
/// # Returns
///
/// * `Some(outcome)` - If at least one target station has a result
/// * `None` - If the bet type is unknown, the target resolves to no station,
///   or no target station has a result for the date (a warning is logged)
pub fn reconcile_entry<R: ResultStore + ?Sized>(
    entry: &BetEntry,
    results: &R,
    catalog: &Catalog,
) -> Option<ReconciliationOutcome> {
    let Some(rule) = catalog.rule(&entry.bet_type) else {
        warn!(entry = entry.id, bet_type = %entry.bet_type, "unknown bet type, entry skipped");
        return None;
    };

    let stations = resolve_target(&entry.target, entry.draw_date, catalog);
    if stations.is_empty() {
        warn!(entry = entry.id, target = ?entry.target, "no station for target, entry skipped");
        return None;
    }

    let drawn: Vec<(&Station, &LotteryResult)> = stations
        .iter()
        .filter_map(|station| {
            results
                .result(station.id, entry.draw_date)
                .map(|result| (*station, result))
        })
        .collect();
    if drawn.is_empty() {
        warn!(entry = entry.id, date = %entry.draw_date, "no result for any station, entry skipped");
        return None;
    }

    let permuting = rule.is_permutation || is_permutation_alias(&entry.bet_type);
    let annotate = stations.len() > 1;
    let outcome = if is_bridge(rule) {
        reconcile_bridge(entry, rule, permuting, &stations, &drawn, annotate)
    } else {
        reconcile_default(entry, rule, permuting, &drawn, annotate)
    };

    debug!(
        entry = entry.id,
        winning = outcome.is_winning,
        win_amount = %outcome.win_amount,
        "entry reconciled"
    );
    Some(outcome)
}

/// Reconcile a batch of confirmed bets, keeping input order
///
/// Entries that cannot be reconciled are skipped; the others continue.
pub fn reconcile<R: ResultStore + ?Sized>(
    entries: &[BetEntry],
    results: &R,
    catalog: &Catalog,
) -> Vec<ReconciliationOutcome> {
    entries
        .iter()
        .filter_map(|entry| reconcile_entry(entry, results, catalog))
        .collect()
}

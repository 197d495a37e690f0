//! Station selector resolution
//!
//! A selector line names one station, a region's main draw, a counted
//! regional group (`2dmn`), or a list of stations (`vl.ct`, `vl ct`, or the
//! merged `vlct`). Recognition and resolution are separate steps: the
//! normalizer only needs to know that a line is a selector and how to write
//! it canonically, while resolution also settles aliases shared by several
//! stations.

use crate::core::catalog::Catalog;
use crate::core::text::{fold_key, fold_line};
use crate::types::{BetCodeError, ParsedStation, RegionCode, Station, StationId};
use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// Shape of a recognised selector line
#[derive(Debug, Clone, PartialEq)]
enum Selector {
    /// Exact station name (folded line)
    Name(String),
    /// A single station alias
    Alias(String),
    /// A region alias
    Region(String, RegionCode),
    Counted {
        count: u32,
        alias: String,
        region: RegionCode,
    },
    /// Station aliases, in the order typed
    List(Vec<String>),
}

impl Selector {
    fn render(&self) -> String {
        match self {
            Selector::Name(name) => name.clone(),
            Selector::Alias(alias) => alias.clone(),
            Selector::Region(alias, _) => alias.clone(),
            Selector::Counted { count, alias, .. } => format!("{}d{}", count, alias),
            Selector::List(parts) => parts.join("."),
        }
    }
}

fn is_list_separator(c: char) -> bool {
    c == '.' || c == ',' || c.is_whitespace()
}

fn counted(key: &str, catalog: &Catalog) -> Option<Selector> {
    let digits_end = key.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 {
        return None;
    }
    let count: u32 = key[..digits_end].parse().ok()?;
    if count == 0 {
        return None;
    }

    let rest = &key[digits_end..];
    let alias = rest.strip_prefix("dai").or_else(|| rest.strip_prefix('d'))?;
    let region = catalog.region_by_alias(alias)?;

    Some(Selector::Counted {
        count,
        alias: alias.to_string(),
        region,
    })
}

fn merged(key: &str, catalog: &Catalog) -> Option<Selector> {
    if !key.chars().all(char::is_alphabetic) {
        return None;
    }
    key.char_indices().skip(1).find_map(|(i, _)| {
        let (left, right) = key.split_at(i);
        let both_known = !catalog.stations_by_alias(left).is_empty()
            && !catalog.stations_by_alias(right).is_empty();
        both_known.then(|| Selector::List(vec![left.to_string(), right.to_string()]))
    })
}

fn classify(line: &str, catalog: &Catalog) -> Option<Selector> {
    let text = fold_line(line);
    if text.is_empty() {
        return None;
    }

    if catalog.station_by_name(&text).is_some() {
        return Some(Selector::Name(text));
    }
    if !catalog.stations_by_alias(&text).is_empty() {
        return Some(Selector::Alias(text));
    }

    let key = fold_key(&text);
    if let Some(region) = catalog.region_by_alias(&key) {
        return Some(Selector::Region(key, region));
    }
    if let Some(selector) = counted(&key, catalog) {
        return Some(selector);
    }

    let parts: Vec<String> = text
        .split(is_list_separator)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect();
    if parts.len() > 1 {
        let all_known = parts
            .iter()
            .all(|part| !catalog.stations_by_alias(part).is_empty());
        return all_known.then_some(Selector::List(parts));
    }

    merged(&key, catalog)
}

/// Whether `line` is a station selector
pub fn is_station_line(line: &str, catalog: &Catalog) -> bool {
    classify(line, catalog).is_some()
}

/// Canonical text of a selector line, or `None` if the line is not one
///
/// List parts are joined with `.` and merged aliases are split, so
/// `"VL, CT"` and `"vlct"` both become `"vl.ct"`.
pub fn canonical_selector(line: &str, catalog: &Catalog) -> Option<String> {
    classify(line, catalog).map(|selector| selector.render())
}

/// Resolve a station selector line
///
/// Shared aliases are settled with the configured alias priorities for the
/// draw date's weekday, then with the weekly schedule. Without a draw date
/// only priorities that apply every day are used.
///
/// # Arguments
///
/// * `line` - The selector text as typed
/// * `catalog` - The resolved configuration snapshot
/// * `draw_date` - Date of the draw the bets are placed on, if known
///
/// # Errors
///
/// Returns `StationNotFound` when the line (or any part of a list) names no
/// active station, and `AmbiguousStationAlias` when a shared alias cannot be
/// settled.
pub fn resolve_station(
    line: &str,
    catalog: &Catalog,
    draw_date: Option<NaiveDate>,
) -> Result<ParsedStation, BetCodeError> {
    let selector = classify(line, catalog)
        .ok_or_else(|| BetCodeError::station_not_found(line.trim()))?;

    let station = match selector {
        Selector::Name(name) => catalog
            .station_by_name(&name)
            .cloned()
            .map(ParsedStation::Single)
            .ok_or_else(|| BetCodeError::station_not_found(&name))?,
        Selector::Alias(alias) => {
            ParsedStation::Single(resolve_alias(&alias, catalog, draw_date)?.clone())
        }
        Selector::Region(_, region) => ParsedStation::Region(region),
        Selector::Counted { count, region, .. } => ParsedStation::Counted { region, count },
        Selector::List(parts) => {
            let mut stations: Vec<Station> = Vec::with_capacity(parts.len());
            for part in &parts {
                let station = resolve_alias(part, catalog, draw_date)?;
                if !stations.iter().any(|s| s.id == station.id) {
                    stations.push(station.clone());
                }
            }
            if stations.len() == 1 {
                ParsedStation::Single(stations.remove(0))
            } else {
                ParsedStation::List(stations)
            }
        }
    };

    debug!(line, ?station, "station resolved");
    Ok(station)
}

fn resolve_alias<'c>(
    alias: &str,
    catalog: &'c Catalog,
    draw_date: Option<NaiveDate>,
) -> Result<&'c Station, BetCodeError> {
    let candidates = catalog.stations_by_alias(alias);
    match candidates.as_slice() {
        [] => Err(BetCodeError::station_not_found(alias)),
        [station] => Ok(*station),
        _ => tie_break(alias, &candidates, catalog, draw_date).ok_or_else(|| {
            BetCodeError::AmbiguousStationAlias {
                alias: alias.to_string(),
                candidates: candidates.iter().map(|s| s.name.clone()).collect(),
            }
        }),
    }
}

fn tie_break<'c>(
    alias: &str,
    candidates: &[&'c Station],
    catalog: &Catalog,
    draw_date: Option<NaiveDate>,
) -> Option<&'c Station> {
    let weekday = draw_date.map(|date| date.weekday());
    let candidate = |id: StationId| candidates.iter().copied().find(|s| s.id == id);
    let rules: Vec<_> = catalog
        .alias_priorities()
        .iter()
        .filter(|rule| rule.alias == alias && candidate(rule.station_id).is_some())
        .collect();

    if let Some(day) = weekday {
        if let Some(rule) = rules
            .iter()
            .find(|rule| rule.days.iter().any(|d| d.is(day)))
        {
            debug!(alias, station_id = rule.station_id, "alias settled by weekday priority");
            return candidate(rule.station_id);
        }
    }
    if let Some(rule) = rules.iter().find(|rule| rule.days.is_empty()) {
        debug!(alias, station_id = rule.station_id, "alias settled by priority");
        return candidate(rule.station_id);
    }

    let day = weekday?;
    let scheduled: Vec<&Station> = candidates
        .iter()
        .copied()
        .filter(|station| {
            catalog
                .schedules()
                .iter()
                .any(|entry| entry.station_id == station.id && entry.day_of_week.is(day))
        })
        .collect();
    match scheduled.as_slice() {
        [station] => {
            debug!(alias, station_id = station.id, "alias settled by schedule");
            Some(*station)
        }
        _ => None,
    }
}

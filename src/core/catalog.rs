//! Resolved configuration snapshot
//!
//! The [`Catalog`] is built once from a [`ConfigSnapshot`] and then only read.
//! Every parse, calculation and reconciliation call receives it explicitly,
//! so several snapshots can be served side by side.

use crate::core::number_sets::NumberSet;
use crate::core::rules::RuleBook;
use crate::core::text::{fold_key, fold_line};
use crate::types::{
    AliasPriority, BetRule, CommissionSettings, ConfigError, ConfigSnapshot, RegionCode,
    Station, StationId, StationSchedule,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

fn check_commission(settings: &CommissionSettings) -> Result<(), ConfigError> {
    let fields = [
        ("price_rate", settings.price_rate),
        ("export_price_rate", settings.export_price_rate),
        ("return_price_rate", settings.return_price_rate),
    ];
    for (field, value) in fields {
        if value.is_sign_negative() {
            return Err(ConfigError::InvalidCommission { field, value });
        }
    }
    Ok(())
}

/// Lookup tables over one configuration snapshot
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    rules: RuleBook,
    stations: Vec<Station>,
    station_by_id: HashMap<StationId, usize>,
    /// Folded name (single spaces) of active stations
    station_by_name: HashMap<String, usize>,
    /// Folded alias of active stations; one alias may name several stations
    station_by_alias: HashMap<String, Vec<usize>>,
    region_by_alias: HashMap<String, RegionCode>,
    region_names: HashMap<RegionCode, String>,
    keywords: HashMap<String, NumberSet>,
    commission: CommissionSettings,
    schedules: Vec<StationSchedule>,
    alias_priorities: Vec<AliasPriority>,
}

impl Catalog {
    /// Resolve a configuration snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if bet-type aliases collide, a bet type is incomplete,
    /// or a number combination has an unknown name.
    pub fn from_snapshot(snapshot: ConfigSnapshot) -> Result<Self, ConfigError> {
        let rules = RuleBook::new(&snapshot.bet_types)?;
        check_commission(&snapshot.commission_settings)?;

        let mut catalog = Catalog {
            rules,
            commission: snapshot.commission_settings,
            schedules: snapshot.station_schedules,
            ..Default::default()
        };

        for (index, station) in snapshot.accessible_stations.into_iter().enumerate() {
            catalog.station_by_id.insert(station.id, index);
            if station.is_active {
                catalog
                    .station_by_name
                    .insert(fold_line(&station.name), index);
                for alias in &station.aliases {
                    let entry = catalog.station_by_alias.entry(fold_key(alias)).or_default();
                    if !entry.contains(&index) {
                        entry.push(index);
                    }
                }
            }
            catalog.stations.push(station);
        }

        for region in snapshot.regions {
            catalog
                .region_by_alias
                .insert(region.code.as_str().to_string(), region.code);
            for alias in &region.aliases {
                catalog.region_by_alias.insert(fold_key(alias), region.code);
            }
            catalog.region_names.insert(region.code, region.name);
        }

        for combination in snapshot.number_combinations {
            let set = NumberSet::from_name(&combination.name).ok_or_else(|| {
                ConfigError::UnknownCombination {
                    name: combination.name.clone(),
                }
            })?;
            catalog.keywords.insert(set.keyword().to_string(), set);
            for alias in &combination.aliases {
                catalog.keywords.insert(fold_key(alias), set);
            }
        }

        catalog.alias_priorities = snapshot
            .alias_priorities
            .into_iter()
            .map(|mut priority| {
                priority.alias = fold_key(&priority.alias);
                priority
            })
            .collect();

        debug!(
            bet_types = catalog.rules.rules().len(),
            stations = catalog.stations.len(),
            keywords = catalog.keywords.len(),
            "catalog resolved"
        );

        Ok(catalog)
    }

    /// Bet rules
    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Rule for a folded bet-type alias
    pub fn rule(&self, alias: &str) -> Option<&BetRule> {
        self.rules.get(alias)
    }

    /// Station by id (active or not)
    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.station_by_id.get(&id).map(|&index| &self.stations[index])
    }

    /// Active station by folded name
    pub fn station_by_name(&self, name: &str) -> Option<&Station> {
        self.station_by_name
            .get(name)
            .map(|&index| &self.stations[index])
    }

    /// Active stations sharing a folded alias
    pub fn stations_by_alias(&self, alias: &str) -> Vec<&Station> {
        self.station_by_alias
            .get(alias)
            .map(|indices| indices.iter().map(|&i| &self.stations[i]).collect())
            .unwrap_or_default()
    }

    /// Region named by a folded alias
    pub fn region_by_alias(&self, alias: &str) -> Option<RegionCode> {
        self.region_by_alias.get(alias).copied()
    }

    /// Display name of a region
    pub fn region_name(&self, region: RegionCode) -> &str {
        self.region_names
            .get(&region)
            .map(String::as_str)
            .unwrap_or_else(|| region.as_str())
    }

    /// Number set named by a folded keyword
    pub fn keyword(&self, word: &str) -> Option<NumberSet> {
        self.keywords.get(word).copied()
    }

    /// Rate applied to every stake
    pub fn commission_rate(&self) -> Decimal {
        self.commission.price_rate
    }

    /// Commission settings as configured
    pub fn commission(&self) -> &CommissionSettings {
        &self.commission
    }

    /// Weekly station schedules
    pub fn schedules(&self) -> &[StationSchedule] {
        &self.schedules
    }

    /// Alias tie-break rules (aliases folded)
    pub fn alias_priorities(&self) -> &[AliasPriority] {
        &self.alias_priorities
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::catalog;
    use super::*;
    use crate::types::ConfigSnapshot;

    #[test]
    fn test_station_lookups() {
        let catalog = catalog();
        assert_eq!(catalog.station_by_name("vinh long").map(|s| s.id), Some(2));
        assert_eq!(catalog.stations_by_alias("vl").len(), 1);
        assert_eq!(catalog.stations_by_alias("dn").len(), 2);
        assert_eq!(catalog.station(1).map(|s| s.name.as_str()), Some("Ha Noi"));
    }

    #[test]
    fn test_inactive_station_not_indexed_by_alias() {
        let catalog = catalog();
        assert!(catalog.stations_by_alias("old").is_empty());
        assert!(catalog.station_by_name("old station").is_none());
        assert!(catalog.station(7).is_some());
    }

    #[test]
    fn test_region_lookups() {
        let catalog = catalog();
        assert_eq!(catalog.region_by_alias("mb"), Some(RegionCode::North));
        assert_eq!(catalog.region_by_alias("mienbac"), Some(RegionCode::North));
        assert_eq!(catalog.region_by_alias("south"), Some(RegionCode::South));
        assert_eq!(catalog.region_name(RegionCode::Central), "Mien Trung");
    }

    #[test]
    fn test_keywords_include_canonical_names() {
        let catalog = catalog();
        assert_eq!(catalog.keyword("tai"), Some(NumberSet::Tai));
        assert_eq!(catalog.keyword("chanchan"), Some(NumberSet::ChanChan));
        assert_eq!(catalog.keyword("cc"), Some(NumberSet::ChanChan));
        assert_eq!(catalog.keyword("b"), None);
    }

    #[test]
    fn test_commission_rate() {
        assert_eq!(catalog().commission_rate(), Decimal::new(8, 1));
    }

    #[test]
    fn test_negative_commission_rejected() {
        let snapshot: ConfigSnapshot =
            serde_json::from_str(r#"{"commission_settings": {"price_rate": -1}}"#).unwrap();
        assert!(matches!(
            Catalog::from_snapshot(snapshot),
            Err(ConfigError::InvalidCommission { field: "price_rate", .. })
        ));
    }

    #[test]
    fn test_unknown_combination_rejected() {
        let snapshot: ConfigSnapshot =
            serde_json::from_str(r#"{"number_combinations": [{"name": "lucky"}]}"#).unwrap();
        assert!(matches!(
            Catalog::from_snapshot(snapshot),
            Err(ConfigError::UnknownCombination { .. })
        ));
    }
}

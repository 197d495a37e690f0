//! Bet-type rule book
//!
//! Resolves the configured bet types once into [`BetRule`] values keyed by
//! folded alias. Alias uniqueness is enforced here, and the match rule of a
//! bet type is inferred from its aliases when the configuration leaves it out.

use crate::core::text::fold_key;
use crate::types::{
    BetClass, BetRule, BetTypeConfig, ConfigError, MatchRule, SpecialCalc,
};
use std::collections::HashMap;

/// Aliases that mark a line as a permutation bet whatever the rule flag says
pub const PERMUTATION_ALIASES: &[&str] = &[
    "dao", "daob", "bdao", "baodao", "bd", "daoxc", "xcdao", "dxc", "xcd", "dao3", "dao4",
];

const HEAD_TAIL_ALIASES: &[&str] = &["dd", "daudui", "dauduoi", "xc", "xiuchu", "dxc", "xcd", "daoxc", "xcdao"];
const HEAD_ALIASES: &[&str] = &["dau", "d", "xcdau", "dauxc"];
const TAIL_ALIASES: &[&str] = &["duoi", "dui", "xcduoi", "xcdui", "duoixc"];
const COVER_ALL_ALIASES: &[&str] = &["b", "bl", "bao", "baolo", "lo", "bd", "daob", "bdao", "baodao", "dao"];
const COVER_ALL_7_ALIASES: &[&str] = &["b7l", "b7", "bao7lo", "baybl", "7lo"];
const COVER_ALL_8_ALIASES: &[&str] = &["b8l", "b8", "bao8lo", "8lo"];
const BRIDGE_ALIASES: &[&str] = &["da", "dv", "dx", "dax", "dathang", "daxien"];
const FIRST_PRIZE_ALIASES: &[&str] = &["nhat", "giainhat", "g1"];

/// Whether `alias` belongs to the permutation family
pub fn is_permutation_alias(alias: &str) -> bool {
    PERMUTATION_ALIASES.contains(&alias)
}

/// Match rule implied by a bet type's class and aliases
pub fn infer_match_rule(class: BetClass, aliases: &[String]) -> MatchRule {
    if class == BetClass::Bridge {
        return MatchRule::Bridge;
    }

    let families: [(&[&str], MatchRule); 7] = [
        (HEAD_TAIL_ALIASES, MatchRule::HeadTail),
        (HEAD_ALIASES, MatchRule::Head),
        (TAIL_ALIASES, MatchRule::Tail),
        (COVER_ALL_7_ALIASES, MatchRule::CoverAll7),
        (COVER_ALL_8_ALIASES, MatchRule::CoverAll8),
        (COVER_ALL_ALIASES, MatchRule::CoverAll),
        (FIRST_PRIZE_ALIASES, MatchRule::FirstPrize),
    ];

    for alias in aliases {
        if BRIDGE_ALIASES.contains(&alias.as_str()) {
            return MatchRule::Bridge;
        }
        for (family, rule) in families.iter() {
            if family.contains(&alias.as_str()) {
                return *rule;
            }
        }
    }

    MatchRule::Exact
}

fn resolve(config: &BetTypeConfig) -> Result<BetRule, ConfigError> {
    if config.aliases.is_empty() {
        return Err(ConfigError::IncompleteBetType {
            bet_type: config.name.clone(),
            reason: "no aliases".to_string(),
        });
    }
    if config.digit_rules.is_empty() {
        return Err(ConfigError::IncompleteBetType {
            bet_type: config.name.clone(),
            reason: "no digit rules".to_string(),
        });
    }

    let aliases: Vec<String> = config.aliases.iter().map(|a| fold_key(a)).collect();
    let class = match config.special_calc {
        SpecialCalc::Bridge => BetClass::Bridge,
        SpecialCalc::Standard if config.is_permutation => BetClass::Permutation,
        SpecialCalc::Standard => BetClass::Default,
    };
    let match_rule = config
        .match_rule
        .unwrap_or_else(|| infer_match_rule(class, &aliases));

    Ok(BetRule {
        id: config.id,
        name: config.name.clone(),
        aliases,
        class,
        is_permutation: config.is_permutation,
        digit_rules: config.digit_rules.iter().copied().collect(),
        regions: config.applicable_regions.iter().copied().collect(),
        payout: config.payout_rate.clone(),
        combinations: config.combinations.clone(),
        match_rule,
    })
}

/// Bet rules indexed by folded alias
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    rules: Vec<BetRule>,
    by_alias: HashMap<String, usize>,
}

impl RuleBook {
    /// Resolve every configured bet type
    ///
    /// # Errors
    ///
    /// Returns an error if two bet types share an alias or a bet type has no
    /// aliases or digit rules.
    pub fn new(bet_types: &[BetTypeConfig]) -> Result<Self, ConfigError> {
        let mut book = RuleBook::default();

        for config in bet_types {
            let rule = resolve(config)?;
            let index = book.rules.len();

            for alias in &rule.aliases {
                if let Some(&existing) = book.by_alias.get(alias) {
                    if existing != index {
                        return Err(ConfigError::DuplicateAlias {
                            alias: alias.clone(),
                            first: book.rules[existing].name.clone(),
                            second: rule.name.clone(),
                        });
                    }
                }
                book.by_alias.insert(alias.clone(), index);
            }

            book.rules.push(rule);
        }

        Ok(book)
    }

    /// Rule for a folded alias
    pub fn get(&self, alias: &str) -> Option<&BetRule> {
        self.by_alias.get(alias).map(|&index| &self.rules[index])
    }

    /// Whether `alias` names a bet type
    pub fn is_alias(&self, alias: &str) -> bool {
        self.by_alias.contains_key(alias)
    }

    /// Every resolved rule in configuration order
    pub fn rules(&self) -> &[BetRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PayoutRate, RegionCode};
    use rstest::rstest;
    use std::collections::BTreeMap;

    fn config(id: u32, name: &str, aliases: &[&str]) -> BetTypeConfig {
        BetTypeConfig {
            id,
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            digit_rules: vec![2],
            applicable_regions: vec![RegionCode::South],
            payout_rate: PayoutRate::default(),
            is_permutation: false,
            special_calc: SpecialCalc::Standard,
            combinations: BTreeMap::new(),
            match_rule: None,
        }
    }

    #[test]
    fn test_lookup_by_folded_alias() {
        let book = RuleBook::new(&[config(1, "Dau duoi", &["dd", "Đầu Đuôi"])]).unwrap();
        assert_eq!(book.get("dd").map(|r| r.id), Some(1));
        assert_eq!(book.get("dauduoi").map(|r| r.id), Some(1));
        assert!(book.get("b").is_none());
        assert!(book.is_alias("dauduoi"));
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let result = RuleBook::new(&[config(1, "Bao", &["b"]), config(2, "Bao lo", &["B"])]);
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateAlias { ref alias, .. }) if alias == "b"
        ));
    }

    #[test]
    fn test_repeated_alias_within_one_type_is_allowed() {
        let book = RuleBook::new(&[config(1, "Bao", &["b", "B"])]).unwrap();
        assert_eq!(book.rules().len(), 1);
    }

    #[test]
    fn test_incomplete_bet_type_rejected() {
        let mut bad = config(1, "Bao", &["b"]);
        bad.digit_rules.clear();
        assert!(matches!(
            RuleBook::new(&[bad]),
            Err(ConfigError::IncompleteBetType { .. })
        ));
    }

    #[test]
    fn test_class_resolution() {
        let mut bridge = config(1, "Da", &["da"]);
        bridge.special_calc = SpecialCalc::Bridge;
        let mut perm = config(2, "Bao dao", &["bdao"]);
        perm.is_permutation = true;
        let book = RuleBook::new(&[bridge, perm, config(3, "Bao", &["b"])]).unwrap();

        assert_eq!(book.get("da").unwrap().class, BetClass::Bridge);
        assert_eq!(book.get("bdao").unwrap().class, BetClass::Permutation);
        assert_eq!(book.get("b").unwrap().class, BetClass::Default);
    }

    #[rstest]
    #[case(&["dd"], MatchRule::HeadTail)]
    #[case(&["xc"], MatchRule::HeadTail)]
    #[case(&["dau"], MatchRule::Head)]
    #[case(&["duoi"], MatchRule::Tail)]
    #[case(&["b", "bao"], MatchRule::CoverAll)]
    #[case(&["b7l"], MatchRule::CoverAll7)]
    #[case(&["b8l"], MatchRule::CoverAll8)]
    #[case(&["da"], MatchRule::Bridge)]
    #[case(&["nhat"], MatchRule::FirstPrize)]
    #[case(&["xyz"], MatchRule::Exact)]
    fn test_infer_match_rule(#[case] aliases: &[&str], #[case] expected: MatchRule) {
        let aliases: Vec<String> = aliases.iter().map(|a| a.to_string()).collect();
        assert_eq!(infer_match_rule(BetClass::Default, &aliases), expected);
    }

    #[test]
    fn test_configured_match_rule_wins() {
        let mut head = config(1, "Dau", &["dd"]);
        head.match_rule = Some(MatchRule::Head);
        let book = RuleBook::new(&[head]).unwrap();
        assert_eq!(book.get("dd").unwrap().match_rule, MatchRule::Head);
    }
}

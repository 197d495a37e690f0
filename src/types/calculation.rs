//! Stake and prize breakdown types
//!
//! Calculators never return a bare number: each (line, bet type) pair gets a
//! detail carrying the formula inputs so the amount can be audited.

use crate::types::error::BetCodeError;
use rust_decimal::Decimal;

/// Which stake formula produced a detail, with its class-specific input
#[derive(Debug, Clone, PartialEq)]
pub enum StakeFormula {
    /// `stations × numbers × combination × amount × commission`
    Default { number_count: u32 },
    /// `stations × n(n−1)/2 × amount × 2 × combination × commission`
    Bridge { pair_factor: u32 },
    /// `stations × Σ|perms| × combination × amount × commission`
    Permutation { total_permutations: u32 },
}

/// Stake of one bet type on one line
#[derive(Debug, Clone, PartialEq)]
pub struct StakeDetail {
    /// Index of the line in the parsed bet code
    pub line_index: usize,
    pub bet_type: String,
    pub numbers: Vec<String>,
    pub formula: Option<StakeFormula>,
    pub station_count: u32,
    pub combination_multiplier: u32,
    pub amount: Decimal,
    pub commission_rate: Decimal,
    pub stake: Decimal,
    pub is_valid: bool,
    pub error: Option<BetCodeError>,
}

/// Stake of a whole bet code
#[derive(Debug, Clone, PartialEq)]
pub struct StakeResult {
    /// Sum of the valid details
    pub total_stake: Decimal,
    pub details: Vec<StakeDetail>,
    pub has_errors: bool,
}

/// Potential payout of one bet type on one line
#[derive(Debug, Clone, PartialEq)]
pub struct PrizeDetail {
    pub line_index: usize,
    pub bet_type: String,
    pub numbers: Vec<String>,
    pub amount: Decimal,
    pub payout_rate: Decimal,
    /// Payout table key used (`"2 digits"`, `"north"`, `"scalar"`, `"default"`)
    pub rate_source: String,
    pub potential: Decimal,
    pub is_valid: bool,
    pub error: Option<BetCodeError>,
}

/// Potential payout of a whole bet code
#[derive(Debug, Clone, PartialEq)]
pub struct PrizeResult {
    pub total_potential: Decimal,
    pub details: Vec<PrizeDetail>,
    pub has_errors: bool,
}

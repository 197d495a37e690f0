//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `config`: Configuration snapshot supplied by the caller
//! - `rule`: Bet types resolved into calculation classes
//! - `bet`: Parsed stations, bet lines and bet codes
//! - `calculation`: Stake and prize breakdowns
//! - `draw`: Draw results, confirmed bets and reconciliation outcomes
//! - `error`: Error types for the bet-code engine

pub mod bet;
pub mod calculation;
pub mod config;
pub mod draw;
pub mod error;
pub mod rule;

pub use bet::{BetLine, BetPart, LineIssue, ParsedBetCode, ParsedStation};
pub use calculation::{
    PrizeDetail, PrizeResult, StakeDetail, StakeFormula, StakeResult,
};
pub use config::{
    AliasPriority, BetTypeConfig, BetTypeId, CombinationValue, CommissionSettings,
    ConfigSnapshot, MatchRule, NumberCombinationConfig, PayoutRate, RegionCode, RegionConfig,
    ScheduleDay, SpecialCalc, Station, StationId, StationSchedule,
};
pub use draw::{
    BetEntry, LotteryResult, PrizeTier, ReconciliationOutcome, StationTarget,
};
pub use error::{BetCodeError, ConfigError};
pub use rule::{BetClass, BetRule, BridgeClass, ResolvedRate};

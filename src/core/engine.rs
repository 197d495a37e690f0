//! Bet-code engine
//!
//! This module provides the [`BetCodeEngine`] facade that runs the whole
//! chain for one configuration snapshot: normalization, station resolution,
//! line parsing and validation, stake and prize calculation, and conversion
//! of valid lines into confirmed bet entries for reconciliation.
//!
//! The engine enforces the block rules of a bet code:
//! - The first line of a block is a station selector
//! - A later selector line starts a new block
//! - A selector with no bet lines is reported as informational

use crate::core::catalog::Catalog;
use crate::core::line_parser::parse_line;
use crate::core::normalizer::normalize;
use crate::core::prize::compute_prize;
use crate::core::reconciler::reconcile;
use crate::core::stake::compute_stake;
use crate::core::station_resolver::{is_station_line, resolve_station};
use crate::core::traits::ResultStore;
use crate::types::{
    BetCodeError, BetEntry, BetLine, LineIssue, ParsedBetCode, PrizeResult,
    ReconciliationOutcome, StakeResult, StationTarget,
};
use chrono::NaiveDate;
use tracing::debug;

/// Parse result with its stake and prize breakdowns
#[derive(Debug, Clone, PartialEq)]
pub struct BetCodeReport {
    pub code: ParsedBetCode,
    pub stake: StakeResult,
    pub prize: PrizeResult,
}

/// One station block of canonical text
struct Block<'t> {
    /// 1-based line number of the selector
    line: usize,
    selector: &'t str,
    bets: Vec<(usize, &'t str)>,
}

/// Split canonical lines into station blocks
///
/// Bet lines before the first selector form a block whose selector is the
/// first of those lines, so the missing station gets reported.
fn blocks<'t>(lines: &[&'t str], catalog: &Catalog) -> Vec<Block<'t>> {
    let mut blocks: Vec<Block<'t>> = Vec::new();
    for (index, &line) in lines.iter().enumerate() {
        let number = index + 1;
        if !blocks.is_empty() && !is_station_line(line, catalog) {
            if let Some(block) = blocks.last_mut() {
                block.bets.push((number, line));
            }
            continue;
        }
        blocks.push(Block {
            line: number,
            selector: line,
            bets: Vec::new(),
        });
    }
    blocks
}

/// Bet-code engine over one configuration snapshot
///
/// The engine borrows the catalog and keeps no other state, so one catalog
/// can serve many engines.
#[derive(Debug, Clone, Copy)]
pub struct BetCodeEngine<'c> {
    catalog: &'c Catalog,
    draw_date: Option<NaiveDate>,
}

impl<'c> BetCodeEngine<'c> {
    /// Create an engine
    ///
    /// # Arguments
    ///
    /// * `catalog` - The resolved configuration snapshot
    /// * `draw_date` - Date the bets are placed on; settles shared station aliases
    pub fn new(catalog: &'c Catalog, draw_date: Option<NaiveDate>) -> Self {
        Self { catalog, draw_date }
    }

    /// The configuration snapshot in use
    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Rewrite raw text into canonical form
    pub fn normalize(&self, raw: &str) -> String {
        normalize(raw, self.catalog)
    }

    /// Parse every station block of a bet code
    ///
    /// The input is normalized first. Each block is parsed on its own; errors
    /// of every line are collected so they can all be fixed in one pass.
    pub fn parse_all(&self, raw: &str) -> Vec<ParsedBetCode> {
        let normalized = self.normalize(raw);
        let lines: Vec<&str> = normalized.lines().collect();
        blocks(&lines, self.catalog)
            .into_iter()
            .map(|block| self.parse_block(block))
            .collect()
    }

    /// Parse a bet code holding a single station block
    ///
    /// Further blocks are reported as `UnexpectedStationLine` on the first
    /// block's result. Empty input is reported as `StationNotFound`.
    pub fn parse(&self, raw: &str) -> ParsedBetCode {
        let normalized = self.normalize(raw);
        let lines: Vec<&str> = normalized.lines().collect();
        let mut blocks = blocks(&lines, self.catalog).into_iter();

        let Some(first) = blocks.next() else {
            return ParsedBetCode {
                station: None,
                lines: Vec::new(),
                success: false,
                errors: vec![LineIssue {
                    line: 1,
                    error: BetCodeError::station_not_found(""),
                }],
            };
        };

        let mut code = self.parse_block(first);
        for extra in blocks {
            code.errors.push(LineIssue {
                line: extra.line,
                error: BetCodeError::UnexpectedStationLine {
                    line: extra.line,
                    selector: extra.selector.to_string(),
                },
            });
            code.success = false;
        }
        code
    }

    fn parse_block(&self, block: Block<'_>) -> ParsedBetCode {
        let station = match resolve_station(block.selector, self.catalog, self.draw_date) {
            Ok(station) => station,
            Err(error) => {
                let mut errors = vec![LineIssue {
                    line: block.line,
                    error: error.clone(),
                }];
                let lines = block
                    .bets
                    .iter()
                    .map(|(number, text)| {
                        errors.push(LineIssue {
                            line: *number,
                            error: error.clone(),
                        });
                        BetLine::invalid(text, error.clone())
                    })
                    .collect();
                return ParsedBetCode {
                    station: None,
                    lines,
                    success: false,
                    errors,
                };
            }
        };

        // a station without bets yet is not a failure
        if block.bets.is_empty() {
            return ParsedBetCode {
                station: Some(station),
                lines: Vec::new(),
                success: true,
                errors: vec![LineIssue {
                    line: block.line,
                    error: BetCodeError::StationOnlyNoBetInfo {
                        station: block.selector.to_string(),
                    },
                }],
            };
        }

        let mut errors = Vec::new();
        let lines: Vec<BetLine> = block
            .bets
            .iter()
            .map(|(number, text)| {
                let line = parse_line(text, &station, self.catalog);
                if let Some(error) = &line.error {
                    errors.push(LineIssue {
                        line: *number,
                        error: error.clone(),
                    });
                }
                line
            })
            .collect();

        debug!(
            selector = block.selector,
            lines = lines.len(),
            errors = errors.len(),
            "block parsed"
        );

        ParsedBetCode {
            station: Some(station),
            lines,
            success: errors.is_empty(),
            errors,
        }
    }

    /// Stake owed for a parsed bet code
    pub fn compute_stake(&self, code: &ParsedBetCode) -> StakeResult {
        compute_stake(code, self.catalog)
    }

    /// Potential prize of a parsed bet code
    pub fn compute_prize(&self, code: &ParsedBetCode) -> PrizeResult {
        compute_prize(code)
    }

    /// Parse a bet code and compute both breakdowns
    pub fn evaluate(&self, raw: &str) -> BetCodeReport {
        let code = self.parse(raw);
        let stake = self.compute_stake(&code);
        let prize = self.compute_prize(&code);
        BetCodeReport { code, stake, prize }
    }

    /// Confirmed bet entries for the valid lines of a bet code
    ///
    /// One entry per (line, bet type), numbered from `first_id`.
    ///
    /// # Errors
    ///
    /// Returns the code's first error when it has no station.
    pub fn to_bet_entries(
        &self,
        code: &ParsedBetCode,
        draw_date: NaiveDate,
        first_id: u64,
    ) -> Result<Vec<BetEntry>, BetCodeError> {
        let station = code.station.as_ref().ok_or_else(|| {
            code.error()
                .cloned()
                .unwrap_or_else(|| BetCodeError::station_not_found(""))
        })?;
        let target = StationTarget::from(station);

        let entries = code
            .valid_lines()
            .flat_map(|line| line.parts().map(move |part| (line, part)))
            .zip(first_id..)
            .map(|((line, part), id)| BetEntry {
                id,
                draw_date,
                target: target.clone(),
                bet_type: part.alias.clone(),
                numbers: line.numbers.clone(),
                amount: part.amount,
            })
            .collect();
        Ok(entries)
    }

    /// Reconcile confirmed bets against draw results
    pub fn reconcile<R: ResultStore + ?Sized>(
        &self,
        entries: &[BetEntry],
        results: &R,
    ) -> Vec<ReconciliationOutcome> {
        reconcile(entries, results, self.catalog)
    }
}

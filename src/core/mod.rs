//! Core business logic module
//!
//! This module contains the bet-code pipeline, leaves first:
//! - `text`, `number_sets`, `permutations` - Folding, keyword sets and digit permutations
//! - `rules`, `catalog` - Configuration snapshot resolved into lookup tables
//! - `lexer`, `grammar` - Tokenizer and recursive-descent grammar of a bet line
//! - `normalizer` - Raw text to canonical text
//! - `station_resolver` - Station selector lines
//! - `line_parser`, `validator` - Bet lines and their rule checks
//! - `stake`, `prize` - Stake owed and potential prize
//! - `traits`, `result_store`, `matcher`, `reconciler` - Reconciliation against draw results
//! - `engine` - Facade over the whole chain
//! - `async` - Concurrent reconciliation components

pub mod r#async;
pub mod catalog;
pub mod engine;
pub mod grammar;
pub mod lexer;
pub mod line_parser;
pub mod matcher;
pub mod normalizer;
pub mod number_sets;
pub mod permutations;
pub mod prize;
pub mod reconciler;
pub mod result_store;
pub mod rules;
pub mod stake;
pub mod station_resolver;
pub mod text;
pub mod traits;
pub mod validator;

pub use catalog::Catalog;
pub use engine::{BetCodeEngine, BetCodeReport};
pub use r#async::{AsyncOutcomeStore, BatchProcessor};
pub use result_store::ResultIndex;
pub use rules::RuleBook;
pub use traits::ResultStore;

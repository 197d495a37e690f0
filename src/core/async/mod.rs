//! Asynchronous reconciliation components
//!
//! This module provides the thread-safe pieces used by the async strategy:
//!
//! - **AsyncOutcomeStore**: outcomes collected from concurrent tasks in a DashMap
//! - **BatchProcessor**: splits batches of entries across tokio tasks
//!
//! # Thread Safety
//!
//! The catalog and the result index are immutable and shared behind `Arc`.
//! The only shared mutable state is the outcome store, locked per entry.

pub mod batch_processor;
pub mod outcome_store;

pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use outcome_store::AsyncOutcomeStore;

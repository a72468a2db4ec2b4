#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Stores for tests.
//!
//! - [`MemoryStore`] evaluates a useful subset of the query language over
//!   triples held in memory, one list per graph.
//! - [`ScriptedStore`] answers from a queue of canned results and records
//!   every request it receives.

mod memory;
mod scripted;

#[cfg(test)]
mod memory_tests;
#[cfg(test)]
mod scripted_tests;

pub use memory::MemoryStore;
pub use scripted::{RecordedQuery, ScriptedStore};

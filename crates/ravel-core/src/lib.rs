#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data model shared by the ravel crates.
//!
//! - **Terms**: [`Uri`], [`Property`], [`Class`] and typed literal [`Value`]s
//! - **Results**: [`Triple`], [`BindingSet`] and [`QueryResults`]
//! - **Backend seam**: the [`Store`] trait every triple store implements
//! - **Registries**: the process-wide [`NamespaceRegistry`]
//!
//! Nothing in here knows about query text; that lives in `ravel-sparql`.

mod interner;
mod namespace;
mod store;
mod uri;
mod value;

pub mod vocab;

#[cfg(test)]
mod value_tests;

pub use interner::{Interner, Symbol};
pub use namespace::{NamespaceRegistry, NamespaceResolver};
pub use store::{BindingSet, QueryResults, Store, StoreError, Triple};
pub use uri::{Class, Property, Uri};
pub use value::Value;

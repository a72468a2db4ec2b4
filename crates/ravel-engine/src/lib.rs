#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Query execution and resource materialization.
//!
//! A [`Scope`] ([`Model`] or [`ModelGroup`]) scopes query text to its graphs,
//! runs it against a [`ravel_core::Store`] and hydrates the resulting triples
//! into [`Resource`]s held in a [`ResourceGraph`].

mod error;
mod mapping;
mod materialize;
mod query;
mod result;
mod scope;

#[cfg(test)]
mod mapping_tests;
#[cfg(test)]
mod result_tests;
#[cfg(test)]
mod scope_tests;

pub use error::{Error, Result};
pub use mapping::{MappingRegistry, TypeMapping, TypeName};
pub use materialize::{
    PropertyValue, Resource, ResourceGraph, ResourceId, ResourceMaterializer, ResourceSet,
};
pub use query::SparqlQuery;
pub use result::{QueryResult, ResourceQueryResult};
pub use scope::{Model, ModelBuilder, ModelGroup, ModelGroupBuilder, Scope};

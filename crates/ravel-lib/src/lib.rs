//! Ravel: parameterized SPARQL over pluggable triple stores, with results
//! hydrated into an identity-cached resource graph.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use ravel_lib::prelude::*;
//! use ravel_testkit::MemoryStore;
//!
//! let store = MemoryStore::new();
//! store.insert(
//!     "http://example.org/people",
//!     Triple::new(
//!         Uri::new("http://example.org/bob"),
//!         "http://xmlns.com/foaf/0.1/name",
//!         "Bob",
//!     ),
//! );
//! let model = Model::builder("http://example.org/people", Arc::new(store)).build();
//!
//! let query = SparqlQuery::new("DESCRIBE @who")
//!     .bind("who", Uri::new("http://example.org/bob"))
//!     .expect("bindable");
//! let resources = model.execute(&query)?.resources()?;
//!
//! assert_eq!(resources.uris(), [Uri::new("http://example.org/bob")]);
//! # Ok::<(), ravel_lib::Error>(())
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub use ravel_core as rdf;
pub use ravel_engine as engine;
pub use ravel_sparql as sparql;

pub use ravel_engine::{Error, Result};

pub mod prelude {
    pub use ravel_core::{
        BindingSet, Class, NamespaceRegistry, Property, QueryResults, Store, Triple, Uri, Value,
    };
    pub use ravel_engine::{
        MappingRegistry, Model, ModelGroup, PropertyValue, Resource, ResourceSet, Scope,
        SparqlQuery, TypeMapping, TypeName,
    };
    pub use ravel_sparql::{FilterOp, QueryDescriptor, QueryForm, QueryGraph, SortDirection};
}

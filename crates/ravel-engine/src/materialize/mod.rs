//! Resource materialization.
//!
//! Triples from DESCRIBE, CONSTRUCT or a statement-providing SELECT are folded
//! into a [`ResourceGraph`]: one resource per URI, subjects in first-seen
//! order, URI objects linked as resources (placeholders until described).

mod graph;
mod materializer;

pub use graph::{PropertyValue, Resource, ResourceGraph, ResourceId, ResourceSet};
pub use materializer::ResourceMaterializer;

pub(crate) use materializer::rows_to_triples;

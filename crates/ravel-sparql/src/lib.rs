//! SPARQL text layer: everything between a caller's intent and the text a
//! store receives.
//!
//! - `lex` - the base lexer seam and its `logos` implementation
//! - `rewrite` - parameter binding, dataset injection, prefix declaration
//! - `descriptor` - query form and projection classification, solution modifiers
//! - `serialize` - values to literal syntax, COUNT and projection queries
//! - `builder` - the fluent query graph
//! - `compile` - query graph to text
//! - `diagnostics` - positioned findings rendered with source snippets

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod builder;
pub mod compile;
pub mod descriptor;
pub mod diagnostics;
pub mod lex;
pub mod rewrite;
pub mod serialize;


pub use builder::{FilterOp, QueryGraph, QueryId, SortDirection};
pub use compile::QueryCompiler;
pub use descriptor::{DescriptorCache, QueryDescriptor, QueryForm};
pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};
pub use rewrite::QueryRewriter;

use ravel_core::Uri;

/// Errors raised while preparing query text.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Serialization reached a parameter nobody bound.
    #[error("parameter `@{0}` has no bound value")]
    UnboundParameter(String),

    #[error("no namespace registered for prefix `{0}`")]
    NamespaceNotFound(String),

    #[error("{0} values have no literal form")]
    UnsupportedValueType(String),

    /// A dataset parameter was bound to a graph the query already uses.
    #[error("graph <{0}> is already part of the dataset")]
    DoubleBoundDataset(Uri),

    #[error("parameter `@{0}` names a graph and needs a URI value")]
    InvalidDatasetValue(String),

    /// A pattern points at a query outside the cloned component. The builder
    /// keeps dependencies symmetric, so this means the graph was corrupted.
    #[error("query {0:?} is referenced but not reachable from the cloned root")]
    CycleDetected(QueryId),

    #[error("query {0:?} does not belong to this graph")]
    UnknownQuery(QueryId),

    #[error("query has no variable to project")]
    NoPrimaryVariable,
}

pub type Result<T> = std::result::Result<T, Error>;

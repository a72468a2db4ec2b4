//! Fluent construction of graph-pattern queries.

mod clone;
mod pattern;
mod query;


pub use pattern::{FilterOp, PatternTerm, Sort, SortDirection, StatementPattern};
pub use query::{QUERY_VARIABLE_NAMESPACE, QueryGraph, QueryId, QueryMut, QueryNode};

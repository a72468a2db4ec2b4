use ravel_core::{Property, Value};

use super::query::QueryId;

/// Comparison applied between a pattern's object and its constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterOp {
    #[default]
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    /// Substring match on the string form.
    Contains,
}

impl FilterOp {
    /// Infix operator; `None` for [`FilterOp::Contains`], which is a function.
    pub fn operator(self) -> Option<&'static str> {
        match self {
            FilterOp::Equal => Some("="),
            FilterOp::NotEqual => Some("!="),
            FilterOp::GreaterThan => Some(">"),
            FilterOp::GreaterOrEqual => Some(">="),
            FilterOp::LessThan => Some("<"),
            FilterOp::LessOrEqual => Some("<="),
            FilterOp::Contains => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Sort on a pattern's object. Lower priority sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sort {
    pub direction: SortDirection,
    pub priority: u32,
}

/// What sits in object position.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternTerm {
    /// Another query's variable: a join.
    Query(QueryId),
    Value(Value),
    /// An unconstrained fresh variable.
    Any,
}

/// One candidate triple owned by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementPattern {
    pub subject: QueryId,
    /// `None` matches any predicate.
    pub predicate: Option<Property>,
    pub object: PatternTerm,
    pub filter: FilterOp,
    pub sort: Option<Sort>,
}

impl StatementPattern {
    pub fn new(subject: QueryId, predicate: Option<Property>, object: PatternTerm) -> Self {
        Self {
            subject,
            predicate,
            object,
            filter: FilterOp::Equal,
            sort: None,
        }
    }

    /// Queries this pattern refers to besides `owner`.
    pub(crate) fn references(&self) -> impl Iterator<Item = QueryId> + '_ {
        let object = match self.object {
            PatternTerm::Query(id) => Some(id),
            _ => None,
        };
        std::iter::once(self.subject).chain(object)
    }
}

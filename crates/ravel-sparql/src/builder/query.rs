use indexmap::IndexSet;
use ravel_core::{Class, Interner, Property, Symbol, Uri, Value};

use crate::{Error, Result};

use super::pattern::{FilterOp, PatternTerm, Sort, SortDirection, StatementPattern};

/// Namespace of the URIs naming query variables.
pub const QUERY_VARIABLE_NAMESPACE: &str = "urn:ravel:query:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryId(u32);

impl QueryId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One builder query: a variable and the patterns constraining it.
#[derive(Debug, Clone)]
pub struct QueryNode {
    pub(crate) variable: Symbol,
    pub(crate) patterns: Vec<StatementPattern>,
    pub(crate) offset: Option<u64>,
    pub(crate) limit: Option<u64>,
    pub(crate) inference: bool,
    /// Queries joined with this one, in either direction.
    pub(crate) dependents: IndexSet<QueryId>,
}

impl QueryNode {
    fn new(variable: Symbol) -> Self {
        Self {
            variable,
            patterns: Vec::new(),
            offset: None,
            limit: None,
            inference: false,
            dependents: IndexSet::new(),
        }
    }

    pub fn patterns(&self) -> &[StatementPattern] {
        &self.patterns
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn inference(&self) -> bool {
        self.inference
    }

    pub fn is_sorted(&self) -> bool {
        self.patterns.iter().any(|p| p.sort.is_some())
    }
}

/// Arena of builder queries. Joins and dependencies are ids into the arena,
/// so cyclic query graphs need no shared ownership.
#[derive(Debug, Clone, Default)]
pub struct QueryGraph {
    pub(crate) nodes: Vec<QueryNode>,
    variables: Interner,
}

impl QueryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A query with a generated variable name.
    pub fn query(&mut self) -> QueryId {
        let name = format!("q{}", self.nodes.len());
        self.allocate(&name)
    }

    /// A query whose variable is derived from `name`. Clashing names get a
    /// numeric suffix.
    pub fn named_query(&mut self, name: &str) -> QueryId {
        self.allocate(name)
    }

    pub(crate) fn allocate(&mut self, name: &str) -> QueryId {
        let variable = self
            .variables
            .fresh(&format!("{QUERY_VARIABLE_NAMESPACE}{}", sanitize(name)));
        let id = QueryId(self.nodes.len() as u32);
        self.nodes.push(QueryNode::new(variable));
        id
    }

    /// Fluent handle on one query.
    ///
    /// # Panics
    /// If `id` was not allocated by this graph.
    pub fn at(&mut self, id: QueryId) -> QueryMut<'_> {
        assert!(id.index() < self.nodes.len(), "{id:?} is not in this graph");
        QueryMut { graph: self, id }
    }

    /// Like [`QueryGraph::at`], failing with [`Error::UnknownQuery`] instead.
    pub fn try_at(&mut self, id: QueryId) -> Result<QueryMut<'_>> {
        if id.index() >= self.nodes.len() {
            return Err(Error::UnknownQuery(id));
        }
        Ok(QueryMut { graph: self, id })
    }

    pub fn get(&self, id: QueryId) -> Result<&QueryNode> {
        self.nodes.get(id.index()).ok_or(Error::UnknownQuery(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn variable_uri(&self, id: QueryId) -> Result<Uri> {
        let node = self.get(id)?;
        Ok(Uri::new(self.variables.resolve(node.variable)))
    }

    /// Variable name as used in query text, without the `?`.
    pub fn variable_name(&self, id: QueryId) -> Result<&str> {
        let node = self.get(id)?;
        let uri = self.variables.resolve(node.variable);
        Ok(uri.strip_prefix(QUERY_VARIABLE_NAMESPACE).unwrap_or(uri))
    }

    pub fn dependents(&self, id: QueryId) -> Result<impl Iterator<Item = QueryId> + '_> {
        Ok(self.get(id)?.dependents.iter().copied())
    }

    /// `root` and every query reachable through dependencies, breadth first.
    pub fn component(&self, root: QueryId) -> Result<Vec<QueryId>> {
        self.get(root)?;
        let mut order = vec![root];
        let mut next = 0;
        while next < order.len() {
            let current = order[next];
            next += 1;
            for &dependent in &self.get(current)?.dependents {
                if !order.contains(&dependent) {
                    order.push(dependent);
                }
            }
        }
        Ok(order)
    }

    fn link(&mut self, a: QueryId, b: QueryId) {
        if a == b {
            return;
        }
        self.nodes[a.index()].dependents.insert(b);
        self.nodes[b.index()].dependents.insert(a);
    }

    fn push_pattern(&mut self, owner: QueryId, pattern: StatementPattern) {
        let references: Vec<QueryId> = pattern.references().collect();
        for other in references {
            assert!(other.index() < self.nodes.len(), "{other:?} is not in this graph");
            self.link(owner, other);
        }
        self.nodes[owner.index()].patterns.push(pattern);
    }
}

fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "q".to_owned()
    } else {
        cleaned
    }
}

/// Mutable view of one query; every method returns the handle for chaining.
pub struct QueryMut<'g> {
    graph: &'g mut QueryGraph,
    id: QueryId,
}

impl QueryMut<'_> {
    pub fn id(&self) -> QueryId {
        self.id
    }

    fn node(&mut self) -> &mut QueryNode {
        &mut self.graph.nodes[self.id.index()]
    }

    fn push(self, pattern: StatementPattern) -> Self {
        self.graph.push_pattern(self.id, pattern);
        self
    }

    /// `?self property value`
    pub fn where_value(self, property: impl Into<Property>, value: impl Into<Value>) -> Self {
        let id = self.id;
        self.push(StatementPattern::new(
            id,
            Some(property.into()),
            PatternTerm::Value(value.into()),
        ))
    }

    /// `?self property ?x` with `?x op value`.
    pub fn where_filter(
        self,
        property: impl Into<Property>,
        op: FilterOp,
        value: impl Into<Value>,
    ) -> Self {
        let id = self.id;
        let mut pattern =
            StatementPattern::new(id, Some(property.into()), PatternTerm::Value(value.into()));
        pattern.filter = op;
        self.push(pattern)
    }

    /// `?self property ?other`: joins `other` into this query.
    pub fn where_query(self, property: impl Into<Property>, other: QueryId) -> Self {
        let id = self.id;
        self.push(StatementPattern::new(
            id,
            Some(property.into()),
            PatternTerm::Query(other),
        ))
    }

    /// `?other property ?self`: the reverse join.
    pub fn where_referenced_by(self, other: QueryId, property: impl Into<Property>) -> Self {
        let id = self.id;
        self.push(StatementPattern::new(
            other,
            Some(property.into()),
            PatternTerm::Query(id),
        ))
    }

    /// `?self property ?x` for any `?x`.
    pub fn where_any(self, property: impl Into<Property>) -> Self {
        let id = self.id;
        self.push(StatementPattern::new(
            id,
            Some(property.into()),
            PatternTerm::Any,
        ))
    }

    /// `?self rdf:type class`
    pub fn where_class(self, class: impl Into<Class>) -> Self {
        let class = class.into();
        self.where_value(Property::rdf_type(), Value::from(class))
    }

    /// Sort results by the value of `property`.
    pub fn sort_by(
        self,
        property: impl Into<Property>,
        direction: SortDirection,
        priority: u32,
    ) -> Self {
        let id = self.id;
        let mut pattern = StatementPattern::new(id, Some(property.into()), PatternTerm::Any);
        pattern.sort = Some(Sort {
            direction,
            priority,
        });
        self.push(pattern)
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.node().offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.node().limit = Some(limit);
        self
    }

    /// Ask the store to answer this query under its entailment rules.
    pub fn inference(mut self, enabled: bool) -> Self {
        self.node().inference = enabled;
        self
    }
}

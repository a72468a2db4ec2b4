//! Query graph to query text.

use indexmap::IndexMap;
use ravel_core::Interner;

use crate::builder::{FilterOp, PatternTerm, QueryGraph, QueryId, SortDirection, StatementPattern};
use crate::serialize::{serialize_uri, serialize_value};
use crate::{Error, Result};

/// Compiles the dependency component of one root query.
///
/// Variables are named after the query variable URIs, visiting queries
/// breadth first from the root, so the same graph always yields the same text.
pub struct QueryCompiler<'g> {
    graph: &'g QueryGraph,
    root: QueryId,
    order: Vec<QueryId>,
    names: IndexMap<QueryId, String>,
}

/// The pieces of a compiled WHERE group.
#[derive(Default)]
struct Body {
    triples: Vec<String>,
    filters: Vec<String>,
    /// (priority, direction, variable) in pattern order.
    sorts: Vec<(u32, SortDirection, String)>,
}

impl<'g> QueryCompiler<'g> {
    pub fn new(graph: &'g QueryGraph, root: QueryId) -> Result<Self> {
        let order = graph.component(root)?;
        let names = order
            .iter()
            .map(|&id| Ok((id, graph.variable_name(id)?.to_owned())))
            .collect::<Result<IndexMap<_, _>>>()?;
        Ok(Self {
            graph,
            root,
            order,
            names,
        })
    }

    pub fn root(&self) -> QueryId {
        self.root
    }

    /// Queries in the order their patterns are emitted.
    pub fn order(&self) -> &[QueryId] {
        &self.order
    }

    pub fn variable(&self, id: QueryId) -> Result<&str> {
        self.names
            .get(&id)
            .map(String::as_str)
            .ok_or(Error::UnknownQuery(id))
    }

    pub fn root_variable(&self) -> Result<&str> {
        self.variable(self.root)
    }

    /// Whether any query in the component sorts its results.
    pub fn is_sorted(&self) -> Result<bool> {
        for &id in &self.order {
            if self.graph.get(id)?.is_sorted() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn inference(&self) -> Result<bool> {
        Ok(self.graph.get(self.root)?.inference())
    }

    /// `DESCRIBE ?root WHERE { ... }` with ordering and paging.
    pub fn compile_describe(&self) -> Result<String> {
        let head = format!("DESCRIBE ?{}", self.root_variable()?);
        self.assemble(head, true)
    }

    /// `SELECT DISTINCT ?root WHERE { ... }` with ordering and paging.
    pub fn compile_select(&self) -> Result<String> {
        let head = format!("SELECT DISTINCT ?{}", self.root_variable()?);
        self.assemble(head, true)
    }

    /// `SELECT (COUNT(DISTINCT ?root) AS ?count) WHERE { ... }`, unpaged.
    pub fn compile_count(&self) -> Result<String> {
        let head = format!("SELECT (COUNT(DISTINCT ?{}) AS ?count)", self.root_variable()?);
        self.assemble(head, false)
    }

    fn assemble(&self, head: String, modifiers: bool) -> Result<String> {
        let body = self.body()?;
        let mut parts = vec![head, where_clause(&body)];
        if modifiers {
            parts.push(order_by(&body));
            parts.push(self.paging()?);
        }
        let text = join(parts);
        tracing::trace!(query = %text, "compiled builder query");
        Ok(text)
    }

    fn body(&self) -> Result<Body> {
        let mut body = Body::default();
        // Pattern variables must not shadow any query variable in the text.
        let mut scope = Interner::new();
        for name in self.names.values() {
            scope.intern(name);
        }
        for &owner in &self.order {
            let node = self.graph.get(owner)?;
            for (index, pattern) in node.patterns().iter().enumerate() {
                self.emit_pattern(&mut body, &mut scope, owner, index, pattern)?;
            }
        }

        let root_name = self.root_variable()?;
        let root = format!("?{root_name}");
        let mentioned = body
            .triples
            .iter()
            .any(|t| t.split(' ').any(|term| term == root));
        if !mentioned {
            let predicate = fresh_variable(&mut scope, &format!("{root_name}_p"));
            let object = fresh_variable(&mut scope, &format!("{root_name}_o"));
            body.triples
                .insert(0, format!("{root} {predicate} {object} ."));
        }
        Ok(body)
    }

    fn emit_pattern(
        &self,
        body: &mut Body,
        scope: &mut Interner,
        owner: QueryId,
        index: usize,
        pattern: &StatementPattern,
    ) -> Result<()> {
        let owner_name = self.variable(owner)?;
        let subject = format!("?{}", self.variable(pattern.subject)?);
        let predicate = match &pattern.predicate {
            Some(property) => serialize_uri(property.uri().as_str()),
            None => fresh_variable(scope, &format!("{owner_name}_p{index}")),
        };
        let constraint = match &pattern.object {
            PatternTerm::Query(id) => Some(format!("?{}", self.variable(*id)?)),
            PatternTerm::Value(value) => Some(serialize_value(value)?),
            PatternTerm::Any => None,
        };

        let direct = pattern.sort.is_none() && pattern.filter == FilterOp::Equal;
        let object = match constraint {
            Some(term) if direct => term,
            constraint => {
                let fresh = fresh_variable(scope, &format!("{owner_name}_o{index}"));
                if let Some(term) = constraint {
                    body.filters.push(filter(pattern.filter, &fresh, &term));
                }
                if let Some(sort) = pattern.sort {
                    body.sorts.push((sort.priority, sort.direction, fresh.clone()));
                }
                fresh
            }
        };

        body.triples.push(format!("{subject} {predicate} {object} ."));
        Ok(())
    }

    fn paging(&self) -> Result<String> {
        let node = self.graph.get(self.root)?;
        let mut parts = Vec::new();
        if let Some(limit) = node.limit() {
            parts.push(format!("LIMIT {limit}"));
        }
        if let Some(offset) = node.offset() {
            parts.push(format!("OFFSET {offset}"));
        }
        Ok(parts.join(" "))
    }
}

/// `?base`, or a suffixed variant if `base` is already taken in `scope`.
fn fresh_variable(scope: &mut Interner, base: &str) -> String {
    let symbol = scope.fresh(base);
    format!("?{}", scope.resolve(symbol))
}

fn filter(op: FilterOp, variable: &str, term: &str) -> String {
    match op.operator() {
        Some(operator) => format!("FILTER({variable} {operator} {term})"),
        None => format!("FILTER(CONTAINS(STR({variable}), {term}))"),
    }
}

fn where_clause(body: &Body) -> String {
    let mut inner = body.triples.clone();
    inner.extend(body.filters.iter().cloned());
    format!("WHERE {{ {} }}", inner.join(" "))
}

fn order_by(body: &Body) -> String {
    if body.sorts.is_empty() {
        return String::new();
    }
    let mut sorts: Vec<_> = body.sorts.iter().collect();
    sorts.sort_by_key(|(priority, _, _)| *priority);
    let conditions: Vec<String> = sorts
        .into_iter()
        .map(|(_, direction, variable)| match direction {
            SortDirection::Ascending => format!("ASC({variable})"),
            SortDirection::Descending => format!("DESC({variable})"),
        })
        .collect();
    format!("ORDER BY {}", conditions.join(" "))
}

fn join(parts: Vec<String>) -> String {
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

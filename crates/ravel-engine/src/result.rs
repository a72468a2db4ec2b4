//! Lazily executed query results.
//!
//! Nothing reaches the store until an accessor is called; each accessor is one
//! (or, for inferencing resource queries, two) blocking round trips.

use indexmap::IndexSet;
use ravel_core::{BindingSet, QueryResults, Triple, Uri, Value};
use ravel_sparql::serialize::{serialize_count, serialize_uri, serialize_uri_projection};
use ravel_sparql::{QueryCompiler, QueryDescriptor, QueryForm, QueryGraph, QueryId};

use crate::mapping::TypeName;
use crate::materialize::{ResourceMaterializer, ResourceSet, rows_to_triples};
use crate::query::SparqlQuery;
use crate::scope::Scope;
use crate::{Error, Result};

/// Result of a text query, read through the accessor matching its form.
#[derive(Clone)]
pub struct QueryResult<'s> {
    scope: &'s dyn Scope,
    descriptor: QueryDescriptor,
    inference: bool,
}

impl<'s> QueryResult<'s> {
    pub(crate) fn new(scope: &'s dyn Scope, query: &SparqlQuery) -> Self {
        let mut descriptor = query.descriptor().clone();
        scope.apply(&mut descriptor);
        Self {
            scope,
            descriptor,
            inference: query.is_inferencing(),
        }
    }

    /// The scoped query as sent to the store.
    pub fn descriptor(&self) -> &QueryDescriptor {
        &self.descriptor
    }

    pub fn form(&self) -> QueryForm {
        self.descriptor.form()
    }

    pub fn ask(&self) -> Result<bool> {
        self.expect_form(QueryForm::Ask)?;
        match self.scope.run(&self.descriptor, self.inference)? {
            QueryResults::Boolean(answer) => Ok(answer),
            other => Err(unexpected("boolean", &other)),
        }
    }

    pub fn bindings(&self) -> Result<Vec<BindingSet>> {
        self.expect_form(QueryForm::Select)?;
        match self.scope.run(&self.descriptor, self.inference)? {
            QueryResults::Bindings(rows) => Ok(rows),
            other => Err(unexpected("bindings", &other)),
        }
    }

    /// Result rows as triples. Only for statement-providing queries.
    pub fn statements(&self) -> Result<Vec<Triple>> {
        self.expect_statements()?;
        match self.scope.run(&self.descriptor, self.inference)? {
            QueryResults::Triples(triples) => Ok(triples),
            QueryResults::Bindings(rows) => Ok(rows_to_triples(&self.descriptor, &rows)),
            other => Err(unexpected("triples", &other)),
        }
    }

    pub fn resources(&self) -> Result<ResourceSet> {
        self.resources_as(&TypeName::resource())
    }

    /// Resources assignable to `ty`; subjects mapping to no such type are left out.
    pub fn resources_as(&self, ty: &TypeName) -> Result<ResourceSet> {
        self.expect_statements()?;
        let materializer = materializer(self.scope, ty, self.inference);

        match self.descriptor.primary_variable() {
            Some(variable) if self.inference => {
                let projection =
                    QueryDescriptor::parse(&serialize_uri_projection(&self.descriptor, None)?);
                two_phase(
                    self.scope,
                    &projection,
                    variable,
                    self.descriptor.has_order_by(),
                    &materializer,
                )
            }
            _ => Ok(materializer.materialize(&self.statements()?)),
        }
    }

    /// Number of distinct values of the primary variable.
    pub fn count(&self) -> Result<u64> {
        let count = QueryDescriptor::parse(&serialize_count(&self.descriptor)?);
        read_count(self.scope.run(&count, self.inference)?)
    }

    fn expect_form(&self, expected: QueryForm) -> Result<()> {
        let actual = self.form();
        if actual != expected {
            return Err(Error::QueryTypeMismatch { expected, actual });
        }
        Ok(())
    }

    fn expect_statements(&self) -> Result<()> {
        if !self.descriptor.provides_statements() {
            return Err(Error::QueryShapeMismatch(self.form()));
        }
        Ok(())
    }
}

/// Result of a compiled query graph.
#[derive(Clone)]
pub struct ResourceQueryResult<'s> {
    scope: &'s dyn Scope,
    describe: QueryDescriptor,
    select: QueryDescriptor,
    count: QueryDescriptor,
    variable: String,
    inference: bool,
    sorted: bool,
}

impl<'s> ResourceQueryResult<'s> {
    pub(crate) fn new(scope: &'s dyn Scope, graph: &QueryGraph, root: QueryId) -> Result<Self> {
        let compiler = QueryCompiler::new(graph, root)?;
        let scoped = |text: String| {
            let mut descriptor = QueryDescriptor::parse(&text);
            scope.apply(&mut descriptor);
            descriptor
        };
        Ok(Self {
            scope,
            describe: scoped(compiler.compile_describe()?),
            select: scoped(compiler.compile_select()?),
            count: scoped(compiler.compile_count()?),
            variable: compiler.root_variable()?.to_owned(),
            inference: compiler.inference()?,
            sorted: compiler.is_sorted()?,
        })
    }

    pub fn describe_query(&self) -> &QueryDescriptor {
        &self.describe
    }

    pub fn select_query(&self) -> &QueryDescriptor {
        &self.select
    }

    pub fn count_query(&self) -> &QueryDescriptor {
        &self.count
    }

    pub fn count(&self) -> Result<u64> {
        read_count(self.scope.run(&self.count, self.inference)?)
    }

    /// Matching resource URIs, in result order.
    pub fn uris(&self) -> Result<Vec<Uri>> {
        project(self.scope, &self.select, &self.variable, self.inference)
    }

    pub fn resources(&self) -> Result<ResourceSet> {
        self.resources_as(&TypeName::resource())
    }

    pub fn resources_as(&self, ty: &TypeName) -> Result<ResourceSet> {
        let materializer = materializer(self.scope, ty, self.inference);
        if self.inference {
            return two_phase(
                self.scope,
                &self.select,
                &self.variable,
                self.sorted,
                &materializer,
            );
        }
        match self.scope.run(&self.describe, false)? {
            QueryResults::Triples(triples) => Ok(materializer.materialize(&triples)),
            other => Err(unexpected("triples", &other)),
        }
    }

    /// The same query restricted to one page. Counting is unaffected.
    pub fn page(&self, offset: u64, limit: u64) -> Self {
        let mut page = self.clone();
        for descriptor in [&mut page.describe, &mut page.select] {
            descriptor.set_offset(offset);
            descriptor.set_limit(limit);
        }
        page
    }
}

fn materializer<'m>(scope: &'m dyn Scope, ty: &TypeName, inference: bool) -> ResourceMaterializer<'m> {
    ResourceMaterializer::new(scope.mappings())
        .base_type(ty.clone())
        .inference(inference)
        .model(scope.owner().cloned())
}

/// Inferencing projection for the URI list, then one plain DESCRIBE over it.
fn two_phase(
    scope: &dyn Scope,
    projection: &QueryDescriptor,
    variable: &str,
    sorted: bool,
    materializer: &ResourceMaterializer<'_>,
) -> Result<ResourceSet> {
    let uris = project(scope, projection, variable, true)?;
    tracing::debug!(count = uris.len(), "projection phase done");
    if uris.is_empty() {
        return Ok(ResourceSet::default());
    }

    let text = uris
        .iter()
        .map(|uri| serialize_uri(uri.as_str()))
        .fold(String::from("DESCRIBE"), |mut text, uri| {
            text.push(' ');
            text.push_str(&uri);
            text
        });
    let mut describe = QueryDescriptor::parse(&text);
    scope.apply(&mut describe);

    let triples = match scope.run(&describe, false)? {
        QueryResults::Triples(triples) => triples,
        other => return Err(unexpected("triples", &other)),
    };
    let mut resources = materializer.materialize(&triples);
    if sorted {
        resources.reorder(&uris);
    }
    Ok(resources)
}

/// Distinct URI values of `variable`, first-seen order.
fn project(
    scope: &dyn Scope,
    descriptor: &QueryDescriptor,
    variable: &str,
    inference: bool,
) -> Result<Vec<Uri>> {
    let rows = match scope.run(descriptor, inference)? {
        QueryResults::Bindings(rows) => rows,
        other => return Err(unexpected("bindings", &other)),
    };
    let uris: IndexSet<Uri> = rows
        .iter()
        .filter_map(|row| row.get(variable).and_then(Value::as_uri).cloned())
        .collect();
    Ok(uris.into_iter().collect())
}

fn read_count(results: QueryResults) -> Result<u64> {
    let QueryResults::Bindings(rows) = results else {
        return Err(unexpected("bindings", &results));
    };
    // A COUNT always answers one row with a non-negative `count`.
    rows.first()
        .and_then(|row| row.get("count"))
        .and_then(Value::as_i64)
        .and_then(|count| u64::try_from(count).ok())
        .ok_or(Error::UnexpectedResult {
            expected: "count binding",
            actual: "bindings",
        })
}

fn unexpected(expected: &'static str, actual: &QueryResults) -> Error {
    Error::UnexpectedResult {
        expected,
        actual: actual.kind(),
    }
}

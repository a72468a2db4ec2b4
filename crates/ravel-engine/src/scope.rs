//! Execution scopes: a single model graph or a group of them.

use std::sync::Arc;

use ravel_core::{QueryResults, Store, Uri};
use ravel_sparql::serialize::serialize_uri;
use ravel_sparql::{QueryDescriptor, QueryGraph, QueryId};

use crate::mapping::{MappingRegistry, TypeMapping};
use crate::materialize::{Resource, ResourceMaterializer, ResourceSet};
use crate::query::SparqlQuery;
use crate::result::{QueryResult, ResourceQueryResult};
use crate::{Error, Result};

/// Graphs, store and type mappings a query runs against.
pub trait Scope {
    fn store(&self) -> &dyn Store;

    fn mappings(&self) -> &dyn TypeMapping;

    /// Graphs injected as FROM clauses.
    fn graphs(&self) -> &[Uri];

    /// Model hydrated resources are bound to, if any.
    fn owner(&self) -> Option<&Uri> {
        None
    }

    /// Restrict `descriptor` to this scope's graphs.
    fn apply(&self, descriptor: &mut QueryDescriptor) {
        for graph in self.graphs() {
            descriptor.add_default_graph(graph);
        }
    }

    /// Run `descriptor` as-is against the store.
    fn run(&self, descriptor: &QueryDescriptor, inference: bool) -> Result<QueryResults> {
        let text = descriptor.serialize()?;
        tracing::debug!(query = %text, inference, "executing query");
        Ok(self.store().execute(&text, inference)?)
    }

    fn execute(&self, query: &SparqlQuery) -> Result<QueryResult<'_>>
    where
        Self: Sized,
    {
        Ok(QueryResult::new(self, query))
    }

    fn execute_builder(&self, graph: &QueryGraph, root: QueryId) -> Result<ResourceQueryResult<'_>>
    where
        Self: Sized,
    {
        ResourceQueryResult::new(self, graph, root)
    }
}

/// One named graph in a store.
pub struct Model {
    graphs: [Uri; 1],
    store: Arc<dyn Store>,
    mappings: Arc<dyn TypeMapping>,
}

impl Model {
    pub fn builder(uri: impl Into<Uri>, store: Arc<dyn Store>) -> ModelBuilder {
        ModelBuilder {
            uri: uri.into(),
            store,
            mappings: None,
        }
    }

    pub fn uri(&self) -> &Uri {
        &self.graphs[0]
    }

    /// DESCRIBE `uri` within this model.
    pub fn get_resource(&self, uri: &Uri) -> Result<ResourceSet> {
        let mut descriptor = QueryDescriptor::parse(&format!("DESCRIBE {}", serialize_uri(uri.as_str())));
        self.apply(&mut descriptor);
        let triples = match self.run(&descriptor, false)? {
            QueryResults::Triples(triples) => triples,
            other => {
                return Err(Error::UnexpectedResult {
                    expected: "triples",
                    actual: other.kind(),
                });
            }
        };
        let resources = ResourceMaterializer::new(self.mappings())
            .model(Some(self.uri().clone()))
            .materialize(&triples);
        if resources.graph().resource(uri).is_none_or(Resource::is_placeholder) {
            return Err(Error::ResourceNotFound(uri.clone()));
        }
        Ok(resources)
    }

    /// Whether `uri` is the subject of any statement in this model.
    pub fn contains_resource(&self, uri: &Uri) -> Result<bool> {
        self.ask(&format!("ASK {{ {} ?p ?o }}", serialize_uri(uri.as_str())))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(!self.ask("ASK { ?s ?p ?o }")?)
    }

    /// A new resource bound to this model. Nothing is written.
    pub fn create_resource(&self, uri: impl Into<Uri>) -> Resource {
        let mut resource = Resource::new(uri);
        resource.bind_to(Some(self.uri()));
        resource
    }

    /// Remove every statement of this model.
    pub fn clear(&self) -> Result<()> {
        self.execute_update(&format!("CLEAR GRAPH {}", serialize_uri(self.uri().as_str())))
    }

    pub fn execute_update(&self, update: &str) -> Result<()> {
        tracing::debug!(update, "executing update");
        Ok(self.store.execute_update(update)?)
    }

    fn ask(&self, text: &str) -> Result<bool> {
        let query = SparqlQuery::from_descriptor(QueryDescriptor::parse(text));
        self.execute(&query)?.ask()
    }
}

impl Scope for Model {
    fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    fn mappings(&self) -> &dyn TypeMapping {
        self.mappings.as_ref()
    }

    fn graphs(&self) -> &[Uri] {
        &self.graphs
    }

    fn owner(&self) -> Option<&Uri> {
        Some(self.uri())
    }
}

pub struct ModelBuilder {
    uri: Uri,
    store: Arc<dyn Store>,
    mappings: Option<Arc<dyn TypeMapping>>,
}

impl ModelBuilder {
    pub fn mappings(mut self, mappings: Arc<dyn TypeMapping>) -> Self {
        self.mappings = Some(mappings);
        self
    }

    /// Without mappings every resource hydrates as the generic type.
    pub fn build(self) -> Model {
        Model {
            graphs: [self.uri],
            store: self.store,
            mappings: self
                .mappings
                .unwrap_or_else(|| Arc::new(MappingRegistry::new())),
        }
    }
}

/// Several graphs queried as one default graph.
pub struct ModelGroup {
    graphs: Vec<Uri>,
    store: Arc<dyn Store>,
    mappings: Arc<dyn TypeMapping>,
}

impl ModelGroup {
    pub fn builder(store: Arc<dyn Store>) -> ModelGroupBuilder {
        ModelGroupBuilder {
            graphs: Vec::new(),
            store,
            mappings: None,
        }
    }
}

impl Scope for ModelGroup {
    fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    fn mappings(&self) -> &dyn TypeMapping {
        self.mappings.as_ref()
    }

    fn graphs(&self) -> &[Uri] {
        &self.graphs
    }
}

pub struct ModelGroupBuilder {
    graphs: Vec<Uri>,
    store: Arc<dyn Store>,
    mappings: Option<Arc<dyn TypeMapping>>,
}

impl ModelGroupBuilder {
    pub fn model(mut self, uri: impl Into<Uri>) -> Self {
        let uri = uri.into();
        if !self.graphs.contains(&uri) {
            self.graphs.push(uri);
        }
        self
    }

    pub fn mappings(mut self, mappings: Arc<dyn TypeMapping>) -> Self {
        self.mappings = Some(mappings);
        self
    }

    pub fn build(self) -> ModelGroup {
        ModelGroup {
            graphs: self.graphs,
            store: self.store,
            mappings: self
                .mappings
                .unwrap_or_else(|| Arc::new(MappingRegistry::new())),
        }
    }
}

//! Triples to resources.

use indexmap::{IndexMap, IndexSet};
use ravel_core::{BindingSet, Class, Property, Triple, Uri, Value};
use ravel_sparql::QueryDescriptor;

use crate::mapping::{TypeMapping, TypeName};

use super::graph::{PropertyValue, Resource, ResourceGraph, ResourceId, ResourceSet};

/// Hydrates one batch of triples into a fresh [`ResourceSet`].
///
/// The identity cache lives for a single [`materialize`](Self::materialize)
/// call: a URI met several times within the batch maps to one resource.
pub struct ResourceMaterializer<'m> {
    mappings: &'m dyn TypeMapping,
    base: TypeName,
    inference: bool,
    model: Option<Uri>,
}

impl<'m> ResourceMaterializer<'m> {
    pub fn new(mappings: &'m dyn TypeMapping) -> Self {
        Self {
            mappings,
            base: TypeName::resource(),
            inference: false,
            model: None,
        }
    }

    /// Restrict results to subjects assignable to `base`.
    pub fn base_type(mut self, base: TypeName) -> Self {
        self.base = base;
        self
    }

    pub fn inference(mut self, inference: bool) -> Self {
        self.inference = inference;
        self
    }

    /// Bind hydrated resources to `model`.
    pub fn model(mut self, model: Option<Uri>) -> Self {
        self.model = model;
        self
    }

    pub fn materialize(&self, triples: &[Triple]) -> ResourceSet {
        let classes = collect_classes(triples);
        let mut graph = ResourceGraph::new();
        let mut subjects: IndexSet<ResourceId> = IndexSet::new();

        for triple in triples {
            let Some(subject) = node_uri(&triple.subject) else {
                continue;
            };
            let id = self.subject(&mut graph, subject);
            subjects.insert(id);

            if is_type_statement(triple) {
                continue;
            }

            let value = match node_uri(&triple.object) {
                Some(object) => PropertyValue::Resource(self.object(&mut graph, object)),
                None => PropertyValue::Literal(triple.object.clone()),
            };
            graph[id].attach(Property::new(triple.predicate.clone()), value);
        }

        let roots = subjects
            .into_iter()
            .filter(|&id| {
                let resource = &mut graph[id];
                for class in classes.get(resource.uri()).into_iter().flatten() {
                    resource.attach_class(class.clone());
                }
                match self.resolve_type(resource.classes()) {
                    Some(ty) => {
                        resource.set_program_type(ty);
                        true
                    }
                    None => false,
                }
            })
            .collect();

        ResourceSet::new(graph, roots)
    }

    /// Hydrate the rows of a statement-providing SELECT.
    pub fn materialize_rows(&self, descriptor: &QueryDescriptor, rows: &[BindingSet]) -> ResourceSet {
        self.materialize(&rows_to_triples(descriptor, rows))
    }

    fn subject(&self, graph: &mut ResourceGraph, uri: Uri) -> ResourceId {
        let id = match graph.id_of(&uri) {
            Some(id) => id,
            None => graph.insert(Resource::new(uri)),
        };
        let resource = &mut graph[id];
        if !resource.is_synchronized() {
            // New, or a placeholder met earlier as an object.
            resource.mark_synchronized();
            resource.bind_to(self.model.as_ref());
        }
        id
    }

    fn object(&self, graph: &mut ResourceGraph, uri: Uri) -> ResourceId {
        if let Some(id) = graph.id_of(&uri) {
            return id;
        }
        let id = graph.insert(Resource::placeholder(uri));
        graph[id].bind_to(self.model.as_ref());
        id
    }

    /// Most specific mapped type, the generic type when nothing maps and no
    /// specific base was asked for, `None` to exclude the subject.
    fn resolve_type(&self, classes: &[Class]) -> Option<TypeName> {
        match self
            .mappings
            .matching_types(classes, &self.base, self.inference)
            .into_iter()
            .next()
        {
            Some(ty) => Some(ty),
            None if self.base.is_resource() => Some(TypeName::resource()),
            None => None,
        }
    }
}

/// `rdf:type` objects per subject, gathered before hydration.
fn collect_classes(triples: &[Triple]) -> IndexMap<Uri, Vec<Class>> {
    let mut classes: IndexMap<Uri, Vec<Class>> = IndexMap::new();
    for triple in triples.iter().filter(|t| is_type_statement(t)) {
        let (Some(subject), Some(class)) = (node_uri(&triple.subject), triple.object.as_uri()) else {
            continue;
        };
        let list = classes.entry(subject).or_default();
        let class = Class::new(class.clone());
        if !list.contains(&class) {
            list.push(class);
        }
    }
    classes
}

fn is_type_statement(triple: &Triple) -> bool {
    triple.predicate == *Property::rdf_type().uri() && triple.object.is_uri()
}

/// Identity key of a node. Blank nodes keep their `_:` label.
fn node_uri(value: &Value) -> Option<Uri> {
    match value {
        Value::Uri(uri) => Some(uri.clone()),
        Value::BlankNode(label) => Some(Uri::new(format!("_:{label}"))),
        _ => None,
    }
}

/// Read rows through the descriptor's subject, predicate and object variables.
pub(crate) fn rows_to_triples(descriptor: &QueryDescriptor, rows: &[BindingSet]) -> Vec<Triple> {
    let Some([s, p, o]) = descriptor.statement_variables() else {
        return Vec::new();
    };
    rows.iter()
        .filter_map(|row| {
            let (Some(subject), Some(predicate), Some(object)) = (row.get(s), row.get(p), row.get(o))
            else {
                tracing::debug!(?row, "skipping row with unbound statement variables");
                return None;
            };
            let Some(predicate) = predicate.as_uri() else {
                tracing::debug!(?row, "skipping row whose predicate is not a uri");
                return None;
            };
            Some(Triple::new(subject.clone(), predicate.clone(), object.clone()))
        })
        .collect()
}

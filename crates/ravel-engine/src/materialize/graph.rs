//! Hydrated resources and the arena holding them.

use std::ops::{Index, IndexMut};

use indexmap::IndexMap;
use ravel_core::{Class, Property, Uri, Value};
use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::mapping::TypeName;

/// Index of a resource in its [`ResourceGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u32);

impl ResourceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A property value: a literal, or another resource of the same graph.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Literal(Value),
    Resource(ResourceId),
}

impl PropertyValue {
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            PropertyValue::Literal(value) => Some(value),
            PropertyValue::Resource(_) => None,
        }
    }

    pub fn as_resource(&self) -> Option<ResourceId> {
        match self {
            PropertyValue::Resource(id) => Some(*id),
            PropertyValue::Literal(_) => None,
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        PropertyValue::Literal(value)
    }
}

impl From<ResourceId> for PropertyValue {
    fn from(id: ResourceId) -> Self {
        PropertyValue::Resource(id)
    }
}

/// A graph node as a typed, mutable object.
#[derive(Debug, Clone)]
pub struct Resource {
    uri: Uri,
    program_type: TypeName,
    classes: Vec<Class>,
    properties: IndexMap<Property, Vec<PropertyValue>>,
    model: Option<Uri>,
    is_new: bool,
    is_synchronized: bool,
    is_placeholder: bool,
}

impl Resource {
    /// A resource that does not exist in any store yet.
    pub fn new(uri: impl Into<Uri>) -> Self {
        Self {
            uri: uri.into(),
            program_type: TypeName::resource(),
            classes: Vec::new(),
            properties: IndexMap::new(),
            model: None,
            is_new: true,
            is_synchronized: false,
            is_placeholder: false,
        }
    }

    pub(crate) fn placeholder(uri: Uri) -> Self {
        Self {
            is_new: false,
            is_placeholder: true,
            ..Self::new(uri)
        }
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn program_type(&self) -> &TypeName {
        &self.program_type
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub fn model(&self) -> Option<&Uri> {
        self.model.as_ref()
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn is_synchronized(&self) -> bool {
        self.is_synchronized
    }

    /// Only referenced as an object, never described.
    pub fn is_placeholder(&self) -> bool {
        self.is_placeholder
    }

    pub fn properties(&self) -> impl Iterator<Item = (&Property, &[PropertyValue])> {
        self.properties.iter().map(|(p, v)| (p, v.as_slice()))
    }

    pub fn values(&self, property: &Property) -> &[PropertyValue] {
        self.properties.get(property).map_or(&[], Vec::as_slice)
    }

    pub fn value(&self, property: &Property) -> Option<&PropertyValue> {
        self.values(property).first()
    }

    pub fn has_property(&self, property: &Property) -> bool {
        !self.values(property).is_empty()
    }

    pub fn has_class(&self, class: &Class) -> bool {
        self.classes.contains(class)
    }

    /// Replace all values of `property`.
    pub fn set(&mut self, property: impl Into<Property>, value: impl Into<PropertyValue>) {
        self.properties.insert(property.into(), vec![value.into()]);
        self.is_synchronized = false;
    }

    pub fn add(&mut self, property: impl Into<Property>, value: impl Into<PropertyValue>) {
        self.attach(property.into(), value.into());
        self.is_synchronized = false;
    }

    /// Drop all values of `property`, returning them.
    pub fn remove(&mut self, property: &Property) -> Vec<PropertyValue> {
        let removed = self.properties.shift_remove(property).unwrap_or_default();
        if !removed.is_empty() {
            self.is_synchronized = false;
        }
        removed
    }

    pub fn add_class(&mut self, class: impl Into<Class>) {
        if self.attach_class(class.into()) {
            self.is_synchronized = false;
        }
    }

    /// Add without touching the synchronization flag. Duplicates are ignored.
    pub(crate) fn attach(&mut self, property: Property, value: PropertyValue) {
        let values = self.properties.entry(property).or_default();
        if !values.contains(&value) {
            values.push(value);
        }
    }

    pub(crate) fn attach_class(&mut self, class: Class) -> bool {
        if self.classes.contains(&class) {
            return false;
        }
        self.classes.push(class);
        true
    }

    pub(crate) fn set_program_type(&mut self, ty: TypeName) {
        self.program_type = ty;
    }

    pub(crate) fn bind_to(&mut self, model: Option<&Uri>) {
        self.model = model.cloned();
    }

    /// Mark as loaded from the store.
    pub(crate) fn mark_synchronized(&mut self) {
        self.is_new = false;
        self.is_synchronized = true;
        self.is_placeholder = false;
    }
}

/// Arena of resources with a URI identity index.
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    resources: Vec<Resource>,
    index: IndexMap<Uri, ResourceId>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(id.index())
    }

    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut Resource> {
        self.resources.get_mut(id.index())
    }

    pub fn id_of(&self, uri: &Uri) -> Option<ResourceId> {
        self.index.get(uri).copied()
    }

    pub fn resource(&self, uri: &Uri) -> Option<&Resource> {
        self.id_of(uri).and_then(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &Resource)> {
        self.resources
            .iter()
            .enumerate()
            .map(|(i, r)| (ResourceId(i as u32), r))
    }

    /// Add `resource`, or return the id already holding its URI.
    pub fn insert(&mut self, resource: Resource) -> ResourceId {
        if let Some(id) = self.id_of(&resource.uri) {
            return id;
        }
        let id = ResourceId(self.resources.len() as u32);
        self.index.insert(resource.uri.clone(), id);
        self.resources.push(resource);
        id
    }

    /// URI of the resource a property value points at.
    pub fn target(&self, value: &PropertyValue) -> Option<&Uri> {
        value
            .as_resource()
            .and_then(|id| self.get(id))
            .map(Resource::uri)
    }
}

impl Index<ResourceId> for ResourceGraph {
    type Output = Resource;

    fn index(&self, id: ResourceId) -> &Resource {
        &self.resources[id.index()]
    }
}

impl IndexMut<ResourceId> for ResourceGraph {
    fn index_mut(&mut self, id: ResourceId) -> &mut Resource {
        &mut self.resources[id.index()]
    }
}

/// The outcome of one materialization: an ordered, de-duplicated list of
/// resources plus the graph their property values point into.
#[derive(Debug, Clone, Default)]
pub struct ResourceSet {
    graph: ResourceGraph,
    roots: Vec<ResourceId>,
}

impl ResourceSet {
    pub(crate) fn new(graph: ResourceGraph, roots: Vec<ResourceId>) -> Self {
        Self { graph, roots }
    }

    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut ResourceGraph {
        &mut self.graph
    }

    pub fn ids(&self) -> &[ResourceId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn first(&self) -> Option<&Resource> {
        self.roots.first().map(|&id| &self.graph[id])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.roots.iter().map(|&id| &self.graph[id])
    }

    pub fn uris(&self) -> Vec<Uri> {
        self.iter().map(|r| r.uri().clone()).collect()
    }

    pub fn into_parts(self) -> (ResourceGraph, Vec<ResourceId>) {
        (self.graph, self.roots)
    }

    /// Stable reorder by position of each URI in `order`. Resources absent
    /// from `order` go last.
    pub(crate) fn reorder(&mut self, order: &[Uri]) {
        let position: IndexMap<&Uri, usize> =
            order.iter().enumerate().map(|(i, u)| (u, i)).collect();
        let graph = &self.graph;
        self.roots.sort_by_key(|&id| {
            position
                .get(graph[id].uri())
                .copied()
                .unwrap_or(usize::MAX)
        });
    }
}

/// Resources serialize with their values resolved to URIs.
struct ResourceView<'a> {
    graph: &'a ResourceGraph,
    resource: &'a Resource,
}

struct ValuesView<'a> {
    graph: &'a ResourceGraph,
    values: &'a [PropertyValue],
}

struct PropertiesView<'a> {
    graph: &'a ResourceGraph,
    resource: &'a Resource,
}

impl Serialize for ResourceView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("Resource", 4)?;
        s.serialize_field("uri", self.resource.uri())?;
        s.serialize_field("type", self.resource.program_type())?;
        s.serialize_field("classes", self.resource.classes())?;
        s.serialize_field(
            "properties",
            &PropertiesView {
                graph: self.graph,
                resource: self.resource,
            },
        )?;
        s.end()
    }
}

impl Serialize for PropertiesView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.resource.properties.len()))?;
        for (property, values) in self.resource.properties() {
            map.serialize_entry(
                property.uri(),
                &ValuesView {
                    graph: self.graph,
                    values,
                },
            )?;
        }
        map.end()
    }
}

impl Serialize for ValuesView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.values.len()))?;
        for value in self.values {
            match value {
                PropertyValue::Literal(literal) => seq.serialize_element(literal)?,
                PropertyValue::Resource(_) => seq.serialize_element(&self.graph.target(value))?,
            }
        }
        seq.end()
    }
}

impl Serialize for ResourceSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.roots.len()))?;
        for resource in self.iter() {
            seq.serialize_element(&ResourceView {
                graph: &self.graph,
                resource,
            })?;
        }
        seq.end()
    }
}

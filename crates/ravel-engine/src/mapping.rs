//! Program types and their mapping to RDF classes.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use ravel_core::Class;
use serde::Serialize;

const RESOURCE_TYPE: &str = "Resource";

/// Name of a program-side resource type.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TypeName(Arc<str>);

impl TypeName {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// The generic type every resource is assignable to.
    pub fn resource() -> Self {
        Self::new(RESOURCE_TYPE)
    }

    pub fn is_resource(&self) -> bool {
        &*self.0 == RESOURCE_TYPE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeName({})", self.0)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Resolves the RDF classes of a subject to program types.
pub trait TypeMapping: Send + Sync {
    /// Types mapped to any of `classes` and assignable to `base`, most
    /// specific first.
    fn matching_types(&self, classes: &[Class], base: &TypeName, inference: bool) -> Vec<TypeName>;
}

#[derive(Debug, Clone, Default)]
struct TypeEntry {
    classes: Vec<Class>,
    parent: Option<TypeName>,
}

/// Registration-ordered table of program types.
///
/// Populated at start-up, then shared read-only behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct MappingRegistry {
    types: IndexMap<TypeName, TypeEntry>,
    superclasses: IndexMap<Class, Vec<Class>>,
}

impl MappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `ty` to `class`. Registering the same type again adds a class.
    pub fn register(&mut self, ty: impl Into<TypeName>, class: impl Into<Class>) -> &mut Self {
        let class = class.into();
        let entry = self.types.entry(ty.into()).or_default();
        if !entry.classes.contains(&class) {
            entry.classes.push(class);
        }
        self
    }

    /// Map `ty` to `class` and make it a subtype of `parent`.
    pub fn register_subtype(
        &mut self,
        ty: impl Into<TypeName>,
        class: impl Into<Class>,
        parent: impl Into<TypeName>,
    ) -> &mut Self {
        let ty = ty.into();
        self.register(ty.clone(), class);
        if let Some(entry) = self.types.get_mut(&ty) {
            entry.parent = Some(parent.into());
        }
        self
    }

    /// Declare an `rdfs:subClassOf` edge, honoured when inference is on.
    pub fn declare_subclass(&mut self, sub: impl Into<Class>, sup: impl Into<Class>) -> &mut Self {
        let sup = sup.into();
        let supers = self.superclasses.entry(sub.into()).or_default();
        if !supers.contains(&sup) {
            supers.push(sup);
        }
        self
    }

    pub fn contains(&self, ty: &TypeName) -> bool {
        self.types.contains_key(ty)
    }

    pub fn classes(&self, ty: &TypeName) -> &[Class] {
        self.types.get(ty).map_or(&[], |entry| &entry.classes)
    }

    pub fn parent(&self, ty: &TypeName) -> Option<&TypeName> {
        self.types.get(ty)?.parent.as_ref()
    }

    /// `ty` itself followed by its ancestors. Stops at the first repeat.
    fn lineage<'a>(&'a self, ty: &'a TypeName) -> Vec<&'a TypeName> {
        let mut chain = vec![ty];
        let mut current = ty;
        while let Some(parent) = self.parent(current) {
            if chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    pub fn is_assignable(&self, ty: &TypeName, base: &TypeName) -> bool {
        base.is_resource() || self.lineage(ty).contains(&base)
    }

    fn depth(&self, ty: &TypeName) -> usize {
        self.lineage(ty).len()
    }

    fn closure(&self, classes: &[Class], inference: bool) -> IndexSet<Class> {
        let mut seen: IndexSet<Class> = classes.iter().cloned().collect();
        if !inference {
            return seen;
        }
        let mut queue: VecDeque<Class> = classes.iter().cloned().collect();
        while let Some(class) = queue.pop_front() {
            for sup in self.superclasses.get(&class).into_iter().flatten() {
                if seen.insert(sup.clone()) {
                    queue.push_back(sup.clone());
                }
            }
        }
        seen
    }
}

impl TypeMapping for MappingRegistry {
    fn matching_types(&self, classes: &[Class], base: &TypeName, inference: bool) -> Vec<TypeName> {
        let closure = self.closure(classes, inference);
        let mut matches: Vec<(usize, &TypeName)> = self
            .types
            .iter()
            .filter(|(ty, entry)| {
                entry.classes.iter().any(|c| closure.contains(c)) && self.is_assignable(ty, base)
            })
            .map(|(ty, _)| (self.depth(ty), ty))
            .collect();
        // Stable: equally deep types keep registration order.
        matches.sort_by(|a, b| b.0.cmp(&a.0));

        if let [(first, winner), (second, other), ..] = matches.as_slice()
            && first == second
        {
            tracing::debug!(%winner, %other, "ambiguous type resolution, using first match");
        }

        matches.into_iter().map(|(_, ty)| ty.clone()).collect()
    }
}

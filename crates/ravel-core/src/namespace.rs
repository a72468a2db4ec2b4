//! Prefix to namespace mapping.
//!
//! The rewriter consults a [`NamespaceResolver`] when asked to declare the
//! prefixes a query uses but never declares. A process-wide registry is
//! available through [`NamespaceRegistry::global`]; it is meant to be filled
//! once at start-up and read afterwards.

use std::sync::LazyLock;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::uri::Uri;
use crate::vocab::{owl, rdf, rdfs, xsd};

/// Anything that can map a prefix to its namespace URI.
pub trait NamespaceResolver {
    fn resolve(&self, prefix: &str) -> Option<Uri>;
}

static GLOBAL: LazyLock<RwLock<NamespaceRegistry>> =
    LazyLock::new(|| RwLock::new(NamespaceRegistry::with_defaults()));

#[derive(Debug, Clone, Default)]
pub struct NamespaceRegistry {
    prefixes: IndexMap<String, Uri>,
}

impl NamespaceRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry knowing `rdf`, `rdfs`, `owl` and `xsd`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("rdf", rdf::NAMESPACE);
        registry.register("rdfs", rdfs::NAMESPACE);
        registry.register("owl", owl::NAMESPACE);
        registry.register("xsd", xsd::NAMESPACE);
        registry
    }

    /// The process-wide registry.
    pub fn global() -> &'static RwLock<NamespaceRegistry> {
        &GLOBAL
    }

    /// Register (or replace) a prefix. Returns the previous namespace.
    pub fn register(&mut self, prefix: impl Into<String>, namespace: impl Into<Uri>) -> Option<Uri> {
        self.prefixes.insert(prefix.into(), namespace.into())
    }

    pub fn get(&self, prefix: &str) -> Option<&Uri> {
        self.prefixes.get(prefix)
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Uri)> {
        self.prefixes.iter().map(|(p, ns)| (p.as_str(), ns))
    }
}

impl NamespaceResolver for NamespaceRegistry {
    fn resolve(&self, prefix: &str) -> Option<Uri> {
        self.get(prefix).cloned()
    }
}

impl NamespaceResolver for RwLock<NamespaceRegistry> {
    fn resolve(&self, prefix: &str) -> Option<Uri> {
        self.read().resolve(prefix)
    }
}

impl<R: NamespaceResolver + ?Sized> NamespaceResolver for &R {
    fn resolve(&self, prefix: &str) -> Option<Uri> {
        (**self).resolve(prefix)
    }
}

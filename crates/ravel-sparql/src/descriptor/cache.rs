use std::collections::HashMap;
use std::sync::LazyLock;

use parking_lot::RwLock;

use super::query::QueryDescriptor;

static GLOBAL: LazyLock<DescriptorCache> = LazyLock::new(DescriptorCache::new);

/// Parsed descriptors keyed by their source text.
///
/// Lookups hand out clones, so binding or editing a returned descriptor never
/// affects the cached one.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: RwLock<HashMap<String, QueryDescriptor>>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache.
    pub fn global() -> &'static DescriptorCache {
        &GLOBAL
    }

    pub fn get_or_parse(&self, text: &str) -> QueryDescriptor {
        if let Some(descriptor) = self.entries.read().get(text) {
            return descriptor.clone();
        }
        let parsed = QueryDescriptor::parse(text);
        self.entries
            .write()
            .entry(text.to_owned())
            .or_insert(parsed)
            .clone()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.read().contains_key(text)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

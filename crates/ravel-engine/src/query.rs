use ravel_core::{NamespaceResolver, Value};
use ravel_sparql::{DescriptorCache, QueryDescriptor, QueryForm};

use crate::Result;

/// Query text prepared for execution: parameters bound, prefixes declared,
/// inference chosen.
#[derive(Debug, Clone)]
pub struct SparqlQuery {
    descriptor: QueryDescriptor,
    inference: bool,
}

impl SparqlQuery {
    /// Parse `text` through the process-wide descriptor cache.
    pub fn new(text: &str) -> Self {
        Self::from_descriptor(DescriptorCache::global().get_or_parse(text))
    }

    pub fn from_descriptor(descriptor: QueryDescriptor) -> Self {
        Self {
            descriptor,
            inference: false,
        }
    }

    pub fn bind(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.descriptor.bind(name, &value.into())?;
        Ok(self)
    }

    pub fn inference(mut self, inference: bool) -> Self {
        self.inference = inference;
        self
    }

    pub fn declare_prefixes(mut self, resolver: &impl NamespaceResolver) -> Result<Self> {
        self.descriptor.declare_prefixes(resolver)?;
        Ok(self)
    }

    pub fn descriptor(&self) -> &QueryDescriptor {
        &self.descriptor
    }

    pub fn form(&self) -> QueryForm {
        self.descriptor.form()
    }

    pub fn is_inferencing(&self) -> bool {
        self.inference
    }

    pub fn to_text(&self) -> Result<String> {
        Ok(self.descriptor.serialize()?)
    }
}

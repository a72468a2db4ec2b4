mod cache;
mod classify;
mod query;

#[cfg(test)]
mod descriptor_tests;

pub use cache::DescriptorCache;
pub use classify::QueryForm;
pub use query::QueryDescriptor;

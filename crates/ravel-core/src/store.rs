//! The backend seam: what a triple store must answer.

use indexmap::IndexMap;
use serde::Serialize;

use crate::uri::Uri;
use crate::value::Value;

/// One statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    /// A [`Value::Uri`] or [`Value::BlankNode`].
    pub subject: Value,
    pub predicate: Uri,
    pub object: Value,
}

impl Triple {
    pub fn new(subject: impl Into<Value>, predicate: impl Into<Uri>, object: impl Into<Value>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// One solution row: output variable name (without `?`) to value.
///
/// Unbound variables are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BindingSet(IndexMap<String, Value>);

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variable: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(variable.into(), value)
    }

    pub fn get(&self, variable: &str) -> Option<&Value> {
        self.0.get(variable)
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.0.contains_key(variable)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for BindingSet {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// What a store hands back for a query, by query form.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResults {
    /// ASK.
    Boolean(bool),
    /// SELECT.
    Bindings(Vec<BindingSet>),
    /// DESCRIBE and CONSTRUCT.
    Triples(Vec<Triple>),
}

impl QueryResults {
    pub fn kind(&self) -> &'static str {
        match self {
            QueryResults::Boolean(_) => "boolean",
            QueryResults::Bindings(_) => "bindings",
            QueryResults::Triples(_) => "triples",
        }
    }
}

/// Failures reported by a backend. Passed through the query layer untouched.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The backend failed: connectivity, I/O, internal errors.
    #[error("store failure: {0}")]
    Backend(String),

    /// The backend could not parse the query text.
    #[error("malformed query: {0}")]
    Malformed(String),

    /// The backend does not support the requested feature.
    #[error("unsupported by store: {0}")]
    Unsupported(String),
}

/// A triple store connection.
///
/// One handle may serve many sequential calls; concurrent calls on the same
/// handle are the backend's business.
pub trait Store: Send + Sync {
    /// Evaluate query text. `inference` asks the backend to answer under its
    /// entailment rules.
    fn execute(&self, query: &str, inference: bool) -> Result<QueryResults, StoreError>;

    /// Run an update request.
    fn execute_update(&self, update: &str) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    fn execute(&self, query: &str, inference: bool) -> Result<QueryResults, StoreError> {
        (**self).execute(query, inference)
    }

    fn execute_update(&self, update: &str) -> Result<(), StoreError> {
        (**self).execute_update(update)
    }
}

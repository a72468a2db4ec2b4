use ravel_core::{StoreError, Uri};
use ravel_sparql::QueryForm;

/// Errors raised while executing queries or materializing their results.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// An accessor was called against the wrong query form.
    #[error("expected a {expected} query, found {actual}")]
    QueryTypeMismatch {
        expected: QueryForm,
        actual: QueryForm,
    },

    /// Resources were requested from a query whose rows are not triples.
    #[error("{0} query does not provide statements")]
    QueryShapeMismatch(QueryForm),

    #[error("resource not found: {0}")]
    ResourceNotFound(Uri),

    /// The store answered with a different result shape than the query form implies.
    #[error("store returned {actual}, expected {expected}")]
    UnexpectedResult {
        expected: &'static str,
        actual: &'static str,
    },

    #[error(transparent)]
    Sparql(#[from] ravel_sparql::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, Error>;

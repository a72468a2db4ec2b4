//! URI-backed identifiers.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// An absolute URI. Cloning is a reference-count bump.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Uri(Arc<str>);

impl Uri {
    pub fn new(uri: impl Into<Arc<str>>) -> Self {
        Self(uri.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part after the last `#`, `/` or `:`.
    ///
    /// Falls back to the whole URI when it ends with a separator.
    pub fn local_name(&self) -> &str {
        let s = self.as_str();
        match s.rfind(['#', '/', ':']) {
            Some(idx) if idx + 1 < s.len() => &s[idx + 1..],
            _ => s,
        }
    }
}

impl fmt::Debug for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Uri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Uri {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Uri {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&Uri> for Uri {
    fn from(uri: &Uri) -> Self {
        uri.clone()
    }
}

/// A predicate identifier. Two properties are the same iff their URIs are.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize)]
#[serde(transparent)]
pub struct Property(Uri);

impl Property {
    pub fn new(uri: impl Into<Uri>) -> Self {
        Self(uri.into())
    }

    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.0
    }

    /// The `rdf:type` property.
    pub fn rdf_type() -> Self {
        Self::new(crate::vocab::rdf::TYPE)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Property {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<Uri> for Property {
    fn from(uri: Uri) -> Self {
        Self(uri)
    }
}

/// An `rdf:type` value.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize)]
#[serde(transparent)]
pub struct Class(Uri);

impl Class {
    pub fn new(uri: impl Into<Uri>) -> Self {
        Self(uri.into())
    }

    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.0
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Class {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<Uri> for Class {
    fn from(uri: Uri) -> Self {
        Self(uri)
    }
}

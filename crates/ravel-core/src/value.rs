//! Typed values: URIs, plain and language-tagged strings, and XSD-typed literals.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;

use crate::uri::{Class, Property, Uri};
use crate::vocab::{rdf, xsd};

/// A node or literal as it appears in a triple or a solution row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A URI-identified node: a resource, a model, a class.
    Uri(Uri),
    /// A plain string literal.
    String(String),
    /// A language-tagged string, e.g. `"chat"@fr`.
    LangString { value: String, lang: String },
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// Decimal kept in its lexical form to preserve precision.
    Decimal(String),
    /// Always normalized to UTC.
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    Bytes(Vec<u8>),
    /// A literal whose datatype has no native mapping.
    Typed { lexical: String, datatype: Uri },
    /// A blank node label (without the `_:` prefix).
    BlankNode(String),
}

impl Value {
    pub fn uri(uri: impl Into<Uri>) -> Self {
        Value::Uri(uri.into())
    }

    pub fn lang(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Value::LangString {
            value: value.into(),
            lang: lang.into(),
        }
    }

    pub fn typed(lexical: impl Into<String>, datatype: impl Into<Uri>) -> Self {
        Value::Typed {
            lexical: lexical.into(),
            datatype: datatype.into(),
        }
    }

    /// Datatype URI for literal values; `None` for URIs and blank nodes.
    pub fn datatype(&self) -> Option<&str> {
        let datatype = match self {
            Value::Uri(_) | Value::BlankNode(_) => return None,
            Value::String(_) => xsd::STRING,
            Value::LangString { .. } => rdf::LANG_STRING,
            Value::Boolean(_) => xsd::BOOLEAN,
            Value::Int(_) => xsd::INT,
            Value::Long(_) => xsd::LONG,
            Value::Float(_) => xsd::FLOAT,
            Value::Double(_) => xsd::DOUBLE,
            Value::Decimal(_) => xsd::DECIMAL,
            Value::DateTime(_) => xsd::DATE_TIME,
            Value::Date(_) => xsd::DATE,
            Value::Bytes(_) => xsd::BASE64_BINARY,
            Value::Typed { datatype, .. } => return Some(datatype.as_str()),
        };
        Some(datatype)
    }

    /// Lexical form of a literal; `None` for URIs and blank nodes.
    pub fn lexical_form(&self) -> Option<String> {
        let lexical = match self {
            Value::Uri(_) | Value::BlankNode(_) => return None,
            Value::String(s) => s.clone(),
            Value::LangString { value, .. } => value.clone(),
            Value::Boolean(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Long(n) => n.to_string(),
            Value::Float(f) => format_float(f64::from(*f), f.to_string()),
            Value::Double(d) => format_float(*d, d.to_string()),
            Value::Decimal(s) => s.clone(),
            Value::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Bytes(bytes) => BASE64.encode(bytes),
            Value::Typed { lexical, .. } => lexical.clone(),
        };
        Some(lexical)
    }

    /// Map a literal coming back from a store onto the closest native variant.
    ///
    /// Unknown datatypes and lexical forms that fail to parse stay [`Value::Typed`].
    pub fn from_literal(lexical: &str, datatype: Option<&str>, lang: Option<&str>) -> Self {
        if let Some(lang) = lang {
            return Value::lang(lexical, lang);
        }
        let Some(datatype) = datatype else {
            return Value::String(lexical.to_owned());
        };

        let parsed = match datatype {
            xsd::STRING => Some(Value::String(lexical.to_owned())),
            xsd::BOOLEAN => match lexical {
                "true" | "1" => Some(Value::Boolean(true)),
                "false" | "0" => Some(Value::Boolean(false)),
                _ => None,
            },
            xsd::INT | xsd::SHORT | xsd::BYTE => lexical.parse().ok().map(Value::Int),
            xsd::LONG | xsd::INTEGER | xsd::NON_NEGATIVE_INTEGER => {
                lexical.parse().ok().map(Value::Long)
            }
            xsd::FLOAT => parse_float(lexical).map(|f| Value::Float(f as f32)),
            xsd::DOUBLE => parse_float(lexical).map(Value::Double),
            xsd::DECIMAL => Some(Value::Decimal(lexical.to_owned())),
            xsd::DATE_TIME => DateTime::parse_from_rfc3339(lexical)
                .ok()
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc))),
            xsd::DATE => NaiveDate::parse_from_str(lexical, "%Y-%m-%d")
                .ok()
                .map(Value::Date),
            xsd::BASE64_BINARY => BASE64.decode(lexical).ok().map(Value::Bytes),
            _ => None,
        };

        parsed.unwrap_or_else(|| Value::typed(lexical, datatype))
    }

    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Uri(_) => "uri",
            Value::String(_) => "string",
            Value::LangString { .. } => "lang-string",
            Value::Boolean(_) => "boolean",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Decimal(_) => "decimal",
            Value::DateTime(_) => "date-time",
            Value::Date(_) => "date",
            Value::Bytes(_) => "bytes",
            Value::Typed { .. } => "typed-literal",
            Value::BlankNode(_) => "blank-node",
        }
    }

    #[inline]
    pub fn is_uri(&self) -> bool {
        matches!(self, Value::Uri(_))
    }

    pub fn as_uri(&self) -> Option<&Uri> {
        match self {
            Value::Uri(uri) => Some(uri),
            _ => None,
        }
    }

    /// String content of plain and language-tagged strings.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::LangString { value: s, .. } => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integral value of `Int`, `Long` and integer-shaped typed literals.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            Value::Typed { lexical, .. } => lexical.parse().ok(),
            _ => None,
        }
    }

    /// Numeric value of any number-shaped variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(f64::from(*n)),
            Value::Long(n) => Some(*n as f64),
            Value::Float(f) => Some(f64::from(*f)),
            Value::Double(d) => Some(*d),
            Value::Decimal(s) => s.parse().ok(),
            _ => None,
        }
    }
}

fn format_float(value: f64, display: String) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else if value == f64::INFINITY {
        "INF".to_owned()
    } else if value == f64::NEG_INFINITY {
        "-INF".to_owned()
    } else {
        display
    }
}

fn parse_float(lexical: &str) -> Option<f64> {
    match lexical {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ => lexical.parse().ok(),
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Uri(uri) => serializer.serialize_str(uri.as_str()),
            Value::String(s) | Value::LangString { value: s, .. } => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i32(*n),
            Value::Long(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f32(*f),
            Value::Double(d) => serializer.serialize_f64(*d),
            Value::BlankNode(label) => serializer.serialize_str(&format!("_:{label}")),
            other => {
                let lexical = other.lexical_form().unwrap_or_default();
                serializer.serialize_str(&lexical)
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<Uri> for Value {
    fn from(uri: Uri) -> Self {
        Value::Uri(uri)
    }
}

impl From<&Uri> for Value {
    fn from(uri: &Uri) -> Self {
        Value::Uri(uri.clone())
    }
}

impl From<Class> for Value {
    fn from(class: Class) -> Self {
        Value::Uri(class.uri().clone())
    }
}

impl From<Property> for Value {
    fn from(property: Property) -> Self {
        Value::Uri(property.uri().clone())
    }
}

//! Typed values to query literal syntax, plus the derived query shapes built
//! from a [`QueryDescriptor`].

use ravel_core::{Uri, Value};

use crate::descriptor::QueryDescriptor;
use crate::{Error, Result};

/// Literal text for `value`.
///
/// Blank nodes, and URIs holding characters an IRI reference cannot carry,
/// have no literal form and fail with [`Error::UnsupportedValueType`].
pub fn serialize_value(value: &Value) -> Result<String> {
    match value {
        Value::Uri(uri) if is_iri_ref(uri.as_str()) => Ok(serialize_uri(uri.as_str())),
        Value::Uri(_) => Err(Error::UnsupportedValueType("malformed uri".to_owned())),
        Value::String(s) => Ok(serialize_string(s)),
        Value::LangString { value, lang } => Ok(format!("{}@{}", serialize_string(value), lang)),
        Value::BlankNode(_) => Err(Error::UnsupportedValueType(value.kind().to_owned())),
        other => match (other.lexical_form(), datatype_of(other)) {
            (Some(lexical), Some(datatype)) => Ok(serialize_typed(&lexical, datatype)),
            _ => Err(Error::UnsupportedValueType(other.kind().to_owned())),
        },
    }
}

/// XSD (or rdf:langString) datatype URI used when serializing `value`.
#[inline]
pub fn datatype_of(value: &Value) -> Option<&str> {
    value.datatype()
}

pub fn serialize_uri(uri: &str) -> String {
    format!("<{uri}>")
}

/// Whether `uri` can sit between `<` and `>` unchanged.
fn is_iri_ref(uri: &str) -> bool {
    !uri.chars().any(|c| {
        c <= ' ' || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
    })
}

/// Quoted and escaped; triple-quoted when the text spans lines.
pub fn serialize_string(s: &str) -> String {
    let escaped = escape(s, '"');
    if s.contains(['\n', '\r']) {
        format!("\"\"\"{escaped}\"\"\"")
    } else {
        format!("\"{escaped}\"")
    }
}

pub fn serialize_typed(lexical: &str, datatype: &str) -> String {
    format!("'{}'^^<{}>", escape(lexical, '\''), datatype)
}

fn escape(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\\' || c == quote {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn serialize_dataset_clause(graph: &Uri, named: bool) -> String {
    if named {
        format!("FROM NAMED {}", serialize_uri(graph.as_str()))
    } else {
        format!("FROM {}", serialize_uri(graph.as_str()))
    }
}

/// `FROM` clauses for `default`, then `FROM NAMED` clauses for `named`.
pub fn serialize_dataset_clauses<'a>(
    default: impl IntoIterator<Item = &'a Uri>,
    named: impl IntoIterator<Item = &'a Uri>,
) -> String {
    default
        .into_iter()
        .map(|g| serialize_dataset_clause(g, false))
        .chain(named.into_iter().map(|g| serialize_dataset_clause(g, true)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `SELECT (COUNT(DISTINCT ?v) AS ?count)` over the descriptor's root pattern.
pub fn serialize_count(descriptor: &QueryDescriptor) -> Result<String> {
    let variable = descriptor
        .primary_variable()
        .ok_or(Error::NoPrimaryVariable)?;
    Ok(join([
        descriptor.prologue()?,
        format!("SELECT (COUNT(DISTINCT ?{variable}) AS ?count)"),
        descriptor.dataset_clauses(),
        where_group(&descriptor.where_body()?),
    ]))
}

/// `SELECT DISTINCT ?v` over the descriptor's root pattern, keeping its
/// solution modifiers. `variable` overrides the primary variable.
pub fn serialize_uri_projection(
    descriptor: &QueryDescriptor,
    variable: Option<&str>,
) -> Result<String> {
    let variable = variable
        .map(|v| v.trim_start_matches(['?', '$']))
        .or_else(|| descriptor.primary_variable())
        .ok_or(Error::NoPrimaryVariable)?;
    Ok(join([
        descriptor.prologue()?,
        format!("SELECT DISTINCT ?{variable}"),
        descriptor.dataset_clauses(),
        where_group(&descriptor.where_body()?),
        descriptor.solution_modifiers()?,
    ]))
}

fn where_group(body: &str) -> String {
    if body.is_empty() {
        "WHERE { }".to_owned()
    } else {
        format!("WHERE {{ {body} }}")
    }
}

fn join<const N: usize>(parts: [String; N]) -> String {
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

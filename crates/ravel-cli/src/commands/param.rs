//! Value parsers for `-p NAME=VALUE`, `--prefix PREFIX=IRI` and graph flags.
//!
//! Parameter values use a small slice of SPARQL term syntax: `<iri>`,
//! `"text"`, `"text"@lang`, `"lexical"^^<datatype>`, `true`/`false` and
//! numbers. Anything else is taken as a plain string.

use ravel_core::{Uri, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixDecl {
    pub prefix: String,
    pub namespace: Uri,
}

pub fn parse_binding(arg: &str) -> Result<Binding, String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{arg}`"))?;
    let name = name.trim().trim_start_matches('@');
    if name.is_empty() {
        return Err("parameter name cannot be empty".to_owned());
    }
    Ok(Binding {
        name: name.to_owned(),
        value: parse_value(value)?,
    })
}

pub fn parse_value(text: &str) -> Result<Value, String> {
    let text = text.trim();

    if text.starts_with('<') {
        return iri(text).map(Value::Uri);
    }

    if let Some(rest) = text.strip_prefix('"') {
        let end = rest
            .rfind('"')
            .ok_or_else(|| format!("unterminated string `{text}`"))?;
        let (lexical, suffix) = (&rest[..end], &rest[end + 1..]);
        if suffix.is_empty() {
            return Ok(Value::String(lexical.to_owned()));
        }
        if let Some(lang) = suffix.strip_prefix('@')
            && !lang.is_empty()
        {
            return Ok(Value::from_literal(lexical, None, Some(lang)));
        }
        if let Some(datatype) = suffix.strip_prefix("^^") {
            let datatype = iri(datatype)?;
            return Ok(Value::from_literal(lexical, Some(datatype.as_str()), None));
        }
        return Err(format!("unexpected `{suffix}` after string literal"));
    }

    match text {
        "true" => return Ok(Value::Boolean(true)),
        "false" => return Ok(Value::Boolean(false)),
        _ => {}
    }

    if let Ok(n) = text.parse::<i64>() {
        return Ok(Value::Long(n));
    }
    if looks_numeric(text)
        && let Ok(d) = text.parse::<f64>()
    {
        return Ok(Value::Double(d));
    }

    Ok(Value::String(text.to_owned()))
}

pub fn parse_prefix(arg: &str) -> Result<PrefixDecl, String> {
    let (prefix, namespace) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected PREFIX=IRI, got `{arg}`"))?;
    let prefix = prefix.trim().trim_end_matches(':');
    if prefix.is_empty() {
        return Err("prefix cannot be empty".to_owned());
    }
    Ok(PrefixDecl {
        prefix: prefix.to_owned(),
        namespace: parse_graph(namespace)?,
    })
}

/// An IRI with or without angle brackets.
pub fn parse_graph(arg: &str) -> Result<Uri, String> {
    let arg = arg.trim();
    if arg.starts_with('<') {
        return iri(arg);
    }
    if arg.is_empty() {
        return Err("IRI cannot be empty".to_owned());
    }
    Ok(Uri::new(arg))
}

fn iri(text: &str) -> Result<Uri, String> {
    text.strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .filter(|inner| !inner.is_empty())
        .map(Uri::new)
        .ok_or_else(|| format!("malformed IRI `{text}`"))
}

fn looks_numeric(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'))
}

//! Query form and projection classification.
//!
//! A single walk over the rewriter's tokens, no grammar. Brace depth separates
//! the projection (depth 0) from graph patterns; the order of the first three
//! global variables decides whether a SELECT yields triples.

use serde::Serialize;

use crate::lex::SyntaxKind;
use crate::rewrite::{Keyword, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryForm {
    Select,
    Construct,
    Describe,
    Ask,
    /// No form keyword at depth 0.
    Unknown,
}

impl QueryForm {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryForm::Select => "select",
            QueryForm::Construct => "construct",
            QueryForm::Describe => "describe",
            QueryForm::Ask => "ask",
            QueryForm::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for QueryForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Classification {
    pub form: Option<QueryForm>,
    pub provides_statements: bool,
    pub wildcard: bool,
    /// Projected (or, under `*`, first-seen) variables.
    pub global_variables: Vec<String>,
    /// Variables named right after DESCRIBE.
    pub described: Vec<String>,
}

const STATEMENT_ARITY: usize = 3;

pub(crate) fn classify(tokens: &[Token]) -> Classification {
    let mut result = Classification::default();
    let mut provides: Option<bool> = None;
    let mut depth = 0usize;
    let mut parens = 0usize;
    let mut collecting = false;
    let mut in_scope: Vec<String> = Vec::new();
    let mut previous: Option<&Token> = None;

    for token in tokens {
        match token.kind {
            TokenKind::Keyword(
                keyword @ (Keyword::Select | Keyword::Construct | Keyword::Describe | Keyword::Ask),
            ) if depth == 0 && result.form.is_none() => {
                let form = match keyword {
                    Keyword::Select => QueryForm::Select,
                    Keyword::Construct => QueryForm::Construct,
                    Keyword::Describe => QueryForm::Describe,
                    _ => QueryForm::Ask,
                };
                if matches!(form, QueryForm::Describe | QueryForm::Construct) {
                    provides = Some(true);
                }
                collecting = matches!(form, QueryForm::Select | QueryForm::Describe);
                result.form = Some(form);
            }
            TokenKind::Keyword(
                Keyword::Where
                | Keyword::From
                | Keyword::Order
                | Keyword::Group
                | Keyword::Limit
                | Keyword::Offset
                | Keyword::Values,
            ) if depth == 0 => collecting = false,
            TokenKind::Punct(SyntaxKind::ParenOpen) => parens += 1,
            TokenKind::Punct(SyntaxKind::ParenClose) => parens = parens.saturating_sub(1),
            TokenKind::Punct(SyntaxKind::Star)
                if depth == 0 && parens == 0 && collecting =>
            {
                result.wildcard = true;
            }
            TokenKind::Punct(SyntaxKind::BraceOpen) => {
                if depth == 0 {
                    collecting = false;
                }
                depth += 1;
            }
            TokenKind::Punct(SyntaxKind::BraceClose) => {
                depth = depth.saturating_sub(1);
                close_scope(&mut result, &mut provides, &mut in_scope);
            }
            TokenKind::Punct(SyntaxKind::Dot) if depth > 0 => {
                close_scope(&mut result, &mut provides, &mut in_scope);
            }
            TokenKind::Variable => {
                let Some(name) = token.variable_name() else {
                    continue;
                };
                if depth == 0 {
                    let projected = parens == 0
                        || previous.is_some_and(|t| t.is_keyword(Keyword::As));
                    if collecting && projected {
                        let list = if result.form == Some(QueryForm::Describe) {
                            &mut result.described
                        } else {
                            &mut result.global_variables
                        };
                        if !list.iter().any(|v| v == name) {
                            list.push(name.to_owned());
                        }
                    }
                } else {
                    in_scope.push(name.to_owned());
                    if result.wildcard
                        && result.global_variables.len() < STATEMENT_ARITY
                        && !result.global_variables.iter().any(|v| v == name)
                    {
                        result.global_variables.push(name.to_owned());
                    }
                }
            }
            _ => {}
        }
        previous = Some(token);
    }

    result.provides_statements = provides.unwrap_or(false);
    result
}

/// Once the global list holds three entries, the first non-empty in-scope
/// list closed after that settles the question either way.
fn close_scope(result: &mut Classification, provides: &mut Option<bool>, in_scope: &mut Vec<String>) {
    if provides.is_none()
        && result.form == Some(QueryForm::Select)
        && result.global_variables.len() == STATEMENT_ARITY
        && !in_scope.is_empty()
    {
        *provides = Some(*in_scope == result.global_variables);
    }
    in_scope.clear();
}

//! Streaming rewriter over parameterized query text.
//!
//! The rewriter owns a flat, editable token list. Everything else (prefix
//! bookkeeping, graph sets, parameter slots) is derived from one pass over
//! that list at construction and kept in step with every edit.

use std::borrow::Cow;

use indexmap::{IndexMap, IndexSet};
use ravel_core::{NamespaceResolver, Uri, Value};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::lex::{BaseLexer, LogosLexer, RawToken, SyntaxKind, token_text};
use crate::serialize::serialize_value;
use crate::{Error, Result};

use super::token::{Keyword, Token, TokenKind};

/// Whether a dataset parameter sits after `FROM` or `FROM NAMED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphRole {
    Default,
    Named,
}

#[derive(Debug, Clone, Default)]
pub struct QueryRewriter {
    tokens: Vec<Token>,
    declared_prefixes: IndexMap<String, Uri>,
    used_prefixes: IndexSet<String>,
    default_graphs: IndexSet<Uri>,
    named_graphs: IndexSet<Uri>,
    /// Parameter name to its serialized value, `None` while unbound.
    parameters: IndexMap<String, Option<String>>,
    dataset_parameters: IndexMap<String, GraphRole>,
    /// Graph each dataset parameter currently contributes.
    dataset_bindings: IndexMap<String, Uri>,
    diagnostics: Diagnostics,
}

impl QueryRewriter {
    /// Tokenize `text` with the default [`LogosLexer`].
    pub fn new(text: &str) -> Self {
        Self::with_lexer(text, &LogosLexer)
    }

    pub fn with_lexer(text: &str, lexer: &impl BaseLexer) -> Self {
        let raw = lexer.tokenize(text);
        let mut rewriter = Self::default();
        rewriter.tokens = rewriter.classify(text, &raw);
        rewriter.scan();
        rewriter
    }

    fn classify(&mut self, source: &str, raw: &[RawToken]) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::with_capacity(raw.len());
        let mut glued = false;
        let mut depth = 0usize;

        for token in raw {
            let text = token_text(source, token);
            if token.kind.is_trivia() {
                glued = false;
                continue;
            }

            let kind = match token.kind {
                SyntaxKind::Word => match Keyword::from_word(text) {
                    Some(keyword) => TokenKind::Keyword(keyword),
                    None if text.eq_ignore_ascii_case("true")
                        || text.eq_ignore_ascii_case("false") =>
                    {
                        TokenKind::BooleanLiteral
                    }
                    None => TokenKind::Name,
                },
                SyntaxKind::AtName => {
                    let after_string = glued
                        && tokens
                            .last()
                            .is_some_and(|t| t.kind == TokenKind::StringLiteral);
                    if after_string || text.contains('-') {
                        TokenKind::LangTag
                    } else {
                        TokenKind::Parameter
                    }
                }
                SyntaxKind::Iri => TokenKind::Iri,
                SyntaxKind::PrefixedName => TokenKind::PrefixedName,
                SyntaxKind::BlankNode => TokenKind::BlankNode,
                SyntaxKind::Var => TokenKind::Variable,
                SyntaxKind::StringLiteral | SyntaxKind::LongStringLiteral => {
                    TokenKind::StringLiteral
                }
                SyntaxKind::Integer | SyntaxKind::Decimal | SyntaxKind::Double => {
                    TokenKind::NumericLiteral
                }
                SyntaxKind::Garbage => {
                    self.diagnostics
                        .report(DiagnosticKind::UnrecognizedInput, token.span)
                        .message(format!("`{text}`"))
                        .emit();
                    TokenKind::Garbage
                }
                punct => {
                    match punct {
                        SyntaxKind::BraceOpen => depth += 1,
                        SyntaxKind::BraceClose if depth == 0 => {
                            self.diagnostics
                                .report(DiagnosticKind::UnbalancedBrace, token.span)
                                .emit();
                        }
                        SyntaxKind::BraceClose => depth -= 1,
                        _ => {}
                    }
                    TokenKind::Punct(punct)
                }
            };

            let text = match kind {
                TokenKind::Keyword(keyword) => keyword.as_str().to_owned(),
                TokenKind::BooleanLiteral => text.to_ascii_lowercase(),
                _ => text.to_owned(),
            };
            tokens.push(Token {
                kind,
                text,
                span: Some(token.span),
            });
            glued = true;
        }

        if depth > 0 {
            let end = raw.last().map(|t| t.span.end()).unwrap_or_default();
            self.diagnostics
                .report(
                    DiagnosticKind::UnclosedBrace,
                    rowan::TextRange::empty(end),
                )
                .emit();
        }

        tokens
    }

    /// Derive prefix, graph and parameter bookkeeping from the token list.
    fn scan(&mut self) {
        let mut i = 0;
        while i < self.tokens.len() {
            let token = &self.tokens[i];
            match token.kind {
                TokenKind::Keyword(Keyword::Prefix) => {
                    let label = self.tokens.get(i + 1).and_then(Token::prefix);
                    let namespace = self.tokens.get(i + 2).and_then(Token::iri_value);
                    if let (Some(label), Some(namespace)) = (label, namespace) {
                        let label = label.to_owned();
                        if self.declared_prefixes.contains_key(&label) {
                            if let Some(span) = self.tokens[i + 1].span {
                                self.diagnostics
                                    .report(DiagnosticKind::DuplicatePrefix, span)
                                    .message(&label)
                                    .emit();
                            }
                        }
                        self.declared_prefixes.insert(label, Uri::new(namespace));
                        i += 3;
                        continue;
                    }
                }
                TokenKind::Keyword(Keyword::From) => {
                    let (role, at) = if self
                        .tokens
                        .get(i + 1)
                        .is_some_and(|t| t.is_keyword(Keyword::Named))
                    {
                        (GraphRole::Named, i + 2)
                    } else {
                        (GraphRole::Default, i + 1)
                    };
                    let target = self.tokens.get(at).map(|t| {
                        (
                            t.iri_value().map(Uri::new),
                            t.parameter_name().map(str::to_owned),
                        )
                    });
                    match target {
                        Some((Some(graph), _)) => {
                            self.graphs_mut(role).insert(graph);
                        }
                        Some((None, Some(name))) => {
                            self.dataset_parameters.insert(name, role);
                        }
                        _ => {}
                    }
                }
                TokenKind::PrefixedName => {
                    if let Some(prefix) = token.prefix() {
                        self.used_prefixes.insert(prefix.to_owned());
                    }
                }
                TokenKind::Parameter => {
                    if let Some(name) = token.parameter_name() {
                        self.parameters.entry(name.to_owned()).or_insert(None);
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }

    fn graphs_mut(&mut self, role: GraphRole) -> &mut IndexSet<Uri> {
        match role {
            GraphRole::Default => &mut self.default_graphs,
            GraphRole::Named => &mut self.named_graphs,
        }
    }

    fn graphs(&self, role: GraphRole) -> &IndexSet<Uri> {
        match role {
            GraphRole::Default => &self.default_graphs,
            GraphRole::Named => &self.named_graphs,
        }
    }

    /// Bind a parameter. `name` may carry the leading `@`.
    ///
    /// Every occurrence of the parameter renders as the serialized `value`.
    /// A parameter in dataset position must be bound to a URI, which then
    /// joins the query's graph set.
    pub fn bind(&mut self, name: &str, value: &Value) -> Result<()> {
        let name = name.strip_prefix('@').unwrap_or(name);
        let literal = serialize_value(value)?;

        if let Some(&role) = self.dataset_parameters.get(name) {
            let graph = value
                .as_uri()
                .ok_or_else(|| Error::InvalidDatasetValue(name.to_owned()))?
                .clone();
            let previous = self.dataset_bindings.get(name).cloned();
            if previous.as_ref() != Some(&graph) {
                if self.graphs(role).contains(&graph) {
                    return Err(Error::DoubleBoundDataset(graph));
                }
                if let Some(previous) = previous {
                    self.graphs_mut(role).shift_remove(&previous);
                }
                self.graphs_mut(role).insert(graph.clone());
                self.dataset_bindings.insert(name.to_owned(), graph);
            }
        }

        match self.parameters.get_mut(name) {
            Some(slot) => *slot = Some(literal),
            None => tracing::debug!(parameter = name, "ignoring binding for absent parameter"),
        }
        Ok(())
    }

    /// Scope the query to `graph` through a `FROM` clause. No-op if already present.
    pub fn add_default_graph(&mut self, graph: &Uri) {
        if self.default_graphs.contains(graph) {
            return;
        }
        let at = self.dataset_insert_position();
        self.tokens.splice(
            at..at,
            [Token::keyword(Keyword::From), Token::iri(graph.as_str())],
        );
        self.default_graphs.insert(graph.clone());
    }

    /// Scope the query to `graph` through a `FROM NAMED` clause. No-op if already present.
    pub fn add_named_graph(&mut self, graph: &Uri) {
        if self.named_graphs.contains(graph) {
            return;
        }
        let at = self.dataset_insert_position();
        self.tokens.splice(
            at..at,
            [
                Token::keyword(Keyword::From),
                Token::keyword(Keyword::Named),
                Token::iri(graph.as_str()),
            ],
        );
        self.named_graphs.insert(graph.clone());
    }

    /// Before the outermost `WHERE`, else before the first `{`, else at the end.
    fn dataset_insert_position(&self) -> usize {
        let mut depth = 0usize;
        let mut first_brace = None;
        for (i, token) in self.tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Keyword(Keyword::Where) if depth == 0 => return i,
                TokenKind::Punct(SyntaxKind::BraceOpen) => {
                    first_brace.get_or_insert(i);
                    depth += 1;
                }
                TokenKind::Punct(SyntaxKind::BraceClose) => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        first_brace.unwrap_or(self.tokens.len())
    }

    /// Prefixes used in prefixed names but never declared, in first-use order.
    pub fn undeclared_prefixes(&self) -> impl Iterator<Item = &str> {
        self.used_prefixes
            .iter()
            .filter(|p| !self.declared_prefixes.contains_key(*p))
            .map(String::as_str)
    }

    /// Insert a `PREFIX` declaration at the head of the query. No-op if the
    /// prefix is already declared.
    pub fn declare_prefix(&mut self, prefix: &str, namespace: &Uri) {
        if self.declared_prefixes.contains_key(prefix) {
            return;
        }
        let at = self.prologue_end();
        self.tokens.splice(
            at..at,
            [
                Token::keyword(Keyword::Prefix),
                Token::prefix_label(prefix),
                Token::iri(namespace.as_str()),
            ],
        );
        self.declared_prefixes
            .insert(prefix.to_owned(), namespace.clone());
    }

    /// Declare every undeclared prefix from `resolver`.
    ///
    /// All-or-nothing: if one prefix is unknown, nothing is declared.
    pub fn declare_prefixes(&mut self, resolver: &impl NamespaceResolver) -> Result<()> {
        let resolved = self
            .undeclared_prefixes()
            .map(|prefix| {
                resolver
                    .resolve(prefix)
                    .map(|namespace| (prefix.to_owned(), namespace))
                    .ok_or_else(|| Error::NamespaceNotFound(prefix.to_owned()))
            })
            .collect::<Result<Vec<_>>>()?;

        for (prefix, namespace) in resolved {
            tracing::debug!(prefix = %prefix, namespace = %namespace, "declaring prefix");
            self.declare_prefix(&prefix, &namespace);
        }
        Ok(())
    }

    /// Index of the first token after the leading `PREFIX`/`BASE` declarations.
    pub(crate) fn prologue_end(&self) -> usize {
        let mut i = 0;
        loop {
            match self.tokens.get(i).map(|t| t.kind) {
                Some(TokenKind::Keyword(Keyword::Prefix)) => i += 3,
                Some(TokenKind::Keyword(Keyword::Base)) => i += 2,
                _ => return i.min(self.tokens.len()),
            }
        }
    }

    /// Render the whole query, or at `depth > 0` only the tokens nested at or
    /// below that brace depth.
    pub fn serialize(&self, depth: usize) -> Result<String> {
        self.render(&self.tokens, depth)
    }

    pub(crate) fn render(&self, tokens: &[Token], min_depth: usize) -> Result<String> {
        let mut out = String::new();
        let mut level = 0usize;
        let mut previous: Option<TokenKind> = None;

        for token in tokens {
            let token_depth = match token.kind {
                TokenKind::Punct(SyntaxKind::BraceOpen) => {
                    level += 1;
                    level - 1
                }
                TokenKind::Punct(SyntaxKind::BraceClose) => {
                    level = level.saturating_sub(1);
                    level
                }
                _ => level,
            };
            if token_depth < min_depth {
                continue;
            }

            let text = self.token_output(token)?;
            let glue = token.kind == TokenKind::LangTag
                || token.is_punct(SyntaxKind::DoubleCaret)
                || previous == Some(TokenKind::Punct(SyntaxKind::DoubleCaret));
            if !out.is_empty() && !glue {
                out.push(' ');
            }
            out.push_str(&text);
            previous = Some(token.kind);
        }

        Ok(out)
    }

    fn token_output<'t>(&'t self, token: &'t Token) -> Result<Cow<'t, str>> {
        let Some(name) = token.parameter_name() else {
            return Ok(Cow::Borrowed(&token.text));
        };
        match self.parameters.get(name) {
            Some(Some(literal)) => Ok(Cow::Borrowed(literal)),
            _ => Err(Error::UnboundParameter(name.to_owned())),
        }
    }

    /// Lexical problems plus warnings for unbound parameters and undeclared prefixes.
    pub fn lint(&self) -> Diagnostics {
        let mut diagnostics = self.diagnostics.clone();
        for (i, token) in self.tokens.iter().enumerate() {
            let Some(span) = token.span else { continue };
            if let Some(name) = token.parameter_name() {
                if matches!(self.parameters.get(name), Some(None)) {
                    diagnostics
                        .report(DiagnosticKind::UnboundParameter, span)
                        .message(name)
                        .emit();
                }
            } else if let Some(prefix) = token.prefix() {
                let in_declaration = i > 0 && self.tokens[i - 1].is_keyword(Keyword::Prefix);
                if !in_declaration && !self.declared_prefixes.contains_key(prefix) {
                    diagnostics
                        .report(DiagnosticKind::UndeclaredPrefix, span)
                        .message(prefix)
                        .emit();
                }
            }
        }
        diagnostics
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub(crate) fn tokens_mut(&mut self) -> &mut Vec<Token> {
        &mut self.tokens
    }

    pub fn declared_prefixes(&self) -> &IndexMap<String, Uri> {
        &self.declared_prefixes
    }

    pub fn used_prefixes(&self) -> &IndexSet<String> {
        &self.used_prefixes
    }

    pub fn default_graphs(&self) -> &IndexSet<Uri> {
        &self.default_graphs
    }

    pub fn named_graphs(&self) -> &IndexSet<Uri> {
        &self.named_graphs
    }

    /// Parameters in first-occurrence order with their serialized value, if bound.
    pub fn parameters(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.parameters
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn dataset_parameters(&self) -> impl Iterator<Item = (&str, GraphRole)> {
        self.dataset_parameters
            .iter()
            .map(|(name, role)| (name.as_str(), *role))
    }

    pub fn is_bound(&self, name: &str) -> bool {
        let name = name.strip_prefix('@').unwrap_or(name);
        matches!(self.parameters.get(name), Some(Some(_)))
    }

    /// Lexical diagnostics gathered while tokenizing.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

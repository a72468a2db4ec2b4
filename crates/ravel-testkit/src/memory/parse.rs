//! Recursive descent over rewriter tokens into a small query tree.

use indexmap::IndexMap;
use ravel_core::vocab::{rdf, xsd};
use ravel_core::{StoreError, Uri, Value};
use ravel_sparql::QueryRewriter;
use ravel_sparql::lex::SyntaxKind;
use ravel_sparql::rewrite::{Keyword, Token, TokenKind};

pub(crate) type ParseResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Term {
    Var(String),
    Const(Value),
}

#[derive(Debug, Clone)]
pub(crate) struct TriplePattern {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

#[derive(Debug, Clone)]
pub(crate) enum Element {
    Triple(TriplePattern),
    Filter(Expr),
    Optional(Group),
    Group(Group),
}

pub(crate) type Group = Vec<Element>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone)]
pub(crate) enum Expr {
    Term(Term),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Compare(CompareOp, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

#[derive(Debug, Clone)]
pub(crate) enum Projection {
    Variable(String),
    Count {
        distinct: bool,
        /// `None` counts rows.
        variable: Option<String>,
        alias: String,
    },
}

#[derive(Debug, Clone)]
pub(crate) enum Form {
    Select {
        distinct: bool,
        /// Empty under `*`.
        projection: Vec<Projection>,
    },
    Construct(Vec<TriplePattern>),
    Describe(Vec<Term>),
    Ask,
}

#[derive(Debug, Clone)]
pub(crate) struct Query {
    pub form: Form,
    pub from: Vec<Uri>,
    pub pattern: Option<Group>,
    /// Sort key and whether it descends.
    pub order: Vec<(Expr, bool)>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub(crate) fn parse_query(text: &str) -> ParseResult<Query> {
    let rewriter = QueryRewriter::new(text);
    let mut parser = Parser::new(rewriter.tokens());
    parser.query()
}

/// `CLEAR GRAPH <g>` target, or `None` for `CLEAR ALL`.
pub(crate) fn parse_clear(text: &str) -> ParseResult<Option<Uri>> {
    let rewriter = QueryRewriter::new(text);
    let mut parser = Parser::new(rewriter.tokens());
    match parser.next() {
        Some(token) if token.kind == TokenKind::Name && token.text.eq_ignore_ascii_case("CLEAR") => {}
        _ => return Err(unsupported("only CLEAR updates are supported")),
    }
    let target = match parser.next() {
        Some(token) if token.is_keyword(Keyword::Graph) => Some(parser.iri()?),
        Some(token) if token.text.eq_ignore_ascii_case("ALL") => None,
        _ => return Err(malformed("expected GRAPH <iri> or ALL after CLEAR")),
    };
    parser.expect_end()?;
    Ok(target)
}

fn malformed(message: impl Into<String>) -> StoreError {
    StoreError::Malformed(message.into())
}

fn unsupported(message: impl Into<String>) -> StoreError {
    StoreError::Unsupported(message.into())
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    prefixes: IndexMap<String, String>,
    base: Option<String>,
    blank_nodes: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            prefixes: IndexMap::new(),
            base: None,
            blank_nodes: 0,
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&'t Token> {
        self.tokens.get(self.pos + offset)
    }

    fn next(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(keyword))
    }

    fn at_punct(&self, kind: SyntaxKind) -> bool {
        self.peek().is_some_and(|t| t.is_punct(kind))
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        let found = self.at_keyword(keyword);
        if found {
            self.pos += 1;
        }
        found
    }

    fn eat_punct(&mut self, kind: SyntaxKind) -> bool {
        let found = self.at_punct(kind);
        if found {
            self.pos += 1;
        }
        found
    }

    fn expect_punct(&mut self, kind: SyntaxKind) -> ParseResult<()> {
        if self.eat_punct(kind) {
            return Ok(());
        }
        Err(self.unexpected(&format!("{kind:?}")))
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<()> {
        if self.eat_keyword(keyword) {
            return Ok(());
        }
        Err(self.unexpected(keyword.as_str()))
    }

    fn expect_end(&self) -> ParseResult<()> {
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.unexpected("end of query")),
        }
    }

    fn unexpected(&self, expected: &str) -> StoreError {
        match self.peek() {
            Some(token) => malformed(format!("expected {expected}, found `{}`", token.text)),
            None => malformed(format!("expected {expected}, found end of query")),
        }
    }

    fn query(&mut self) -> ParseResult<Query> {
        self.prologue()?;
        let form = self.form()?;

        let mut from = Vec::new();
        while self.eat_keyword(Keyword::From) {
            let named = self.eat_keyword(Keyword::Named);
            let graph = self.iri()?;
            if !named && !from.contains(&graph) {
                from.push(graph);
            }
        }

        let has_where = self.eat_keyword(Keyword::Where);
        let pattern = if has_where || self.at_punct(SyntaxKind::BraceOpen) {
            self.expect_punct(SyntaxKind::BraceOpen)?;
            Some(self.group()?)
        } else if matches!(form, Form::Describe(_)) {
            None
        } else {
            return Err(self.unexpected("WHERE"));
        };

        let mut query = Query {
            form,
            from,
            pattern,
            order: Vec::new(),
            limit: None,
            offset: None,
        };
        self.modifiers(&mut query)?;
        self.expect_end()?;
        Ok(query)
    }

    fn prologue(&mut self) -> ParseResult<()> {
        loop {
            if self.eat_keyword(Keyword::Prefix) {
                let label = match self.next() {
                    Some(token) if token.kind == TokenKind::PrefixedName => token
                        .text
                        .strip_suffix(':')
                        .ok_or_else(|| malformed(format!("bad prefix label `{}`", token.text)))?,
                    _ => return Err(self.unexpected("prefix label")),
                };
                let namespace = self.iri()?;
                self.prefixes
                    .insert(label.to_owned(), namespace.as_str().to_owned());
            } else if self.eat_keyword(Keyword::Base) {
                let base = self.iri()?;
                self.base = Some(base.as_str().to_owned());
            } else {
                return Ok(());
            }
        }
    }

    fn form(&mut self) -> ParseResult<Form> {
        if self.eat_keyword(Keyword::Select) {
            let distinct = self.eat_keyword(Keyword::Distinct) || self.eat_keyword(Keyword::Reduced);
            if self.eat_punct(SyntaxKind::Star) {
                return Ok(Form::Select {
                    distinct,
                    projection: Vec::new(),
                });
            }
            let mut projection = Vec::new();
            loop {
                match self.peek() {
                    Some(token) if token.kind == TokenKind::Variable => {
                        self.pos += 1;
                        projection.push(Projection::Variable(variable(token)));
                    }
                    Some(token) if token.is_punct(SyntaxKind::ParenOpen) => {
                        self.pos += 1;
                        projection.push(self.aggregate()?);
                    }
                    _ => break,
                }
            }
            if projection.is_empty() {
                return Err(self.unexpected("projection"));
            }
            return Ok(Form::Select {
                distinct,
                projection,
            });
        }
        if self.eat_keyword(Keyword::Construct) {
            self.expect_punct(SyntaxKind::BraceOpen)?;
            let mut template = Vec::new();
            while !self.eat_punct(SyntaxKind::BraceClose) {
                if self.eat_punct(SyntaxKind::Dot) {
                    continue;
                }
                template.extend(self.triples_block()?);
            }
            return Ok(Form::Construct(template));
        }
        if self.eat_keyword(Keyword::Describe) {
            let mut targets = Vec::new();
            if !self.eat_punct(SyntaxKind::Star) {
                while let Some(token) = self.peek() {
                    match token.kind {
                        TokenKind::Variable => {
                            self.pos += 1;
                            targets.push(Term::Var(variable(token)));
                        }
                        TokenKind::Iri | TokenKind::PrefixedName => {
                            targets.push(Term::Const(Value::Uri(self.iri()?)));
                        }
                        _ => break,
                    }
                }
            }
            return Ok(Form::Describe(targets));
        }
        if self.eat_keyword(Keyword::Ask) {
            return Ok(Form::Ask);
        }
        Err(self.unexpected("SELECT, CONSTRUCT, DESCRIBE or ASK"))
    }

    /// `(COUNT([DISTINCT] ?v|*) AS ?alias)` after the opening paren.
    fn aggregate(&mut self) -> ParseResult<Projection> {
        match self.next() {
            Some(token) if token.kind == TokenKind::Name && token.text.eq_ignore_ascii_case("COUNT") => {}
            _ => return Err(unsupported("only COUNT aggregates are supported")),
        }
        self.expect_punct(SyntaxKind::ParenOpen)?;
        let distinct = self.eat_keyword(Keyword::Distinct);
        let counted = if self.eat_punct(SyntaxKind::Star) {
            None
        } else {
            match self.next() {
                Some(token) if token.kind == TokenKind::Variable => Some(variable(token)),
                _ => return Err(self.unexpected("variable or *")),
            }
        };
        self.expect_punct(SyntaxKind::ParenClose)?;
        self.expect_keyword(Keyword::As)?;
        let alias = match self.next() {
            Some(token) if token.kind == TokenKind::Variable => variable(token),
            _ => return Err(self.unexpected("alias variable")),
        };
        self.expect_punct(SyntaxKind::ParenClose)?;
        Ok(Projection::Count {
            distinct,
            variable: counted,
            alias,
        })
    }

    fn modifiers(&mut self, query: &mut Query) -> ParseResult<()> {
        loop {
            if self.eat_keyword(Keyword::Order) {
                self.expect_keyword(Keyword::By)?;
                while let Some(token) = self.peek() {
                    if token.is_keyword(Keyword::Asc) || token.is_keyword(Keyword::Desc) {
                        self.pos += 1;
                        self.expect_punct(SyntaxKind::ParenOpen)?;
                        let key = self.expression()?;
                        self.expect_punct(SyntaxKind::ParenClose)?;
                        query.order.push((key, token.is_keyword(Keyword::Desc)));
                    } else if token.kind == TokenKind::Variable {
                        self.pos += 1;
                        query.order.push((Expr::Term(Term::Var(variable(token))), false));
                    } else {
                        break;
                    }
                }
            } else if self.eat_keyword(Keyword::Limit) {
                query.limit = Some(self.count()?);
            } else if self.eat_keyword(Keyword::Offset) {
                query.offset = Some(self.count()?);
            } else {
                return Ok(());
            }
        }
    }

    fn count(&mut self) -> ParseResult<usize> {
        match self.next() {
            Some(token) if token.kind == TokenKind::NumericLiteral => token
                .text
                .parse()
                .map_err(|_| malformed(format!("`{}` is not a count", token.text))),
            _ => Err(self.unexpected("integer")),
        }
    }

    /// Group contents after the opening brace, through the closing one.
    fn group(&mut self) -> ParseResult<Group> {
        let mut group = Vec::new();
        loop {
            let Some(token) = self.peek() else {
                return Err(malformed("unclosed group"));
            };
            match token.kind {
                TokenKind::Punct(SyntaxKind::BraceClose) => {
                    self.pos += 1;
                    return Ok(group);
                }
                TokenKind::Punct(SyntaxKind::Dot) => self.pos += 1,
                TokenKind::Punct(SyntaxKind::BraceOpen) => {
                    self.pos += 1;
                    let nested = self.group()?;
                    if self.at_keyword(Keyword::Union) {
                        return Err(unsupported("UNION"));
                    }
                    group.push(Element::Group(nested));
                }
                TokenKind::Keyword(Keyword::Optional) => {
                    self.pos += 1;
                    self.expect_punct(SyntaxKind::BraceOpen)?;
                    group.push(Element::Optional(self.group()?));
                }
                TokenKind::Keyword(Keyword::Filter) => {
                    self.pos += 1;
                    group.push(Element::Filter(self.constraint()?));
                }
                TokenKind::Keyword(keyword @ (Keyword::Union | Keyword::Minus | Keyword::Graph | Keyword::Bind | Keyword::Values)) => {
                    return Err(unsupported(keyword.as_str()));
                }
                _ => group.extend(self.triples_block()?.into_iter().map(Element::Triple)),
            }
        }
    }

    /// Subject followed by a property list, `;` and `,` expanded.
    fn triples_block(&mut self) -> ParseResult<Vec<TriplePattern>> {
        let subject = self.term()?;
        let mut triples = Vec::new();
        loop {
            let predicate = self.verb()?;
            loop {
                let object = self.term()?;
                triples.push(TriplePattern {
                    subject: subject.clone(),
                    predicate: predicate.clone(),
                    object,
                });
                if !self.eat_punct(SyntaxKind::Comma) {
                    break;
                }
            }
            if !self.eat_punct(SyntaxKind::Semicolon) {
                break;
            }
            // Trailing `;` before `.` or `}`.
            if self.at_punct(SyntaxKind::Dot) || self.at_punct(SyntaxKind::BraceClose) {
                break;
            }
        }
        Ok(triples)
    }

    fn verb(&mut self) -> ParseResult<Term> {
        if self.eat_keyword(Keyword::A) {
            return Ok(Term::Const(Value::uri(rdf::TYPE)));
        }
        self.term()
    }

    fn term(&mut self) -> ParseResult<Term> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected("term"));
        };
        match token.kind {
            TokenKind::Variable => {
                self.pos += 1;
                Ok(Term::Var(variable(token)))
            }
            TokenKind::BlankNode => {
                self.pos += 1;
                Ok(Term::Var(format!("_{}", token.text.trim_start_matches("_:"))))
            }
            TokenKind::Punct(SyntaxKind::BracketOpen)
                if self.peek_at(1).is_some_and(|t| t.is_punct(SyntaxKind::BracketClose)) =>
            {
                self.pos += 2;
                self.blank_nodes += 1;
                Ok(Term::Var(format!("_anon{}", self.blank_nodes)))
            }
            TokenKind::Iri | TokenKind::PrefixedName => Ok(Term::Const(Value::Uri(self.iri()?))),
            _ => Ok(Term::Const(self.literal()?)),
        }
    }

    fn iri(&mut self) -> ParseResult<Uri> {
        let Some(token) = self.next() else {
            return Err(self.unexpected("IRI"));
        };
        match token.kind {
            TokenKind::Iri => {
                let value = token.iri_value().unwrap_or_default();
                match &self.base {
                    Some(base) if !value.contains(':') => Ok(Uri::new(format!("{base}{value}"))),
                    _ => Ok(Uri::new(value)),
                }
            }
            TokenKind::PrefixedName => {
                let (prefix, local) = token
                    .text
                    .split_once(':')
                    .unwrap_or((token.text.as_str(), ""));
                let namespace = self
                    .prefixes
                    .get(prefix)
                    .ok_or_else(|| malformed(format!("undeclared prefix `{prefix}:`")))?;
                Ok(Uri::new(format!("{namespace}{local}")))
            }
            TokenKind::Parameter => Err(malformed(format!("unbound parameter `{}`", token.text))),
            _ => {
                self.pos -= 1;
                Err(self.unexpected("IRI"))
            }
        }
    }

    fn literal(&mut self) -> ParseResult<Value> {
        let Some(token) = self.next() else {
            return Err(self.unexpected("literal"));
        };
        match token.kind {
            TokenKind::StringLiteral => {
                let lexical = token
                    .string_value()
                    .ok_or_else(|| malformed(format!("bad string `{}`", token.text)))?;
                if let Some(tag) = self.peek().filter(|t| t.kind == TokenKind::LangTag) {
                    self.pos += 1;
                    return Ok(Value::lang(lexical, tag.text.trim_start_matches('@')));
                }
                if self.eat_punct(SyntaxKind::DoubleCaret) {
                    let datatype = self.iri()?;
                    return Ok(Value::from_literal(&lexical, Some(datatype.as_str()), None));
                }
                Ok(Value::String(lexical))
            }
            TokenKind::NumericLiteral => Ok(numeric(&token.text)),
            TokenKind::Punct(sign @ (SyntaxKind::Plus | SyntaxKind::Minus))
                if self.peek().is_some_and(|t| t.kind == TokenKind::NumericLiteral) =>
            {
                let digits = self.next().map_or("", |t| t.text.as_str());
                let text = if sign == SyntaxKind::Minus {
                    format!("-{digits}")
                } else {
                    digits.to_owned()
                };
                Ok(numeric(&text))
            }
            TokenKind::BooleanLiteral => Ok(Value::Boolean(token.text.eq_ignore_ascii_case("true"))),
            TokenKind::Parameter => Err(malformed(format!("unbound parameter `{}`", token.text))),
            _ => {
                self.pos -= 1;
                Err(self.unexpected("term"))
            }
        }
    }

    /// FILTER argument: a bracketted expression or a function call.
    fn constraint(&mut self) -> ParseResult<Expr> {
        if self.eat_punct(SyntaxKind::ParenOpen) {
            let expr = self.expression()?;
            self.expect_punct(SyntaxKind::ParenClose)?;
            return Ok(expr);
        }
        self.primary()
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        let mut left = self.conjunction()?;
        while self.eat_punct(SyntaxKind::Or) {
            let right = self.conjunction()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn conjunction(&mut self) -> ParseResult<Expr> {
        let mut left = self.unary()?;
        while self.eat_punct(SyntaxKind::And) {
            let right = self.unary()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.eat_punct(SyntaxKind::Bang) {
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }
        self.relational()
    }

    fn relational(&mut self) -> ParseResult<Expr> {
        let left = self.primary()?;
        let op = match self.peek().map(|t| t.kind) {
            Some(TokenKind::Punct(SyntaxKind::Equals)) => CompareOp::Eq,
            Some(TokenKind::Punct(SyntaxKind::NotEquals)) => CompareOp::Ne,
            Some(TokenKind::Punct(SyntaxKind::Less)) => CompareOp::Lt,
            Some(TokenKind::Punct(SyntaxKind::LessEquals)) => CompareOp::Le,
            Some(TokenKind::Punct(SyntaxKind::Greater)) => CompareOp::Gt,
            Some(TokenKind::Punct(SyntaxKind::GreaterEquals)) => CompareOp::Ge,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.primary()?;
        Ok(Expr::Compare(op, Box::new(left), Box::new(right)))
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected("expression"));
        };
        match token.kind {
            TokenKind::Punct(SyntaxKind::ParenOpen) => {
                self.pos += 1;
                let expr = self.expression()?;
                self.expect_punct(SyntaxKind::ParenClose)?;
                Ok(expr)
            }
            TokenKind::Name => {
                self.pos += 1;
                self.expect_punct(SyntaxKind::ParenOpen)?;
                let mut args = Vec::new();
                if !self.eat_punct(SyntaxKind::ParenClose) {
                    loop {
                        args.push(self.expression()?);
                        if self.eat_punct(SyntaxKind::ParenClose) {
                            break;
                        }
                        self.expect_punct(SyntaxKind::Comma)?;
                    }
                }
                Ok(Expr::Call(token.text.to_ascii_uppercase(), args))
            }
            _ => Ok(Expr::Term(self.term()?)),
        }
    }
}

fn variable(token: &Token) -> String {
    token.variable_name().unwrap_or_default().to_owned()
}

fn numeric(text: &str) -> Value {
    let datatype = if text.contains(['e', 'E']) {
        xsd::DOUBLE
    } else if text.contains('.') {
        xsd::DECIMAL
    } else {
        xsd::INTEGER
    };
    Value::from_literal(text, Some(datatype), None)
}

//! Owned, classified tokens the rewriter edits.

use rowan::TextRange;

use crate::lex::SyntaxKind;

/// Words with a fixed meaning to the rewriter and the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Select,
    Construct,
    Describe,
    Ask,
    Where,
    From,
    Named,
    Prefix,
    Base,
    Filter,
    Optional,
    Union,
    Minus,
    Graph,
    Bind,
    Values,
    Order,
    Group,
    Having,
    By,
    Asc,
    Desc,
    Limit,
    Offset,
    Distinct,
    Reduced,
    As,
    Not,
    Exists,
    In,
    /// The `rdf:type` shorthand. Case-sensitive, unlike every other keyword.
    A,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        if word == "a" {
            return Some(Keyword::A);
        }
        let keyword = match word.to_ascii_uppercase().as_str() {
            "SELECT" => Keyword::Select,
            "CONSTRUCT" => Keyword::Construct,
            "DESCRIBE" => Keyword::Describe,
            "ASK" => Keyword::Ask,
            "WHERE" => Keyword::Where,
            "FROM" => Keyword::From,
            "NAMED" => Keyword::Named,
            "PREFIX" => Keyword::Prefix,
            "BASE" => Keyword::Base,
            "FILTER" => Keyword::Filter,
            "OPTIONAL" => Keyword::Optional,
            "UNION" => Keyword::Union,
            "MINUS" => Keyword::Minus,
            "GRAPH" => Keyword::Graph,
            "BIND" => Keyword::Bind,
            "VALUES" => Keyword::Values,
            "ORDER" => Keyword::Order,
            "GROUP" => Keyword::Group,
            "HAVING" => Keyword::Having,
            "BY" => Keyword::By,
            "ASC" => Keyword::Asc,
            "DESC" => Keyword::Desc,
            "LIMIT" => Keyword::Limit,
            "OFFSET" => Keyword::Offset,
            "DISTINCT" => Keyword::Distinct,
            "REDUCED" => Keyword::Reduced,
            "AS" => Keyword::As,
            "NOT" => Keyword::Not,
            "EXISTS" => Keyword::Exists,
            "IN" => Keyword::In,
            _ => return None,
        };
        Some(keyword)
    }

    /// Canonical spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Select => "SELECT",
            Keyword::Construct => "CONSTRUCT",
            Keyword::Describe => "DESCRIBE",
            Keyword::Ask => "ASK",
            Keyword::Where => "WHERE",
            Keyword::From => "FROM",
            Keyword::Named => "NAMED",
            Keyword::Prefix => "PREFIX",
            Keyword::Base => "BASE",
            Keyword::Filter => "FILTER",
            Keyword::Optional => "OPTIONAL",
            Keyword::Union => "UNION",
            Keyword::Minus => "MINUS",
            Keyword::Graph => "GRAPH",
            Keyword::Bind => "BIND",
            Keyword::Values => "VALUES",
            Keyword::Order => "ORDER",
            Keyword::Group => "GROUP",
            Keyword::Having => "HAVING",
            Keyword::By => "BY",
            Keyword::Asc => "ASC",
            Keyword::Desc => "DESC",
            Keyword::Limit => "LIMIT",
            Keyword::Offset => "OFFSET",
            Keyword::Distinct => "DISTINCT",
            Keyword::Reduced => "REDUCED",
            Keyword::As => "AS",
            Keyword::Not => "NOT",
            Keyword::Exists => "EXISTS",
            Keyword::In => "IN",
            Keyword::A => "a",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword(Keyword),
    /// Any other bare word: function names, mostly.
    Name,
    Iri,
    PrefixedName,
    BlankNode,
    Variable,
    /// `@name` outside language-tag position.
    Parameter,
    StringLiteral,
    NumericLiteral,
    BooleanLiteral,
    /// `@en`, glued to the preceding string when rendered.
    LangTag,
    /// Punctuation and operators, including `^^`.
    Punct(SyntaxKind),
    Garbage,
}

/// One unit of query text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Where the token came from; `None` for tokens inserted by the rewriter.
    pub span: Option<TextRange>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            span: None,
        }
    }

    pub fn keyword(keyword: Keyword) -> Self {
        Self::new(TokenKind::Keyword(keyword), keyword.as_str())
    }

    pub fn iri(uri: &str) -> Self {
        Self::new(TokenKind::Iri, format!("<{uri}>"))
    }

    pub fn prefix_label(prefix: &str) -> Self {
        Self::new(TokenKind::PrefixedName, format!("{prefix}:"))
    }

    pub fn numeric(n: u64) -> Self {
        Self::new(TokenKind::NumericLiteral, n.to_string())
    }

    pub fn variable(name: &str) -> Self {
        Self::new(TokenKind::Variable, format!("?{name}"))
    }

    pub fn punct(kind: SyntaxKind, text: &str) -> Self {
        Self::new(TokenKind::Punct(kind), text)
    }

    #[inline]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    #[inline]
    pub fn is_punct(&self, kind: SyntaxKind) -> bool {
        self.kind == TokenKind::Punct(kind)
    }

    /// Variable name without the `?`/`$` sigil.
    pub fn variable_name(&self) -> Option<&str> {
        (self.kind == TokenKind::Variable).then(|| &self.text[1..])
    }

    /// Parameter name without the `@`.
    pub fn parameter_name(&self) -> Option<&str> {
        (self.kind == TokenKind::Parameter).then(|| &self.text[1..])
    }

    /// IRI without the angle brackets.
    pub fn iri_value(&self) -> Option<&str> {
        if self.kind != TokenKind::Iri {
            return None;
        }
        self.text.strip_prefix('<')?.strip_suffix('>')
    }

    /// The prefix part of a prefixed name, without the colon.
    pub fn prefix(&self) -> Option<&str> {
        if self.kind != TokenKind::PrefixedName {
            return None;
        }
        self.text.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Unescaped content of a string literal token.
    pub fn string_value(&self) -> Option<String> {
        if self.kind != TokenKind::StringLiteral {
            return None;
        }
        let text = self.text.as_str();
        let quote_len = if text.starts_with("\"\"\"") || text.starts_with("'''") {
            3
        } else {
            1
        };
        if text.len() < quote_len * 2 {
            return None;
        }
        Some(unescape(&text[quote_len..text.len() - quote_len]))
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

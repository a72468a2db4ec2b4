//! Token kinds recognized by the base lexer.
//!
//! The lexer is deliberately shallow: it knows enough about SPARQL to keep
//! IRIs, strings and variables whole, and nothing about grammar. Keywords are
//! plain `Word`s; the rewriter decides what they mean.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("{")]
    BraceOpen = 0,

    #[token("}")]
    BraceClose,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token("*")]
    Star,

    /// Datatype marker in `'1'^^<...>`.
    #[token("^^")]
    DoubleCaret,

    #[token("=")]
    Equals,

    #[token("!=")]
    NotEquals,

    #[token("<")]
    Less,

    #[token("<=")]
    LessEquals,

    #[token(">")]
    Greater,

    #[token(">=")]
    GreaterEquals,

    #[token("&&")]
    And,

    #[token("||")]
    Or,

    #[token("!")]
    Bang,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("/")]
    Slash,

    /// `<http://example.org/a>`
    #[regex(r#"<[^<>"{}|^`\\\x00-\x20]*>"#)]
    Iri,

    /// `ex:Person`, `ex:`, `:local`
    #[regex(r"([A-Za-z][A-Za-z0-9_\-]*)?:([A-Za-z0-9_][A-Za-z0-9_\-]*)?")]
    PrefixedName,

    #[regex(r"_:[A-Za-z0-9_]+")]
    BlankNode,

    /// `?name` or `$name`
    #[regex(r"[?$][A-Za-z0-9_]+")]
    Var,

    /// `@name`: a parameter or a language tag, depending on where it sits.
    #[regex(r"@[A-Za-z_][A-Za-z0-9_]*(-[A-Za-z0-9]+)*")]
    AtName,

    #[regex(r#""([^"\\\r\n]|\\.)*""#)]
    #[regex(r"'([^'\\\r\n]|\\.)*'")]
    StringLiteral,

    #[regex(r#""""([^"\\]|\\.|"[^"\\]|"\\.|""[^"\\]|""\\.)*""""#)]
    #[regex(r"'''([^'\\]|\\.|'[^'\\]|'\\.|''[^'\\]|''\\.)*'''")]
    LongStringLiteral,

    /// Numeric terminals carry their sign: `-5` is one token.
    #[regex(r"[+-]?[0-9]+")]
    Integer,

    #[regex(r"[+-]?[0-9]*\.[0-9]+")]
    Decimal,

    #[regex(r"[+-]?([0-9]+\.[0-9]*|\.[0-9]+|[0-9]+)[eE][+-]?[0-9]+")]
    Double,

    /// Keywords, function names, `a`, `true`/`false`.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,

    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"#[^\r\n]*", allow_greedy = true)]
    Comment,

    /// Consecutive unrecognized characters, coalesced.
    Garbage,
}

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::Whitespace | SyntaxKind::Comment)
    }

    #[inline]
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::StringLiteral
                | SyntaxKind::LongStringLiteral
                | SyntaxKind::Integer
                | SyntaxKind::Decimal
                | SyntaxKind::Double
        )
    }
}

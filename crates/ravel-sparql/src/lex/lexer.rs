//! The base lexer seam.
//!
//! Produces span-based tokens without storing text; text is sliced from the
//! source only when needed. Consecutive unrecognized characters are coalesced
//! into single `Garbage` tokens rather than one error per character.

use logos::Logos;
use rowan::TextRange;
use std::ops::Range;

use super::syntax_kind::SyntaxKind;

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

impl RawToken {
    #[inline]
    pub fn new(kind: SyntaxKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

/// A tokenizer the rewriter can be built on.
///
/// Implementations must cover the whole input: every byte belongs to exactly
/// one token, trivia included.
pub trait BaseLexer {
    fn tokenize(&self, source: &str) -> Vec<RawToken>;
}

/// The default [`BaseLexer`], driven by the `logos` automaton on [`SyntaxKind`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogosLexer;

impl BaseLexer for LogosLexer {
    fn tokenize(&self, source: &str) -> Vec<RawToken> {
        lex(source)
    }
}

fn range_to_text_range(range: Range<usize>) -> TextRange {
    TextRange::new((range.start as u32).into(), (range.end as u32).into())
}

/// Tokenizes source into span-based tokens, coalescing lexer errors into `Garbage`.
pub fn lex(source: &str) -> Vec<RawToken> {
    let mut tokens = Vec::new();
    let mut lexer = SyntaxKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    let end = lexer.span().start;
                    tokens.push(RawToken::new(
                        SyntaxKind::Garbage,
                        range_to_text_range(start..end),
                    ));
                }
                tokens.push(RawToken::new(kind, range_to_text_range(lexer.span())));
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(RawToken::new(
                        SyntaxKind::Garbage,
                        range_to_text_range(start..source.len()),
                    ));
                }
                break;
            }
        }
    }

    tokens
}

/// Retrieves the text slice for a token.
#[inline]
pub fn token_text<'q>(source: &'q str, token: &RawToken) -> &'q str {
    &source[Range::<usize>::from(token.span)]
}

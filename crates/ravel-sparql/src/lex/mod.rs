mod lexer;
mod syntax_kind;

#[cfg(test)]
mod lexer_tests;

pub use lexer::{BaseLexer, LogosLexer, RawToken, lex, token_text};
pub use syntax_kind::SyntaxKind;

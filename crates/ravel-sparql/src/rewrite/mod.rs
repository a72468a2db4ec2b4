mod rewriter;
mod token;


pub use rewriter::{GraphRole, QueryRewriter};
pub use token::{Keyword, Token, TokenKind};

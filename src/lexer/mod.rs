//! Lexical analysis for conslisp
//!
//! Converts source text into a stream of positioned tokens.

mod sexpr_scanner;
mod token;

pub use sexpr_scanner::SExprScanner;
pub use token::{Position, Token, TokenKind};

//! Conslisp reader
//!
//! Builds symbolic expressions from tokens. The reader never evaluates
//! anything; `'x` is plain sugar for `(quote x)`.

mod sexpr_parser;

pub use sexpr_parser::{parse_all, parse_one, SExprParser};

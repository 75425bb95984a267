//! # Conslisp - A Small Lisp Reader and Evaluator
//!
//! Conslisp reads S-expressions into a graph of shared cons cells and
//! evaluates them under lexical scoping with four special forms
//! (`quote`, `if`, `lambda`, `defun`) and variadic arithmetic.
//!
//! ## Quick Start
//!
//! ```rust
//! use conslisp::{eval, parse_one, Environment, Expr};
//!
//! # fn main() -> conslisp::Result<()> {
//! let env = Environment::global();
//!
//! let expr = parse_one("(defun add2 (a b) (+ a b))")?;
//! assert_eq!(eval(&expr, &env)?, Expr::symbol("add2"));
//!
//! let expr = parse_one("(add2 3 4)")?;
//! assert_eq!(eval(&expr, &env)?.to_text(), "7");
//! # Ok(())
//! # }
//! ```
//!
//! ### Whole programs
//!
//! ```rust
//! use conslisp::Evaluator;
//!
//! # fn main() -> conslisp::Result<()> {
//! let evaluator = Evaluator::new();
//! let result = evaluator.run(r#"
//!     (defun make-adder (n) (lambda (x) (+ x n)))
//!     (defun add10 (x) ((make-adder 10) x))
//!     (add10 (/ 5))
//! "#)?;
//! assert_eq!(result.to_text(), "10.2");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Source Text → Scanner → Tokens → Parser → Expr → eval → Expr
//! ```
//!
//! - [`Scanner`] - Produces positioned tokens on demand
//! - [`Parser`] - Single-lookahead reader building [`Expr`] values
//! - [`Environment`] - Chained scopes; the root holds the builtins
//! - [`eval`] / [`apply`] - Special forms, closures and builtin calls
//! - [`Evaluator`] - A session that owns its root environment
//!
//! ## Error Handling
//!
//! Every stage returns [`Error`]; nothing is recovered partially:
//!
//! ```rust
//! use conslisp::{Error, Evaluator};
//!
//! let evaluator = Evaluator::new();
//! assert_eq!(evaluator.eval_str("(/ 10 2 0)"), Err(Error::DivisionByZero));
//! ```
//!
//! Evaluation recurses on the native stack without tail-call elimination,
//! so unbounded recursion in a program ends in a stack overflow rather than
//! an [`Error`].

// Module declarations
/// Version of the conslisp crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;

// Re-export main types
pub use error::{Error, ErrorStage, Result};
pub use lexer::{Position, SExprScanner, Token, TokenKind};
pub use parser::{parse_all, parse_one, SExprParser};
pub use runtime::{apply, eval, Builtin, Environment, Expr, Lambda, LispEvaluator};

/// Type alias for the S-expression scanner (lexer).
pub type Scanner = SExprScanner;

/// Type alias for the S-expression parser (reader).
pub type Parser = SExprParser;

/// Type alias for the evaluator session.
pub type Evaluator = LispEvaluator;

/// Returns a root environment with `+ - * /` bound
pub fn new_global_environment() -> Environment {
    Environment::global()
}

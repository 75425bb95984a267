//! Runtime for conslisp: values, environments and the evaluator

pub mod builtins;
mod environment;
mod lisp_evaluator;
mod value;

pub use environment::Environment;
pub use lisp_evaluator::{apply, eval, LispEvaluator, SpecialForm};
pub use value::{format_number, Builtin, BuiltinFn, Cons, Expr, Lambda};

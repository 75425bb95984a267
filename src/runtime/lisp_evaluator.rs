use std::rc::Rc;

use crate::error::{Error, Result};
use crate::parser::{parse_all, parse_one};
use crate::runtime::value::{Cons, Lambda};
use crate::runtime::{Environment, Expr};

/// Operators whose arguments are handed over unevaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialForm {
    /// `(quote x)`
    Quote,
    /// `(if cond then [else])`
    If,
    /// `(lambda (params...) body)`
    Lambda,
    /// `(defun name (params...) body)`
    Defun,
}

impl SpecialForm {
    /// Recognizes a special form by its head symbol
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "quote" => Some(SpecialForm::Quote),
            "if" => Some(SpecialForm::If),
            "lambda" => Some(SpecialForm::Lambda),
            "defun" => Some(SpecialForm::Defun),
            _ => None,
        }
    }

    /// The head symbol for this form
    pub fn name(self) -> &'static str {
        match self {
            SpecialForm::Quote => "quote",
            SpecialForm::If => "if",
            SpecialForm::Lambda => "lambda",
            SpecialForm::Defun => "defun",
        }
    }
}

/// Evaluates `expr` in `env`
///
/// Plain recursive tree walk: nesting depth and recursion depth both consume
/// native stack, and there is no tail-call elimination.
pub fn eval(expr: &Expr, env: &Environment) -> Result<Expr> {
    match expr {
        Expr::Number(_) | Expr::Str(_) | Expr::Boolean(_) | Expr::Nil => Ok(expr.clone()),
        // Procedures only show up here when an embedder splices them into a
        // tree; they are values already.
        Expr::Lambda(_) | Expr::Builtin(_) => Ok(expr.clone()),
        Expr::Symbol(name) => env.get(name),
        Expr::Cons(cell) => eval_list(cell, env),
    }
}

/// Applies a builtin or closure to already-evaluated arguments
pub fn apply(callable: &Expr, args: &[Expr]) -> Result<Expr> {
    match callable {
        Expr::Builtin(builtin) => builtin.call(args),
        Expr::Lambda(lambda) => apply_lambda(lambda, args),
        other => Err(Error::NotCallable {
            value: other.to_text(),
        }),
    }
}

fn apply_lambda(lambda: &Lambda, args: &[Expr]) -> Result<Expr> {
    if args.len() != lambda.params.len() {
        return Err(Error::ArityMismatch {
            function: lambda.name.clone().unwrap_or_else(|| "lambda".to_string()),
            expected: lambda.params.len().to_string(),
            got: args.len(),
        });
    }

    tracing::trace!(
        function = lambda.name.as_deref().unwrap_or("lambda"),
        arity = args.len(),
        "applying closure"
    );

    // Static scoping: the call frame hangs off the defining environment
    let call_env = lambda.env.child();
    for (param, arg) in lambda.params.iter().zip(args) {
        call_env.set(param.clone(), arg.clone());
    }
    eval(&lambda.body, &call_env)
}

fn eval_list(cell: &Cons, env: &Environment) -> Result<Expr> {
    if let Expr::Symbol(name) = &cell.car {
        if let Some(form) = SpecialForm::from_name(name) {
            return eval_special_form(form, &cell.cdr, env);
        }
    }

    let callable = eval(&cell.car, env)?;
    let args = eval_args(&cell.cdr, env)?;
    apply(&callable, &args)
}

/// Evaluates each element of the argument chain left to right
fn eval_args(chain: &Expr, env: &Environment) -> Result<Vec<Expr>> {
    let mut args = Vec::new();
    let mut current = chain;
    loop {
        match current {
            Expr::Nil => return Ok(args),
            Expr::Cons(cell) => {
                args.push(eval(&cell.car, env)?);
                current = &cell.cdr;
            }
            tail => {
                return Err(Error::TypeMismatch {
                    function: "apply".to_string(),
                    expected: "proper argument list".to_string(),
                    got: tail.type_name().to_string(),
                })
            }
        }
    }
}

fn eval_special_form(form: SpecialForm, args: &Expr, env: &Environment) -> Result<Expr> {
    match form {
        SpecialForm::Quote => eval_quote(args),
        SpecialForm::If => eval_if(args, env),
        SpecialForm::Lambda => make_lambda(SpecialForm::Lambda, args, env, None),
        SpecialForm::Defun => eval_defun(args, env),
    }
}

/// Splits a chain into its first element and the rest
fn split(chain: &Expr) -> Option<(&Expr, &Expr)> {
    match chain {
        Expr::Cons(cell) => Some((&cell.car, &cell.cdr)),
        _ => None,
    }
}

/// (quote x) - Return x unevaluated
fn eval_quote(args: &Expr) -> Result<Expr> {
    match split(args) {
        Some((quoted, Expr::Nil)) => Ok(quoted.clone()),
        _ => Err(Error::malformed("quote", "requires exactly 1 argument")),
    }
}

/// (if cond then [else]) - Conditional; a missing else yields NIL
fn eval_if(args: &Expr, env: &Environment) -> Result<Expr> {
    let (condition, rest) =
        split(args).ok_or_else(|| Error::malformed("if", "requires at least 2 arguments"))?;
    let (then_expr, rest) =
        split(rest).ok_or_else(|| Error::malformed("if", "requires at least 2 arguments"))?;

    let else_expr = match rest {
        Expr::Nil => None,
        Expr::Cons(cell) if cell.cdr.is_nil() => Some(&cell.car),
        Expr::Cons(_) => return Err(Error::malformed("if", "accepts at most 3 arguments")),
        _ => return Err(Error::malformed("if", "invalid argument list")),
    };

    if eval(condition, env)?.is_truthy() {
        eval(then_expr, env)
    } else {
        match else_expr {
            Some(else_expr) => eval(else_expr, env),
            None => Ok(Expr::Nil),
        }
    }
}

/// (lambda (params...) body) - Closure over the current environment
fn make_lambda(
    form: SpecialForm,
    args: &Expr,
    env: &Environment,
    name: Option<String>,
) -> Result<Expr> {
    let form_name = form.name();
    let (params_expr, rest) = split(args)
        .ok_or_else(|| Error::malformed(form_name, "requires a parameter list and a body"))?;
    let params = parse_params(form_name, params_expr)?;

    let body = match split(rest) {
        Some((body, Expr::Nil)) => body.clone(),
        Some(_) => return Err(Error::malformed(form_name, "body must be a single expression")),
        None => return Err(Error::malformed(form_name, "requires a body")),
    };

    Ok(Expr::Lambda(Rc::new(Lambda {
        name,
        params,
        body,
        env: env.clone(),
    })))
}

fn parse_params(form_name: &str, params_expr: &Expr) -> Result<Vec<String>> {
    let mut params = Vec::new();
    let mut current = params_expr;
    loop {
        match current {
            Expr::Nil => return Ok(params),
            Expr::Cons(cell) => {
                let name = cell.car.as_symbol().ok_or_else(|| {
                    Error::malformed(
                        form_name,
                        format!("parameter must be a symbol, got {}", cell.car.type_name()),
                    )
                })?;
                params.push(name.to_string());
                current = &cell.cdr;
            }
            _ => return Err(Error::malformed(form_name, "invalid parameter list")),
        }
    }
}

/// (defun name (params...) body) - Bind a closure in the calling environment
fn eval_defun(args: &Expr, env: &Environment) -> Result<Expr> {
    let (name_expr, rest) = split(args)
        .ok_or_else(|| Error::malformed("defun", "requires a name, parameter list and body"))?;

    let name = name_expr.as_symbol().ok_or_else(|| {
        Error::malformed(
            "defun",
            format!("function name must be a symbol, got {}", name_expr.type_name()),
        )
    })?;

    if !matches!(rest, Expr::Cons(_)) {
        return Err(Error::malformed("defun", "requires a parameter list and a body"));
    }

    let lambda = make_lambda(SpecialForm::Defun, rest, env, Some(name.to_string()))?;
    tracing::debug!(name, depth = env.scope_depth(), "defun bound function");
    env.set(name, lambda);

    Ok(Expr::symbol(name))
}

/// Interpreter session owning its root environment
///
/// Independent sessions never share bindings:
/// ```rust
/// use conslisp::{Evaluator, Expr};
///
/// # fn main() -> conslisp::Result<()> {
/// let a = Evaluator::new();
/// let b = Evaluator::new();
/// a.eval_str("(defun sq (x) (* x x))")?;
/// assert_eq!(a.eval_str("(sq 12)")?, Expr::Number(144.0));
/// assert!(b.eval_str("(sq 12)").is_err());
/// # Ok(())
/// # }
/// ```
pub struct LispEvaluator {
    env: Environment,
}

impl LispEvaluator {
    /// Creates an evaluator over a fresh global environment
    pub fn new() -> Self {
        Self::with_environment(Environment::global())
    }

    /// Creates an evaluator over a caller-built root environment
    pub fn with_environment(env: Environment) -> Self {
        LispEvaluator { env }
    }

    /// The session's root environment
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Evaluates an already-parsed expression at top level
    pub fn evaluate(&self, expr: &Expr) -> Result<Expr> {
        eval(expr, &self.env)
    }

    /// Reads one expression from `source` and evaluates it
    pub fn eval_str(&self, source: &str) -> Result<Expr> {
        let expr = parse_one(source)?;
        self.evaluate(&expr)
    }

    /// Reads every expression in `source` and evaluates them in order,
    /// returning the last value (`NIL` for empty input). The first failure
    /// stops the run; bindings made before it are kept.
    pub fn run(&self, source: &str) -> Result<Expr> {
        let exprs = parse_all(source)?;

        let mut last = Expr::Nil;
        for expr in &exprs {
            last = self.evaluate(expr)?;
        }
        Ok(last)
    }
}

impl Default for LispEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

//! Native arithmetic procedures bound in the global environment
//!
//! All four are variadic and accept numbers only.

use crate::error::{Error, Result};
use crate::runtime::{Environment, Expr};

/// Binds `+ - * /` into `env`
pub fn register(env: &Environment) {
    env.define_builtin("+", add);
    env.define_builtin("-", subtract);
    env.define_builtin("*", multiply);
    env.define_builtin("/", divide);
}

fn number(function: &str, arg: &Expr) -> Result<f64> {
    arg.as_number().ok_or_else(|| Error::TypeMismatch {
        function: function.to_string(),
        expected: "number".to_string(),
        got: arg.type_name().to_string(),
    })
}

fn numbers(function: &str, args: &[Expr]) -> Result<Vec<f64>> {
    args.iter().map(|arg| number(function, arg)).collect()
}

fn arity_at_least_one(function: &str) -> Error {
    Error::ArityMismatch {
        function: function.to_string(),
        expected: "at least 1".to_string(),
        got: 0,
    }
}

/// (+ n...) - Sum, 0 for no arguments
pub fn add(args: &[Expr]) -> Result<Expr> {
    let nums = numbers("+", args)?;
    Ok(Expr::Number(nums.iter().sum()))
}

/// (- n m...) - Negation for one argument, left fold otherwise
pub fn subtract(args: &[Expr]) -> Result<Expr> {
    let nums = numbers("-", args)?;
    if nums.is_empty() {
        return Err(arity_at_least_one("-"));
    }

    if nums.len() == 1 {
        return Ok(Expr::Number(-nums[0]));
    }
    let result = nums[1..].iter().fold(nums[0], |acc, n| acc - n);
    Ok(Expr::Number(result))
}

/// (* n...) - Product, 1 for no arguments
pub fn multiply(args: &[Expr]) -> Result<Expr> {
    let nums = numbers("*", args)?;
    Ok(Expr::Number(nums.iter().product()))
}

/// (/ n m...) - Reciprocal for one argument, left fold otherwise
///
/// Operands are checked as the fold reaches them, so a zero divisor fails
/// before a later operand is type-checked.
pub fn divide(args: &[Expr]) -> Result<Expr> {
    let (first, rest) = match args.split_first() {
        Some(split) => split,
        None => return Err(arity_at_least_one("/")),
    };
    let first = number("/", first)?;

    if rest.is_empty() {
        if first == 0.0 {
            return Err(Error::DivisionByZero);
        }
        return Ok(Expr::Number(1.0 / first));
    }

    let mut result = first;
    for arg in rest {
        let divisor = number("/", arg)?;
        if divisor == 0.0 {
            return Err(Error::DivisionByZero);
        }
        result /= divisor;
    }
    Ok(Expr::Number(result))
}

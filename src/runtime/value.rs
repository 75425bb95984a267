use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::runtime::Environment;

/// Native procedure signature. Builtins receive already-evaluated arguments.
pub type BuiltinFn = fn(&[Expr]) -> Result<Expr>;

/// Symbolic value representation
///
/// Cons cells and closures sit behind `Rc`, so cloning an `Expr` never copies
/// list structure: a quoted literal and the parser output it came from share
/// the same cells.
#[derive(Clone)]
pub enum Expr {
    /// Floating-point number (the only numeric type)
    Number(f64),
    /// Immutable string
    Str(String),
    /// Boolean. Only `true` is produced by the reader; falsity is `Nil`.
    Boolean(bool),
    /// Identifier, equal to another symbol iff the names are equal
    Symbol(String),
    /// Empty list and false value
    Nil,
    /// Pair cell
    Cons(Rc<Cons>),
    /// Closure created by `lambda` or `defun`
    Lambda(Rc<Lambda>),
    /// Native procedure
    Builtin(Builtin),
}

/// Two-slot pair
#[derive(Debug, Clone)]
pub struct Cons {
    /// Head slot
    pub car: Expr,
    /// Tail slot
    pub cdr: Expr,
}

// Long lists are unlinked along the cdr chain in a loop; only car nesting
// costs stack.
impl Drop for Cons {
    fn drop(&mut self) {
        let mut next = std::mem::replace(&mut self.cdr, Expr::Nil);
        while let Expr::Cons(cell) = next {
            match Rc::try_unwrap(cell) {
                Ok(mut cell) => next = std::mem::replace(&mut cell.cdr, Expr::Nil),
                // Still shared; the other owner keeps the rest alive
                Err(_) => break,
            }
        }
    }
}

impl PartialEq for Cons {
    fn eq(&self, other: &Self) -> bool {
        let (mut a, mut b) = (self, other);
        loop {
            if a.car != b.car {
                return false;
            }
            match (&a.cdr, &b.cdr) {
                (Expr::Cons(x), Expr::Cons(y)) => {
                    if Rc::ptr_eq(x, y) {
                        return true;
                    }
                    a = x;
                    b = y;
                }
                (x, y) => return x == y,
            }
        }
    }
}

/// Closure value
pub struct Lambda {
    /// Name given by `defun`; `None` for anonymous lambdas
    pub name: Option<String>,
    /// Parameter names in declaration order
    pub params: Vec<String>,
    /// Single body expression
    pub body: Expr,
    /// Environment in effect where the lambda was created
    pub env: Environment,
}

/// Named native procedure
#[derive(Clone, Copy)]
pub struct Builtin {
    /// Name the procedure was registered under
    pub name: &'static str,
    /// The native function
    pub func: BuiltinFn,
}

impl Builtin {
    /// Invokes the native function
    pub fn call(&self, args: &[Expr]) -> Result<Expr> {
        (self.func)(args)
    }
}

impl Expr {
    /// Creates a symbol
    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol(name.into())
    }

    /// Creates a string
    pub fn string(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    /// Creates a cons cell
    pub fn cons(car: Expr, cdr: Expr) -> Self {
        Expr::Cons(Rc::new(Cons { car, cdr }))
    }

    /// Builds a proper list from the items, terminated by `Nil`
    pub fn list(items: Vec<Expr>) -> Self {
        Self::list_with_tail(items, Expr::Nil)
    }

    /// Builds a chain of cells whose final cdr is `tail`
    pub fn list_with_tail(items: Vec<Expr>, tail: Expr) -> Self {
        items
            .into_iter()
            .rev()
            .fold(tail, |cdr, car| Expr::cons(car, cdr))
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::Number(_) => "number",
            Expr::Str(_) => "string",
            Expr::Boolean(_) => "boolean",
            Expr::Symbol(_) => "symbol",
            Expr::Nil => "nil",
            Expr::Cons(_) => "cons",
            Expr::Lambda(_) => "function",
            Expr::Builtin(_) => "builtin",
        }
    }

    /// False iff `Nil` or `Boolean(false)`. Zero and the empty string are true.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Expr::Nil | Expr::Boolean(false))
    }

    /// Returns true for `Nil`
    pub fn is_nil(&self) -> bool {
        matches!(self, Expr::Nil)
    }

    /// Returns the number, if this is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Expr::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the symbol name, if this is a symbol
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expr::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Walks a proper list into its elements. `None` for improper lists and
    /// non-list values.
    pub fn list_items(&self) -> Option<Vec<Expr>> {
        let mut items = Vec::new();
        let mut current = self;
        loop {
            match current {
                Expr::Nil => return Some(items),
                Expr::Cons(cell) => {
                    items.push(cell.car.clone());
                    current = &cell.cdr;
                }
                _ => return None,
            }
        }
    }

    /// Canonical textual rendering
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

/// Renders a number the way the printer expects: integral values inside the
/// i64 range as plain integers, everything else in shortest general format.
pub fn format_number(value: f64) -> String {
    // -2^63 <= value < 2^63; the `as` cast saturates outside that range
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
    if value.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&value) {
        return (value as i64).to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "1.2345675e6"
    let sci = format!("{:e}", value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if (-4..6).contains(&exponent) {
        value.to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Number(n) => f.write_str(&format_number(*n)),
            Expr::Str(s) => write!(f, "\"{}\"", s),
            Expr::Boolean(true) => f.write_str("T"),
            Expr::Boolean(false) | Expr::Nil => f.write_str("NIL"),
            Expr::Symbol(name) => f.write_str(name),
            Expr::Cons(cell) => {
                write!(f, "({}", cell.car)?;
                let mut rest = &cell.cdr;
                loop {
                    match rest {
                        Expr::Nil => break,
                        Expr::Cons(next) => {
                            write!(f, " {}", next.car)?;
                            rest = &next.cdr;
                        }
                        tail => {
                            write!(f, " . {}", tail)?;
                            break;
                        }
                    }
                }
                f.write_str(")")
            }
            Expr::Lambda(_) => f.write_str("#<FUNCTION>"),
            Expr::Builtin(builtin) => write!(f, "#<BUILTIN {}>", builtin.name),
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "Number({:?})", n),
            Expr::Str(s) => write!(f, "Str({:?})", s),
            Expr::Boolean(b) => write!(f, "Boolean({})", b),
            Expr::Symbol(name) => write!(f, "Symbol({})", name),
            Expr::Nil => f.write_str("Nil"),
            Expr::Cons(cell) => write!(f, "Cons({:?}, {:?})", cell.car, cell.cdr),
            Expr::Lambda(lambda) => fmt::Debug::fmt(lambda, f),
            Expr::Builtin(builtin) => fmt::Debug::fmt(builtin, f),
        }
    }
}

// The captured environment is left out: it may hold this very closure.
impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Lambda")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

/// Structural equality for data; identity for closures; name for builtins
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expr::Number(a), Expr::Number(b)) => a == b,
            (Expr::Str(a), Expr::Str(b)) => a == b,
            (Expr::Boolean(a), Expr::Boolean(b)) => a == b,
            (Expr::Symbol(a), Expr::Symbol(b)) => a == b,
            (Expr::Nil, Expr::Nil) => true,
            (Expr::Cons(a), Expr::Cons(b)) => Rc::ptr_eq(a, b) || a == b,
            (Expr::Lambda(a), Expr::Lambda(b)) => Rc::ptr_eq(a, b),
            (Expr::Builtin(a), Expr::Builtin(b)) => a.name == b.name,
            _ => false,
        }
    }
}

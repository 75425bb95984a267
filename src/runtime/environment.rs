use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::runtime::builtins;
use crate::runtime::value::{Builtin, BuiltinFn, Expr};

/// Environment for variable scoping
///
/// A cheap handle onto one scope in a chain of scopes. Cloning the handle
/// shares the scope, which is how closures keep their defining environment
/// alive after the call that created it has returned.
#[derive(Clone)]
pub struct Environment {
    scope: Rc<Scope>,
}

/// Single scope in the chain
struct Scope {
    /// Variables defined in this scope
    bindings: RefCell<HashMap<String, Expr>>,
    /// Enclosing scope (None for the root). Never reassigned.
    parent: Option<Environment>,
}

impl Environment {
    /// Creates an empty root environment
    pub fn new() -> Self {
        Self::with_parent(None)
    }

    /// Creates an environment whose lookups fall back to `parent`
    pub fn with_parent(parent: Option<&Environment>) -> Self {
        Environment {
            scope: Rc::new(Scope {
                bindings: RefCell::new(HashMap::new()),
                parent: parent.cloned(),
            }),
        }
    }

    /// Creates a child scope of this environment
    pub fn child(&self) -> Self {
        Self::with_parent(Some(self))
    }

    /// Creates the root environment with `+ - * /` bound
    pub fn global() -> Self {
        let env = Self::new();
        builtins::register(&env);
        env
    }

    /// Binds `name` in this scope only, overwriting any existing binding here
    pub fn set(&self, name: impl Into<String>, value: Expr) {
        self.scope.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Binds a native procedure under `name` in this scope
    pub fn define_builtin(&self, name: &'static str, func: BuiltinFn) {
        self.set(name, Expr::Builtin(Builtin { name, func }));
    }

    /// Looks `name` up here, then along the parent chain
    pub fn get(&self, name: &str) -> Result<Expr> {
        let mut env = self;
        loop {
            if let Some(value) = env.scope.bindings.borrow().get(name) {
                return Ok(value.clone());
            }
            match &env.scope.parent {
                Some(parent) => env = parent,
                None => {
                    return Err(Error::UndefinedVariable {
                        name: name.to_string(),
                    })
                }
            }
        }
    }

    /// Checks if a variable exists anywhere in the chain
    pub fn exists(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Returns the enclosing environment
    pub fn parent(&self) -> Option<&Environment> {
        self.scope.parent.as_ref()
    }

    /// Returns the chain length (1 for a root)
    pub fn scope_depth(&self) -> usize {
        let mut depth = 1;
        let mut env = self;
        while let Some(parent) = env.parent() {
            depth += 1;
            env = parent;
        }
        depth
    }

    /// Names bound directly in this scope, sorted
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scope.bindings.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns true if both handles refer to the same scope
    pub fn same_scope(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.scope, &other.scope)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Environment")
            .field("names", &self.local_names())
            .field("depth", &self.scope_depth())
            .finish()
    }
}

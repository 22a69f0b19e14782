//! Environment for variable bindings
//!
//! The Environment is a lexical scope that holds variable bindings.
//! It forms a chain of frames, with child frames referencing their parents.
//! Each binding is an independently allocated, shared-ownership mutable
//! cell rather than an inlined value: closures that captured the same frame
//! see mutations through any handle, which is what makes recursive and
//! mutually-recursive definitions work.

use std::sync::{Arc, RwLock};

use rustc_hash::FxHashMap;

use crate::interner::InternedSymbol;
use crate::language::Value;

/// One binding cell. `None` means declared but not yet initialized.
pub type Binding = Arc<RwLock<Option<Value>>>;

// Internal state holding the cells and parent pointer
struct EnvironmentState {
    data: FxHashMap<InternedSymbol, Binding>,
    parent: Option<Environment>,
}

/// Environment for variable bindings.
///
/// Cheap to clone (an Arc increment); clones share state, so a definition
/// made through one handle is visible to every closure holding the frame.
#[derive(Clone)]
pub struct Environment {
    state: Arc<RwLock<EnvironmentState>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create a new, empty root environment
    pub fn new() -> Self {
        Environment {
            state: Arc::new(RwLock::new(EnvironmentState {
                data: FxHashMap::default(),
                parent: None,
            })),
        }
    }

    /// Create a child frame extending the current one, with a fresh cell
    /// for each parameter. Used on function application.
    pub fn extend(&self, params: &[InternedSymbol], args: &[Value]) -> Self {
        let mut data = FxHashMap::default();
        for (param, arg) in params.iter().zip(args.iter()) {
            data.insert(*param, Arc::new(RwLock::new(Some(arg.clone()))));
        }

        Environment {
            state: Arc::new(RwLock::new(EnvironmentState {
                data,
                parent: Some(self.clone()),
            })),
        }
    }

    /// Declare a name in the current frame without initializing it.
    /// Looking the name up before a `define` still reports it as unbound.
    pub fn declare(&self, name: InternedSymbol) -> Binding {
        let mut state = self.state.write().unwrap();
        state
            .data
            .entry(name)
            .or_insert_with(|| Arc::new(RwLock::new(None)))
            .clone()
    }

    /// Bind a value in the CURRENT frame. If the frame already holds a cell
    /// for the name, the value is stored through it, so closures that
    /// captured this frame observe the update.
    pub fn define(&self, name: InternedSymbol, value: Value) {
        let cell = self.declare(name);
        *cell.write().unwrap() = Some(value);
    }

    /// Find the binding cell for a name, walking up the parent chain.
    pub fn lookup_cell(&self, name: InternedSymbol) -> Option<Binding> {
        let state = self.state.read().unwrap();

        if let Some(cell) = state.data.get(&name) {
            return Some(cell.clone());
        }

        match &state.parent {
            Some(parent) => parent.lookup_cell(name),
            None => None,
        }
    }

    /// Look up a value. A cell that was declared but never defined reads
    /// as absent.
    pub fn lookup(&self, name: InternedSymbol) -> Option<Value> {
        let cell = self.lookup_cell(name)?;
        let slot = cell.read().unwrap();
        slot.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> InternedSymbol {
        InternedSymbol::new(s)
    }

    #[test]
    fn test_define_then_lookup() {
        let env = Environment::new();
        env.define(sym("x"), Value::Int(1));
        assert_eq!(env.lookup(sym("x")), Some(Value::Int(1)));
        assert_eq!(env.lookup(sym("y")), None);
    }

    #[test]
    fn test_lookup_walks_parent_chain() {
        let root = Environment::new();
        root.define(sym("x"), Value::Int(1));
        let child = root.extend(&[sym("y")], &[Value::Int(2)]);
        assert_eq!(child.lookup(sym("x")), Some(Value::Int(1)));
        assert_eq!(child.lookup(sym("y")), Some(Value::Int(2)));
        assert_eq!(root.lookup(sym("y")), None);
    }

    #[test]
    fn test_inner_binding_shadows_outer() {
        let root = Environment::new();
        root.define(sym("x"), Value::Int(1));
        let child = root.extend(&[sym("x")], &[Value::Int(2)]);
        assert_eq!(child.lookup(sym("x")), Some(Value::Int(2)));
        assert_eq!(root.lookup(sym("x")), Some(Value::Int(1)));
    }

    #[test]
    fn test_declared_but_uninitialized_reads_as_unbound() {
        let env = Environment::new();
        env.declare(sym("pending"));
        assert_eq!(env.lookup(sym("pending")), None);
        env.define(sym("pending"), Value::Int(7));
        assert_eq!(env.lookup(sym("pending")), Some(Value::Int(7)));
    }

    #[test]
    fn test_cell_mutation_is_visible_through_all_handles() {
        let env = Environment::new();
        let cell = env.declare(sym("f"));
        // Another holder of the same frame
        let other = env.clone();
        env.define(sym("f"), Value::Int(42));
        assert_eq!(other.lookup(sym("f")), Some(Value::Int(42)));
        assert_eq!(*cell.read().unwrap(), Some(Value::Int(42)));
    }

    #[test]
    fn test_redefine_goes_through_the_same_cell() {
        let env = Environment::new();
        env.define(sym("x"), Value::Int(1));
        let cell = env.lookup_cell(sym("x")).unwrap();
        env.define(sym("x"), Value::Int(2));
        // Same cell, new contents
        assert!(Arc::ptr_eq(&cell, &env.lookup_cell(sym("x")).unwrap()));
        assert_eq!(*cell.read().unwrap(), Some(Value::Int(2)));
    }
}

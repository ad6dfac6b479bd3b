// Environment for variable bindings and scope management

use std::rc::Rc;

use indexmap::IndexMap;

use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::values::Value;

/// Insertion-ordered lexical bindings with an optional parent frame.
/// Child frames are created per call; the parent sits behind `Rc` and is
/// never mutated through a child, so mutations cannot leak to sibling or
/// enclosing scopes.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: IndexMap<String, Value>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            bindings: IndexMap::new(),
            parent: None,
        }
    }

    pub fn with_parent(parent: Rc<Environment>) -> Self {
        Environment {
            bindings: IndexMap::new(),
            parent: Some(parent),
        }
    }

    /// Define a binding in the current frame, shadowing any parent binding.
    pub fn define(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    /// Look up a name in this frame or any enclosing frame.
    pub fn lookup(&self, name: &str) -> RuntimeResult<Value> {
        if let Some(value) = self.bindings.get(name) {
            Ok(value.clone())
        } else if let Some(parent) = &self.parent {
            parent.lookup(name)
        } else {
            Err(RuntimeError::UndefinedSymbol(name.to_string()))
        }
    }

    /// Whether the name is bound in this frame (parents excluded).
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Names bound in the current frame, in insertion order.
    pub fn binding_names(&self) -> Vec<String> {
        self.bindings.keys().cloned().collect()
    }
}

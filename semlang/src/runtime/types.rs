// Structural type model backing runtime values.
// A closed sum over the value types of the language; `Any` is the wildcard
// standing in for unannotated slots.

use std::fmt;

use itertools::Itertools;

use crate::runtime::values::Value;

#[derive(Debug, Clone)]
pub enum Type {
    /// Wildcard: matches any type during structural comparison and any
    /// value during inhabitation checks.
    Any,
    Float,
    Bool,
    String,
    /// Ordered parameter types followed by the trailing return type.
    Function(Vec<Type>),
    SpecialForm,
}

// Wildcard-permissive structural comparison: `Any` matches everything, and a
// `Function` slot missing on either side matches anything. Deliberately not
// `Eq` (transitivity does not hold across the wildcard).
impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Any, _) | (_, Type::Any) => true,
            (Type::Float, Type::Float) => true,
            (Type::Bool, Type::Bool) => true,
            (Type::String, Type::String) => true,
            (Type::SpecialForm, Type::SpecialForm) => true,
            (Type::Function(a), Type::Function(b)) => {
                a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            _ => false,
        }
    }
}

impl Type {
    /// Does this host value inhabit the type? For `Function` the value's
    /// declared signature is compared wildcard-permissively against the
    /// annotated one.
    pub fn validates(&self, value: &Value) -> bool {
        match (self, value) {
            (Type::Any, _) => true,
            (Type::Float, Value::Float(_)) => true,
            (Type::Bool, Value::Bool(_)) => true,
            (Type::String, Value::String(_)) => true,
            (Type::Function(annotated), Value::Function(function)) => annotated
                .iter()
                .zip(function.signature.iter())
                .all(|(a, b)| a == b),
            (Type::SpecialForm, Value::SpecialForm(_)) => true,
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Type::Any => "any",
            Type::Float => "float",
            Type::Bool => "bool",
            Type::String => "string",
            Type::Function(_) => "function",
            Type::SpecialForm => "special-form",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Any => write!(f, "Any"),
            Type::Float => write!(f, "Float"),
            Type::Bool => write!(f, "Bool"),
            Type::String => write!(f, "String"),
            Type::Function(signature) => {
                write!(f, "(-> {})", signature.iter().map(|t| t.to_string()).join(" "))
            }
            Type::SpecialForm => write!(f, "Form"),
        }
    }
}

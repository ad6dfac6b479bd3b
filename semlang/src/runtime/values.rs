// Runtime value system for semlang
// Values carry enough type structure for annotation checks and call-time
// argument validation.

use std::fmt;
use std::rc::Rc;

use crate::parser::Token;
use crate::runtime::environment::Environment;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::types::Type;

#[derive(Debug, Clone)]
pub enum Value {
    Float(f64),
    Bool(bool),
    String(String),
    Function(Rc<Function>),
    SpecialForm(Rc<FormInstance>),
}

/// One occurrence of a special form. The callee position of a registered
/// form name evaluates to an unbound instance; parsing the occurrence's
/// argument shapes produces a fresh instance carrying the binder's result.
#[derive(Debug, Clone)]
pub struct FormInstance {
    pub form: String,
    pub binding: Option<Value>,
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            _ => true,
        }
    }

    /// The structural runtime type of this value.
    pub fn type_of(&self) -> Type {
        match self {
            Value::Float(_) => Type::Float,
            Value::Bool(_) => Type::Bool,
            Value::String(_) => Type::String,
            Value::Function(function) => Type::Function(function.signature.clone()),
            Value::SpecialForm(_) => Type::SpecialForm,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::SpecialForm(_) => "special-form",
        }
    }

    /// The binder result carried by a parsed special-form occurrence.
    pub fn form_binding(&self) -> Option<&Value> {
        match self {
            Value::SpecialForm(instance) => instance.binding.as_ref(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            // Builtins compare by name and arity, closures by identity
            (Value::Function(a), Value::Function(b)) => {
                Rc::ptr_eq(a, b)
                    || (matches!(
                        (&a.body, &b.body),
                        (FunctionBody::Builtin(_), FunctionBody::Builtin(_))
                    ) && a.name == b.name
                        && a.signature.len() == b.signature.len())
            }
            (Value::SpecialForm(a), Value::SpecialForm(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Bool(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Function(function) => write!(f, "#<function:{}>", function.name),
            Value::SpecialForm(instance) => write!(f, "#<form:{}>", instance.form),
        }
    }
}

pub type BuiltinFn = Rc<dyn Fn(Vec<Value>) -> RuntimeResult<Value>>;

/// A callable value: declared name for diagnostics, declared parameter and
/// return types, and a host body.
#[derive(Clone)]
pub struct Function {
    pub name: String,
    /// Parameter types followed by the return type; never empty.
    pub signature: Vec<Type>,
    pub body: FunctionBody,
}

#[derive(Clone)]
pub enum FunctionBody {
    Builtin(BuiltinFn),
    Closure(Closure),
}

/// A user-defined function: declared parameters, unevaluated body tokens,
/// and a copy of the defining environment.
#[derive(Clone)]
pub struct Closure {
    pub params: Vec<Param>,
    pub body: Vec<Token>,
    pub env: Environment,
}

/// A declared parameter; unannotated parameters default to the wildcard.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

impl Function {
    pub fn new_builtin<F>(name: impl Into<String>, signature: Vec<Type>, func: F) -> Rc<Function>
    where
        F: Fn(Vec<Value>) -> RuntimeResult<Value> + 'static,
    {
        Rc::new(Function {
            name: name.into(),
            signature,
            body: FunctionBody::Builtin(Rc::new(func)),
        })
    }

    pub fn new_closure(
        name: impl Into<String>,
        params: Vec<Param>,
        return_type: Type,
        body: Vec<Token>,
        env: Environment,
    ) -> Rc<Function> {
        let mut signature: Vec<Type> = params.iter().map(|p| p.ty.clone()).collect();
        signature.push(return_type);
        Rc::new(Function {
            name: name.into(),
            signature,
            body: FunctionBody::Closure(Closure { params, body, env }),
        })
    }

    pub fn param_types(&self) -> &[Type] {
        &self.signature[..self.signature.len() - 1]
    }

    pub fn arity(&self) -> usize {
        self.signature.len() - 1
    }

    /// Enforced before the host body ever runs: exact arity, then each
    /// actual argument must inhabit its declared parameter type.
    pub fn check_args(&self, args: &[Value]) -> RuntimeResult<()> {
        if args.len() != self.arity() {
            return Err(RuntimeError::ArityMismatch {
                function: self.name.clone(),
                expected: self.arity(),
                actual: args.len(),
            });
        }
        for (param_type, arg) in self.param_types().iter().zip(args.iter()) {
            if !param_type.validates(arg) {
                return Err(RuntimeError::TypeError {
                    expected: param_type.to_string(),
                    actual: arg.type_name().to_string(),
                    operation: self.name.clone(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish()
    }
}

impl fmt::Debug for FunctionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionBody::Builtin(_) => write!(f, "Builtin"),
            FunctionBody::Closure(_) => write!(f, "Closure"),
        }
    }
}

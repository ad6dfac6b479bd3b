// Bootstrap for the default context: the structural semantics namespace,
// the built-in type constructors, and the two bundled forms `if!` and
// `def!`. Further host primitives are registered by the embedding host
// through `BaseContext::define`; the bundled binaries use the arithmetic
// set from `create_host_context`.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::runtime::context::{BaseContext, Context, Semantics, TypeConstructor};
use crate::runtime::environment::Environment;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::special_form::{ArgumentShape, FormBinding, SpecialFormFactory};
use crate::runtime::types::Type;
use crate::runtime::values::{Function, Value};

pub struct StandardLibrary;

impl StandardLibrary {
    /// A context with the default semantics namespace, type table, and the
    /// bundled special forms, over an empty environment.
    pub fn create_global_context() -> BaseContext {
        let mut forms = SpecialFormFactory::new();
        Self::load_conditional_form(&mut forms);
        Self::load_definition_form(&mut forms);
        BaseContext::new(
            Environment::new(),
            Self::default_semantics(),
            Self::default_types(),
            forms,
        )
    }

    /// A global context with demo arithmetic and comparison primitives on
    /// top, registered through the same `define` mechanism any embedding
    /// host would use.
    pub fn create_host_context() -> BaseContext {
        let context = Self::create_global_context();
        Self::install_host_primitives(&context);
        context
    }

    fn install_host_primitives(context: &BaseContext) {
        let binary = vec![Type::Float, Type::Float, Type::Float];
        for (name, op) in [
            ("+", (|a, b| a + b) as fn(f64, f64) -> f64),
            ("-", |a, b| a - b),
            ("*", |a, b| a * b),
            ("/", |a, b| a / b),
        ] {
            context.define(
                name,
                Value::Function(Function::new_builtin(name, binary.clone(), move |args| {
                    float_op(&args, name, op)
                })),
            );
        }
        context.define(
            "=",
            Value::Function(Function::new_builtin(
                "=",
                vec![Type::Any, Type::Any, Type::Bool],
                |args| Ok(Value::Bool(args[0] == args[1])),
            )),
        );
        context.define(
            "<",
            Value::Function(Function::new_builtin(
                "<",
                vec![Type::Float, Type::Float, Type::Bool],
                |args| match (&args[0], &args[1]) {
                    (Value::Float(a), Value::Float(b)) => Ok(Value::Bool(a < b)),
                    _ => Err(RuntimeError::new("expected numbers")),
                },
            )),
        );
        context.define(
            "not",
            Value::Function(Function::new_builtin(
                "not",
                vec![Type::Any, Type::Bool],
                |args| Ok(Value::Bool(!args[0].is_truthy())),
            )),
        );
    }

    /// `F` is the default namespace: plain structural inhabitation.
    pub fn default_semantics() -> IndexMap<String, Semantics> {
        let mut semantics = IndexMap::new();
        semantics.insert("F".to_string(), Semantics::structural("F"));
        semantics
    }

    pub fn default_types() -> IndexMap<String, TypeConstructor> {
        let mut types: IndexMap<String, TypeConstructor> = IndexMap::new();
        types.insert("Any".to_string(), Self::nullary("Any", Type::Any));
        types.insert("Float".to_string(), Self::nullary("Float", Type::Float));
        types.insert("Bool".to_string(), Self::nullary("Bool", Type::Bool));
        types.insert("String".to_string(), Self::nullary("String", Type::String));
        types.insert("Form".to_string(), Self::nullary("Form", Type::SpecialForm));
        // The one generic type: `(-> param... return)`.
        types.insert(
            "->".to_string(),
            Rc::new(|args: Vec<Type>| {
                if args.is_empty() {
                    return Err(RuntimeError::TypeArityMismatch {
                        name: "->".to_string(),
                        expected: 1,
                        actual: 0,
                    });
                }
                Ok(Type::Function(args))
            }),
        );
        types
    }

    fn nullary(name: &'static str, ty: Type) -> TypeConstructor {
        Rc::new(move |args: Vec<Type>| {
            if !args.is_empty() {
                return Err(RuntimeError::TypeArityMismatch {
                    name: name.to_string(),
                    expected: 0,
                    actual: args.len(),
                });
            }
            Ok(ty.clone())
        })
    }

    /// `(if! <condition> <then> <else>)`: condition evaluated eagerly, the
    /// branches left unevaluated until one is chosen.
    fn load_conditional_form(forms: &mut SpecialFormFactory) {
        forms.register(
            "if!",
            vec![
                ArgumentShape::EvaluatedExpr,
                ArgumentShape::UnevaluatedExpr,
                ArgumentShape::UnevaluatedExpr,
            ],
            Rc::new(|context, mut bindings| {
                let else_branch = pop_raw(&mut bindings, "if!")?;
                let then_branch = pop_raw(&mut bindings, "if!")?;
                let condition = match bindings.pop() {
                    Some(FormBinding::Evaluated(value)) => value,
                    _ => return Err(malformed("if!")),
                };
                let branch = if condition.is_truthy() {
                    then_branch
                } else {
                    else_branch
                };
                let (value, _) = context.eval(&branch, 0)?;
                Ok(value)
            }),
        );
    }

    /// `(def! <name> (<params>) <body>)`: binds a closure over a copy of
    /// the defining environment. Each invocation extends a fresh frame with
    /// the call's arguments and a self-binding for direct recursion.
    fn load_definition_form(forms: &mut SpecialFormFactory) {
        forms.register(
            "def!",
            vec![
                ArgumentShape::Name,
                ArgumentShape::ListOfNames,
                ArgumentShape::UnevaluatedExpr,
            ],
            Rc::new(|context, mut bindings| {
                let body = pop_raw(&mut bindings, "def!")?;
                let params = match bindings.pop() {
                    Some(FormBinding::Names(params)) => params,
                    _ => return Err(malformed("def!")),
                };
                let declared = match bindings.pop() {
                    Some(FormBinding::Name(param)) => param,
                    _ => return Err(malformed("def!")),
                };
                // An annotation on the declared name supplies the return
                // type; a Function annotation contributes its trailing slot.
                let return_type = match declared.ty {
                    Type::Function(signature) => {
                        signature.last().cloned().unwrap_or(Type::Any)
                    }
                    ty => ty,
                };
                let function = Function::new_closure(
                    &declared.name,
                    params,
                    return_type,
                    body,
                    context.env_snapshot(),
                );
                let value = Value::Function(function);
                context.define(&declared.name, value.clone());
                Ok(value)
            }),
        );
    }
}

fn pop_raw(bindings: &mut Vec<FormBinding>, form: &str) -> RuntimeResult<Vec<crate::parser::Token>> {
    match bindings.pop() {
        Some(FormBinding::Raw(tokens)) => Ok(tokens),
        _ => Err(malformed(form)),
    }
}

fn malformed(form: &str) -> RuntimeError {
    RuntimeError::Generic(format!("malformed bindings for {}", form))
}

pub fn float_op(args: &[Value], name: &str, op: impl Fn(f64, f64) -> f64) -> RuntimeResult<Value> {
    match (&args[0], &args[1]) {
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(op(*a, *b))),
        _ => Err(RuntimeError::TypeError {
            expected: "Float".to_string(),
            actual: "non-number".to_string(),
            operation: name.to_string(),
        }),
    }
}

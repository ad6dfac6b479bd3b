// Shared helpers for the integration tests.

#![allow(dead_code)]

use semlang::runtime::error::RuntimeError;
use semlang::runtime::stdlib::float_op;
use semlang::{BaseContext, Function, StandardLibrary, Type, Value};

pub fn host_context() -> BaseContext {
    StandardLibrary::create_host_context()
}

// For tests that assemble a context by hand, primitives registered through
// the public mechanism any embedding host would use.
pub fn install_numeric_primitives(context: &BaseContext) {
    let binary = vec![Type::Float, Type::Float, Type::Float];
    context.define(
        "+",
        Value::Function(Function::new_builtin("+", binary.clone(), |args| {
            float_op(&args, "+", |a, b| a + b)
        })),
    );
    context.define(
        "-",
        Value::Function(Function::new_builtin("-", binary.clone(), |args| {
            float_op(&args, "-", |a, b| a - b)
        })),
    );
    context.define(
        "*",
        Value::Function(Function::new_builtin("*", binary, |args| {
            float_op(&args, "*", |a, b| a * b)
        })),
    );
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
}

pub fn as_float(value: &Value) -> f64 {
    match value {
        Value::Float(f) => *f,
        other => panic!("expected a float, got {}", other),
    }
}

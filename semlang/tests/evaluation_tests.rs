// Evaluator behavior: literals, calls, index contracts, and failure modes.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use common::{as_float, host_context};
use semlang::runtime::error::RuntimeError;
use semlang::{tokenize, Context, Function, Type, Value};

#[test]
fn test_simple_addition() {
    let context = host_context();
    let value = context.evaluate_source("(+ 1 1)").unwrap();
    assert_eq!(value, Value::Float(2.0));
}

#[test]
fn test_nested_calls() {
    let context = host_context();
    let value = context.evaluate_source("(+ (* 2 3) 1)").unwrap();
    assert_eq!(as_float(&value), 7.0);
}

#[test]
fn test_numeric_literal() {
    let context = host_context();
    assert_eq!(context.evaluate_source("1.5").unwrap(), Value::Float(1.5));
    assert_eq!(context.evaluate_source("121").unwrap(), Value::Float(121.0));
}

#[test]
fn test_string_literal_strips_inclusive_quotes() {
    let context = host_context();
    assert_eq!(
        context.evaluate_source("\"heh\"").unwrap(),
        Value::String("heh".to_string())
    );
}

#[test]
fn test_lexical_variable_resolution() {
    let context = host_context();
    context.define("foo", Value::Float(9.0));
    assert_eq!(context.evaluate_source("foo").unwrap(), Value::Float(9.0));
    assert_eq!(
        context.evaluate_source("(+ foo 1)").unwrap(),
        Value::Float(10.0)
    );
}

#[test]
fn test_unresolvable_literal_is_fatal() {
    let context = host_context();
    assert_eq!(
        context.evaluate_source("baz"),
        Err(RuntimeError::InvalidLiteral("baz".to_string()))
    );
}

#[test]
fn test_empty_input_is_fatal() {
    let context = host_context();
    assert!(matches!(
        context.evaluate_source(""),
        Err(RuntimeError::UnexpectedEof(_))
    ));
}

#[test]
fn test_index_points_just_past_the_outermost_form() {
    let context = host_context();
    let tokens = tokenize("(+ 1 (* 2 3))");
    let (value, next) = context.eval(&tokens, 0).unwrap();
    assert_eq!(as_float(&value), 7.0);
    assert_eq!(next, tokens.len());
}

#[test]
fn test_consecutive_expressions_chain_by_index() {
    let context = host_context();
    let tokens = tokenize("(+ 1 1) (+ 2 2)");
    let (first, after_first) = context.eval(&tokens, 0).unwrap();
    assert_eq!(as_float(&first), 2.0);
    assert!(tokens[after_first].is_open());
    let (second, after_second) = context.eval(&tokens, after_first).unwrap();
    assert_eq!(as_float(&second), 4.0);
    assert_eq!(after_second, tokens.len());
}

#[test]
fn test_missing_close_paren_is_fatal() {
    let context = host_context();
    assert!(matches!(
        context.evaluate_source("(+ 1 1"),
        Err(RuntimeError::UnexpectedEof(_))
    ));
}

#[test]
fn test_non_callable_callee_is_fatal() {
    let context = host_context();
    assert!(matches!(
        context.evaluate_source("(1 2)"),
        Err(RuntimeError::NotCallable(_))
    ));
}

#[test]
fn test_argument_annotations_inside_calls() {
    let context = host_context();
    let value = context.evaluate_source("(+ 1?F:Float 1)").unwrap();
    assert_eq!(as_float(&value), 2.0);
}

#[test]
fn test_mistyped_argument_annotation_inside_call_is_fatal() {
    let context = host_context();
    assert!(matches!(
        context.evaluate_source("(+ 1?F:String 1)"),
        Err(RuntimeError::AnnotationMismatch { .. })
    ));
}

#[test]
fn test_wrong_arity_never_invokes_the_host_callable() {
    let context = host_context();
    let invoked = Rc::new(Cell::new(false));
    let witness = Rc::clone(&invoked);
    context.define(
        "probe",
        Value::Function(Function::new_builtin(
            "probe",
            vec![Type::Float, Type::Float],
            move |args| {
                witness.set(true);
                Ok(args[0].clone())
            },
        )),
    );

    let err = context.evaluate_source("(probe 1 2)").unwrap_err();
    assert!(matches!(err, RuntimeError::ArityMismatch { .. }));
    assert!(!invoked.get());
}

#[test]
fn test_mistyped_argument_never_invokes_the_host_callable() {
    let context = host_context();
    let invoked = Rc::new(Cell::new(false));
    let witness = Rc::clone(&invoked);
    context.define(
        "probe",
        Value::Function(Function::new_builtin(
            "probe",
            vec![Type::Float, Type::Float],
            move |args| {
                witness.set(true);
                Ok(args[0].clone())
            },
        )),
    );

    let err = context.evaluate_source("(probe \"a\")").unwrap_err();
    assert!(matches!(err, RuntimeError::TypeError { .. }));
    assert!(!invoked.get());

    assert_eq!(
        context.evaluate_source("(probe 1.5)").unwrap(),
        Value::Float(1.5)
    );
    assert!(invoked.get());
}

#[test]
fn test_trailing_tokens_after_single_expression_are_fatal() {
    let context = host_context();
    assert!(matches!(
        context.evaluate_source("(+ 1 1) junk"),
        Err(RuntimeError::UnexpectedToken { .. })
    ));
}

#[test]
fn test_program_returns_last_value() {
    let context = host_context();
    let value = context.evaluate_program("(+ 1 1) (+ 2 2)").unwrap();
    assert_eq!(value, Some(Value::Float(4.0)));
    assert_eq!(context.evaluate_program("  ").unwrap(), None);
}

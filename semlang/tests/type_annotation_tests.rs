// The `?semantics:type` postfix annotation: parsing, enforcement, and the
// round-trip guarantee.

mod common;

use pretty_assertions::assert_eq;

use common::{as_float, host_context};
use semlang::runtime::error::RuntimeError;
use semlang::{tokenize, Context, Value};

#[test]
fn test_matching_annotation_on_a_literal() {
    let context = host_context();
    assert_eq!(
        context.evaluate_source("1?F:Float").unwrap(),
        Value::Float(1.0)
    );
    assert_eq!(
        context.evaluate_source("\"hi\"?F:String").unwrap(),
        Value::String("hi".to_string())
    );
}

#[test]
fn test_mismatched_annotation_is_fatal() {
    let context = host_context();
    assert!(matches!(
        context.evaluate_source("1?F:String"),
        Err(RuntimeError::AnnotationMismatch { .. })
    ));
}

#[test]
fn test_annotation_on_a_call_result() {
    let context = host_context();
    let value = context.evaluate_source("(+ 1 1)?F:Float").unwrap();
    assert_eq!(as_float(&value), 2.0);
}

#[test]
fn test_wildcard_annotation_accepts_anything() {
    let context = host_context();
    assert!(context.evaluate_source("1?F:Any").is_ok());
    assert!(context.evaluate_source("\"s\"?F:Any").is_ok());
    assert!(context.evaluate_source("(+ 1 1)?F:Any").is_ok());
}

#[test]
fn test_function_annotation_compares_signatures_wildcard_permissively() {
    let context = host_context();
    context
        .evaluate_source("(def! inc (?F:Float x) (+ x 1))")
        .unwrap();
    assert!(context.evaluate_source("inc?F:(-> Float Any)").is_ok());
    assert!(context.evaluate_source("inc?F:(-> Any Any)").is_ok());
    assert!(matches!(
        context.evaluate_source("inc?F:(-> String Any)"),
        Err(RuntimeError::AnnotationMismatch { .. })
    ));
}

#[test]
fn test_unknown_semantics_is_fatal() {
    let context = host_context();
    assert_eq!(
        context.evaluate_source("1?G:Float"),
        Err(RuntimeError::UnknownSemantics("G".to_string()))
    );
}

#[test]
fn test_unknown_type_is_fatal() {
    let context = host_context();
    assert_eq!(
        context.evaluate_source("1?F:Complex"),
        Err(RuntimeError::UnknownType {
            name: "Complex".to_string(),
            semantics: "F".to_string(),
        })
    );
}

#[test]
fn test_missing_colon_is_fatal() {
    let context = host_context();
    assert!(matches!(
        context.evaluate_source("1 ?F Float"),
        Err(RuntimeError::UnexpectedToken { .. })
    ));
}

#[test]
fn test_truncated_annotations_are_fatal() {
    let context = host_context();
    assert!(matches!(
        context.evaluate_source("1 ?"),
        Err(RuntimeError::UnexpectedEof(_))
    ));
    assert!(matches!(
        context.evaluate_source("1 ?F:"),
        Err(RuntimeError::UnexpectedEof(_))
    ));
}

#[test]
fn test_unbalanced_parameterized_type_is_fatal() {
    let context = host_context();
    assert!(matches!(
        context.evaluate_source("1?F:(-> Float"),
        Err(RuntimeError::UnexpectedEof(_))
    ));
}

#[test]
fn test_nullary_type_rejects_parameters() {
    let context = host_context();
    assert_eq!(
        context.evaluate_source("1?F:(Float Float)"),
        Err(RuntimeError::TypeArityMismatch {
            name: "Float".to_string(),
            expected: 0,
            actual: 1,
        })
    );
}

#[test]
fn test_parse_error_stops_at_the_error_point() {
    // The bad annotation must fail before the second expression is touched.
    let context = host_context();
    let tokens = tokenize("1 ?F Float (undefined-thing)");
    let err = context.eval(&tokens, 0).unwrap_err();
    assert!(matches!(err, RuntimeError::UnexpectedToken { .. }));
}

#[test]
fn test_round_trip_with_own_runtime_type() {
    // Annotating any successfully-evaluated expression with its own runtime
    // type never raises a type error.
    let context = host_context();
    let semantics = context.get_semantics("F").unwrap();
    for source in ["1", "\"s\"", "(+ 1 2)", "(= 1 1)"] {
        let value = context.evaluate_source(source).unwrap();
        assert!(
            context.validate_type(&value, &semantics, &value.type_of()),
            "round trip failed for {}",
            source
        );
    }
    context
        .evaluate_source("(def! inc (?F:Float x) (+ x 1))")
        .unwrap();
    let inc = context.lookup("inc").unwrap();
    assert!(context.validate_type(&inc, &semantics, &inc.type_of()));
}

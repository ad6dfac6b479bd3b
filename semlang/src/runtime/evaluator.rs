// Recursive-descent evaluator for semantics-lang token sequences.
// One token lookahead, integer cursor; type annotations are a postfix
// modifier on any evaluated sub-expression.

use crate::parser::Token;
use crate::runtime::context::Context;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::values::Value;

/// Evaluate the expression starting at `index`. Returns the value together
/// with the index just past the consumed tokens (including any trailing
/// type annotation).
pub fn evaluate(
    tokens: &[Token],
    context: &dyn Context,
    index: usize,
) -> RuntimeResult<(Value, usize)> {
    let token = tokens
        .get(index)
        .ok_or_else(|| RuntimeError::eof("an expression"))?;

    let (value, mut next) = if token.is_open() {
        // Callee position first; a registered form name short-circuits into
        // shape-directed parsing instead of ordinary application.
        let (callee, after_callee) = evaluate(tokens, context, index + 1)?;
        if context.is_special_form(&callee) {
            context.apply_special_form(&callee, tokens, after_callee)?
        } else {
            let mut args = Vec::new();
            let mut idx = after_callee;
            loop {
                let tok = tokens
                    .get(idx)
                    .ok_or_else(|| RuntimeError::eof("')' to close the call"))?;
                if tok.is_close() {
                    idx += 1;
                    break;
                }
                let (arg, after_arg) = evaluate(tokens, context, idx)?;
                args.push(arg);
                idx = after_arg;
            }
            (context.call(&callee, args)?, idx)
        }
    } else {
        (context.literal(token)?, index + 1)
    };

    // Postfix annotation, uniformly applicable to literals, calls, and
    // special-form results. Validated at every occurrence. An unbound form
    // marker is exempt: a `?` right after a form name belongs to the form's
    // first slot, not to the marker.
    if !context.is_special_form(&value) && tokens.get(next).map_or(false, |t| t.is_annotation()) {
        let (semantics, annotated, after) = context.eval_type(tokens, next)?;
        if !context.validate_type(&value, &semantics, &annotated) {
            return Err(RuntimeError::AnnotationMismatch {
                value: value.to_string(),
                annotated: annotated.to_string(),
                semantics: semantics.name.clone(),
            });
        }
        next = after;
    }

    Ok((value, next))
}

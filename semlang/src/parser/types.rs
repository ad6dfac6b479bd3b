// Type-annotation sub-parser: the `? <semantics> : <type-expr>` postfix
// grammar. Called by the evaluator with the cursor on the `?` token.

use crate::parser::Token;
use crate::runtime::context::{Context, Semantics};
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::types::Type;

/// Parse one full annotation. The semantics namespace is resolved once and
/// threaded into every nested type parameter, so a generic type's children
/// share their parent's namespace.
pub fn parse_type_annotation(
    tokens: &[Token],
    context: &dyn Context,
    index: usize,
) -> RuntimeResult<(Semantics, Type, usize)> {
    let prefix = tokens
        .get(index)
        .ok_or_else(|| RuntimeError::eof("a type annotation"))?;
    if !prefix.is_annotation() {
        return Err(RuntimeError::UnexpectedToken {
            expected: "'?' to begin a type annotation".to_string(),
            found: prefix.to_string(),
        });
    }

    let name = tokens
        .get(index + 1)
        .ok_or_else(|| RuntimeError::eof("a semantics name after '?'"))?;
    let semantics = context.get_semantics(name.as_str())?;

    let colon = tokens
        .get(index + 2)
        .ok_or_else(|| RuntimeError::eof("':' after the semantics name"))?;
    if !colon.is_colon() {
        return Err(RuntimeError::UnexpectedToken {
            expected: "':' between semantics and type".to_string(),
            found: colon.to_string(),
        });
    }

    let (ty, next) = parse_type_expr(tokens, context, &semantics, index + 3)?;
    Ok((semantics, ty, next))
}

/// `<type-expr>` is a bare name or `( base <type-expr>* )`, recursively.
fn parse_type_expr(
    tokens: &[Token],
    context: &dyn Context,
    semantics: &Semantics,
    index: usize,
) -> RuntimeResult<(Type, usize)> {
    let token = tokens
        .get(index)
        .ok_or_else(|| RuntimeError::eof("a type expression after ':'"))?;

    if token.is_open() {
        let base = tokens
            .get(index + 1)
            .ok_or_else(|| RuntimeError::eof("a base type name after '('"))?;
        if base.is_structural() {
            return Err(RuntimeError::UnexpectedToken {
                expected: "a base type name".to_string(),
                found: base.to_string(),
            });
        }
        let mut args = Vec::new();
        let mut idx = index + 2;
        loop {
            let tok = tokens
                .get(idx)
                .ok_or_else(|| RuntimeError::eof("')' to close a parameterized type"))?;
            if tok.is_close() {
                idx += 1;
                break;
            }
            let (arg, after_arg) = parse_type_expr(tokens, context, semantics, idx)?;
            args.push(arg);
            idx = after_arg;
        }
        let ty = context.get_type(semantics, base.as_str(), args)?;
        Ok((ty, idx))
    } else if token.is_structural() {
        Err(RuntimeError::UnexpectedToken {
            expected: "a type name".to_string(),
            found: token.to_string(),
        })
    } else {
        let ty = context.get_type(semantics, token.as_str(), Vec::new())?;
        Ok((ty, index + 1))
    }
}

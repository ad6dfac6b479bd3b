// Special-form extension mechanism: a registry of (argument shapes, binder)
// records plus one generic shape interpreter. New binding constructs are
// declared against the registry; the evaluator itself never changes.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::parser::Token;
use crate::runtime::context::{BaseContext, Context};
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::types::Type;
use crate::runtime::values::{FormInstance, Param, Value};

/// How one slot of a form's argument list is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentShape {
    /// One bare identifier, optionally typed by a preceding annotation.
    Name,
    /// A parenthesized, whitespace-separated identifier list.
    ListOfNames,
    /// One balanced group or bare token, retained unevaluated.
    UnevaluatedExpr,
    /// Delegates to the evaluator and keeps the result.
    EvaluatedExpr,
}

/// A parsed slot, in declared order, handed to the form's binder.
#[derive(Debug, Clone)]
pub enum FormBinding {
    Name(Param),
    Names(Vec<Param>),
    Raw(Vec<Token>),
    Evaluated(Value),
}

pub type Binder = Rc<dyn Fn(&BaseContext, Vec<FormBinding>) -> RuntimeResult<Value>>;

pub struct FormSpec {
    pub name: String,
    pub shapes: Vec<ArgumentShape>,
    pub binder: Binder,
}

impl fmt::Debug for FormSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSpec")
            .field("name", &self.name)
            .field("shapes", &self.shapes)
            .finish()
    }
}

/// Registry of grammar extensions, keyed by form name. Registered once at
/// context construction; each occurrence in source text is parsed into a
/// fresh `FormInstance`.
#[derive(Debug, Default)]
pub struct SpecialFormFactory {
    forms: IndexMap<String, Rc<FormSpec>>,
}

impl SpecialFormFactory {
    pub fn new() -> Self {
        SpecialFormFactory {
            forms: IndexMap::new(),
        }
    }

    pub fn register(
        &mut self,
        name: &str,
        shapes: Vec<ArgumentShape>,
        binder: Binder,
    ) -> Rc<FormSpec> {
        let spec = Rc::new(FormSpec {
            name: name.to_string(),
            shapes,
            binder,
        });
        self.forms.insert(name.to_string(), Rc::clone(&spec));
        spec
    }

    pub fn contains(&self, name: &str) -> bool {
        self.forms.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Rc<FormSpec>> {
        self.forms.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.forms.keys().map(|s| s.as_str())
    }
}

/// Identifiers may not be structural delimiters and may not parse as
/// numbers.
pub(crate) fn ensure_is_name(token: &Token) -> RuntimeResult<String> {
    if token.is_structural() {
        return Err(RuntimeError::NotAnIdentifier(token.to_string()));
    }
    if token.as_str().parse::<f64>().is_ok() {
        return Err(RuntimeError::NotAnIdentifier(token.to_string()));
    }
    Ok(token.as_str().to_string())
}

/// Parse one occurrence of a registered form, the cursor sitting just past
/// the form name. Consumes one slot per declared shape plus the closing
/// `)`, applies the binder, and wraps its result in a fresh instance.
pub fn parse_form(
    spec: &FormSpec,
    tokens: &[Token],
    context: &BaseContext,
    index: usize,
) -> RuntimeResult<(Value, usize)> {
    let mut bindings = Vec::with_capacity(spec.shapes.len());
    let mut idx = index;

    for shape in &spec.shapes {
        match shape {
            ArgumentShape::Name => {
                let (param, after) = parse_name(spec, tokens, context, idx)?;
                bindings.push(FormBinding::Name(param));
                idx = after;
            }
            ArgumentShape::ListOfNames => {
                let open = tokens
                    .get(idx)
                    .ok_or_else(|| RuntimeError::eof("'(' to open a name list"))?;
                if !open.is_open() {
                    return Err(RuntimeError::UnexpectedToken {
                        expected: format!("'(' to open the name list of {}", spec.name),
                        found: open.to_string(),
                    });
                }
                idx += 1;
                let mut names = Vec::new();
                loop {
                    let tok = tokens
                        .get(idx)
                        .ok_or_else(|| RuntimeError::eof("')' to close a name list"))?;
                    if tok.is_close() {
                        idx += 1;
                        break;
                    }
                    let (param, after) = parse_name(spec, tokens, context, idx)?;
                    names.push(param);
                    idx = after;
                }
                bindings.push(FormBinding::Names(names));
            }
            ArgumentShape::UnevaluatedExpr => {
                let tok = tokens
                    .get(idx)
                    .ok_or_else(|| RuntimeError::eof("a deferred expression"))?;
                if tok.is_open() {
                    // Balanced group, nesting depth tracked, parens kept.
                    let mut depth = 1usize;
                    let mut end = idx + 1;
                    while depth > 0 {
                        let t = tokens.get(end).ok_or_else(|| {
                            RuntimeError::eof("')' balancing a deferred expression")
                        })?;
                        if t.is_open() {
                            depth += 1;
                        } else if t.is_close() {
                            depth -= 1;
                        }
                        end += 1;
                    }
                    bindings.push(FormBinding::Raw(tokens[idx..end].to_vec()));
                    idx = end;
                } else {
                    bindings.push(FormBinding::Raw(vec![tok.clone()]));
                    idx += 1;
                }
            }
            ArgumentShape::EvaluatedExpr => {
                let (value, after) = context.eval(tokens, idx)?;
                bindings.push(FormBinding::Evaluated(value));
                idx = after;
            }
        }
    }

    let close = tokens
        .get(idx)
        .ok_or_else(|| RuntimeError::UnexpectedEof(format!("')' to close {}", spec.name)))?;
    if !close.is_close() {
        return Err(RuntimeError::UnexpectedToken {
            expected: format!("')' to close {}", spec.name),
            found: close.to_string(),
        });
    }

    let bound = (spec.binder)(context, bindings)?;
    let instance = FormInstance {
        form: spec.name.clone(),
        binding: Some(bound),
    };
    Ok((Value::SpecialForm(Rc::new(instance)), idx + 1))
}

/// An optional annotation precedes the name it types; absent, the bound
/// name gets the wildcard type.
fn parse_name(
    spec: &FormSpec,
    tokens: &[Token],
    context: &BaseContext,
    index: usize,
) -> RuntimeResult<(Param, usize)> {
    let (ty, idx) = if tokens.get(index).map_or(false, |t| t.is_annotation()) {
        let (_semantics, ty, after) = context.eval_type(tokens, index)?;
        (ty, after)
    } else {
        (Type::Any, index)
    };
    let token = tokens.get(idx).ok_or_else(|| {
        RuntimeError::UnexpectedEof(format!("an identifier to complete {}", spec.name))
    })?;
    let name = ensure_is_name(token)?;
    Ok((Param { name, ty }, idx + 1))
}

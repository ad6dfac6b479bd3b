// The context seam every component is parameterized over: literal
// resolution, application, semantics/type lookup, and the re-entrant
// evaluation hooks special forms use.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::parser::types::parse_type_annotation;
use crate::parser::{tokenize, Token};
use crate::runtime::environment::Environment;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::evaluator::evaluate;
use crate::runtime::special_form::{parse_form, SpecialFormFactory};
use crate::runtime::types::Type;
use crate::runtime::values::{FormInstance, Function, FunctionBody, Value};

/// A semantics namespace: an indirection layer that scopes how type names
/// are interpreted and how values are judged to inhabit a type. Distinct
/// namespaces may give the same type name different meanings.
#[derive(Clone)]
pub struct Semantics {
    pub name: String,
    check: Rc<dyn Fn(&Type, &Value) -> bool>,
}

impl Semantics {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Type, &Value) -> bool + 'static,
    {
        Semantics {
            name: name.into(),
            check: Rc::new(check),
        }
    }

    /// Plain structural inhabitation.
    pub fn structural(name: impl Into<String>) -> Self {
        Semantics::new(name, |ty, value| ty.validates(value))
    }

    pub fn check(&self, ty: &Type, value: &Value) -> bool {
        (self.check)(ty, value)
    }
}

impl fmt::Debug for Semantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Semantics").field("name", &self.name).finish()
    }
}

/// Resolves a (possibly parameterized) type name to a concrete `Type`,
/// checking the parameter count.
pub type TypeConstructor = Rc<dyn Fn(Vec<Type>) -> RuntimeResult<Type>>;

/// The boundary the evaluator and the annotation parser depend on.
pub trait Context {
    /// Resolve a bare token: lexical variable, double-quoted string
    /// (inclusive delimiters stripped), or numeric literal.
    fn literal(&self, token: &Token) -> RuntimeResult<Value>;

    /// Apply a callee to evaluated arguments. Fails on a non-callable
    /// callee, arity mismatch, or argument type mismatch.
    fn call(&self, callee: &Value, args: Vec<Value>) -> RuntimeResult<Value>;

    fn get_semantics(&self, name: &str) -> RuntimeResult<Semantics>;

    fn get_type(
        &self,
        semantics: &Semantics,
        name: &str,
        args: Vec<Type>,
    ) -> RuntimeResult<Type>;

    fn validate_type(&self, value: &Value, semantics: &Semantics, ty: &Type) -> bool;

    /// Should this evaluated callee trigger special-form parsing instead of
    /// ordinary application?
    fn is_special_form(&self, callee: &Value) -> bool;

    /// Parse one occurrence of the form named by `callee`, the cursor just
    /// past the form name.
    fn apply_special_form(
        &self,
        callee: &Value,
        tokens: &[Token],
        index: usize,
    ) -> RuntimeResult<(Value, usize)>;

    /// Re-entrant hook special forms use to evaluate sub-expressions.
    fn eval(&self, tokens: &[Token], index: usize) -> RuntimeResult<(Value, usize)>;

    /// Re-entrant hook for nested type-annotation parsing.
    fn eval_type(
        &self,
        tokens: &[Token],
        index: usize,
    ) -> RuntimeResult<(Semantics, Type, usize)>;
}

/// Concrete context: lexical environment behind interior mutability plus
/// shared semantics/type/form registries. Child contexts created for calls
/// share the registries and get their own environment frame.
pub struct BaseContext {
    env: RefCell<Environment>,
    semantics: Rc<IndexMap<String, Semantics>>,
    types: Rc<IndexMap<String, TypeConstructor>>,
    forms: Rc<SpecialFormFactory>,
}

impl BaseContext {
    pub fn new(
        env: Environment,
        semantics: IndexMap<String, Semantics>,
        types: IndexMap<String, TypeConstructor>,
        forms: SpecialFormFactory,
    ) -> Self {
        BaseContext {
            env: RefCell::new(env),
            semantics: Rc::new(semantics),
            types: Rc::new(types),
            forms: Rc::new(forms),
        }
    }

    /// A context over `env` sharing this context's registries. This is how
    /// calls and form bodies get private frames.
    pub fn with_env(&self, env: Environment) -> BaseContext {
        BaseContext {
            env: RefCell::new(env),
            semantics: Rc::clone(&self.semantics),
            types: Rc::clone(&self.types),
            forms: Rc::clone(&self.forms),
        }
    }

    /// Bind a name in this context's environment for the remainder of the
    /// current scope.
    pub fn define(&self, name: &str, value: Value) {
        self.env.borrow_mut().define(name, value);
    }

    pub fn lookup(&self, name: &str) -> RuntimeResult<Value> {
        self.env.borrow().lookup(name)
    }

    /// A copy of the current environment, for closure capture.
    pub fn env_snapshot(&self) -> Environment {
        self.env.borrow().clone()
    }

    /// Evaluate exactly one expression; trailing tokens are an error.
    pub fn evaluate_source(&self, source: &str) -> RuntimeResult<Value> {
        let tokens = tokenize(source);
        let (value, next) = self.eval(&tokens, 0)?;
        if next != tokens.len() {
            return Err(RuntimeError::UnexpectedToken {
                expected: "end of input".to_string(),
                found: tokens[next].to_string(),
            });
        }
        Ok(value)
    }

    /// Evaluate a sequence of top-level expressions, returning the last
    /// value (None for empty input).
    pub fn evaluate_program(&self, source: &str) -> RuntimeResult<Option<Value>> {
        let tokens = tokenize(source);
        let mut index = 0;
        let mut last = None;
        while index < tokens.len() {
            let (value, next) = self.eval(&tokens, index)?;
            last = Some(value);
            index = next;
        }
        Ok(last)
    }

    fn call_function(&self, function: &Rc<Function>, args: Vec<Value>) -> RuntimeResult<Value> {
        function.check_args(&args)?;
        match &function.body {
            FunctionBody::Builtin(func) => func(args),
            FunctionBody::Closure(closure) => {
                let mut frame = Environment::with_parent(Rc::new(closure.env.clone()));
                for (param, arg) in closure.params.iter().zip(args) {
                    frame.define(&param.name, arg);
                }
                // Explicit self-binding: direct recursion resolves inside
                // the call frame without the name existing in the enclosing
                // scope beforehand.
                frame.define(&function.name, Value::Function(Rc::clone(function)));
                let body_context = self.with_env(frame);
                let (value, _) = body_context.eval(&closure.body, 0)?;
                // A form occurrence as the whole body returns the binder's
                // result, not the occurrence wrapper; otherwise an
                // `if!`-bodied function could never satisfy a typed caller.
                if let Some(bound) = value.form_binding() {
                    return Ok(bound.clone());
                }
                Ok(value)
            }
        }
    }
}

impl Context for BaseContext {
    fn literal(&self, token: &Token) -> RuntimeResult<Value> {
        let text = token.as_str();
        if self.forms.contains(text) {
            // Unbound marker; dispatch happens on this tag in the evaluator.
            return Ok(Value::SpecialForm(Rc::new(FormInstance {
                form: text.to_string(),
                binding: None,
            })));
        }
        if let Ok(value) = self.env.borrow().lookup(text) {
            return Ok(value);
        }
        if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            return Ok(Value::String(text[1..text.len() - 1].to_string()));
        }
        text.parse::<f64>()
            .map(Value::Float)
            .map_err(|_| RuntimeError::InvalidLiteral(text.to_string()))
    }

    fn call(&self, callee: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
        match callee {
            Value::Function(function) => self.call_function(function, args),
            other => Err(RuntimeError::NotCallable(other.to_string())),
        }
    }

    fn get_semantics(&self, name: &str) -> RuntimeResult<Semantics> {
        self.semantics
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownSemantics(name.to_string()))
    }

    fn get_type(
        &self,
        semantics: &Semantics,
        name: &str,
        args: Vec<Type>,
    ) -> RuntimeResult<Type> {
        let constructor = self.types.get(name).ok_or_else(|| RuntimeError::UnknownType {
            name: name.to_string(),
            semantics: semantics.name.clone(),
        })?;
        constructor(args)
    }

    fn validate_type(&self, value: &Value, semantics: &Semantics, ty: &Type) -> bool {
        semantics.check(ty, value)
    }

    fn is_special_form(&self, callee: &Value) -> bool {
        match callee {
            Value::SpecialForm(instance) => {
                instance.binding.is_none() && self.forms.contains(&instance.form)
            }
            _ => false,
        }
    }

    fn apply_special_form(
        &self,
        callee: &Value,
        tokens: &[Token],
        index: usize,
    ) -> RuntimeResult<(Value, usize)> {
        let instance = match callee {
            Value::SpecialForm(instance) => instance,
            other => return Err(RuntimeError::NotCallable(other.to_string())),
        };
        let spec = self
            .forms
            .get(&instance.form)
            .ok_or_else(|| RuntimeError::UndefinedSymbol(instance.form.clone()))?;
        parse_form(&spec, tokens, self, index)
    }

    fn eval(&self, tokens: &[Token], index: usize) -> RuntimeResult<(Value, usize)> {
        evaluate(tokens, self, index)
    }

    fn eval_type(
        &self,
        tokens: &[Token],
        index: usize,
    ) -> RuntimeResult<(Semantics, Type, usize)> {
        parse_type_annotation(tokens, self, index)
    }
}

// semlang - semantics-lang interpreter library
// A parenthesized expression language whose literals and results may carry
// inline type annotations (`?semantics:type`), with a grammar extensible at
// runtime through special forms.

pub mod parser;
pub mod runtime;

// Re-export the key components so embedding hosts reach everything from the
// crate root.
pub use parser::{tokenize, Token, Tokenizer};
pub use runtime::context::{BaseContext, Context, Semantics};
pub use runtime::error::{RuntimeError, RuntimeResult};
pub use runtime::evaluator::evaluate;
pub use runtime::special_form::{ArgumentShape, FormBinding, SpecialFormFactory};
pub use runtime::stdlib::StandardLibrary;
pub use runtime::types::Type;
pub use runtime::values::{Function, Value};

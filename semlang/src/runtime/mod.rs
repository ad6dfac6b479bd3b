// Runtime system for semlang
// Value model, lexical environments, the evaluator, and the context seam.

pub mod context;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod special_form;
pub mod stdlib;
pub mod types;
pub mod values;

pub use context::{BaseContext, Context, Semantics, TypeConstructor};
pub use environment::Environment;
pub use error::{RuntimeError, RuntimeResult};
pub use evaluator::evaluate;
pub use special_form::{ArgumentShape, FormBinding, SpecialFormFactory};
pub use types::Type;
pub use values::{Function, Value};

// Error handling for the semlang runtime

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Fatal evaluation errors. Any of these aborts the current top-level
/// evaluation; the core performs no recovery and produces no partial result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("Unexpected end of input while parsing {0}")]
    UnexpectedEof(String),

    #[error("Expected {expected}, found '{found}'")]
    UnexpectedToken { expected: String, found: String },

    #[error("Undefined symbol: {0}")]
    UndefinedSymbol(String),

    #[error("'{0}' is neither a bound name, a string literal, nor a number")]
    InvalidLiteral(String),

    #[error("Expected identifier, found '{0}'")]
    NotAnIdentifier(String),

    #[error("Unknown semantics namespace: {0}")]
    UnknownSemantics(String),

    #[error("Unknown type '{name}' in semantics {semantics}")]
    UnknownType { name: String, semantics: String },

    #[error("Type '{name}' takes {expected} parameter(s), got {actual}")]
    TypeArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Arity mismatch in {function}: expected {expected}, got {actual}")]
    ArityMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("Type error in {operation}: expected {expected}, got {actual}")]
    TypeError {
        expected: String,
        actual: String,
        operation: String,
    },

    #[error("{value} does not inhabit {annotated} under semantics {semantics}")]
    AnnotationMismatch {
        value: String,
        annotated: String,
        semantics: String,
    },

    #[error("Not callable: {0}")]
    NotCallable(String),

    #[error("Runtime error: {0}")]
    Generic(String),
}

impl RuntimeError {
    pub fn new(message: &str) -> RuntimeError {
        RuntimeError::Generic(message.to_string())
    }

    pub fn eof(context: &str) -> RuntimeError {
        RuntimeError::UnexpectedEof(context.to_string())
    }
}

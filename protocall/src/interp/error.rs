//! Runtime errors for the interpreter

use thiserror::Error;

/// Runtime error during interpretation
///
/// Any runtime error aborts the whole execution; there is no recovery
/// construct in the language.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Identifier unresolved in both the call frame and the global frame,
    /// or a call to an unknown function
    NameError,
    /// Projection or assignment through a missing or non-composite segment
    FieldError,
    /// Operator or condition applied to an incompatible value
    TypeError,
    /// Call shape the target does not accept
    ArityError,
    /// Call depth exhausted
    RecursionError,
    /// Output sink failure
    IoError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::NameError => "NameError",
            ErrorKind::FieldError => "FieldError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ArityError => "ArityError",
            ErrorKind::RecursionError => "RecursionError",
            ErrorKind::IoError => "IoError",
        };
        write!(f, "{s}")
    }
}

impl RuntimeError {
    fn new(kind: ErrorKind, message: String) -> Self {
        RuntimeError { kind, message }
    }

    pub fn undefined_variable(name: &str) -> Self {
        Self::new(ErrorKind::NameError, format!("undefined variable: {name}"))
    }

    pub fn undefined_function(name: &str) -> Self {
        Self::new(ErrorKind::NameError, format!("undefined function: {name}"))
    }

    pub fn builtin_redefined(name: &str) -> Self {
        Self::new(ErrorKind::NameError, format!("cannot redefine builtin: {name}"))
    }

    pub fn missing_field(type_name: &str, field: &str) -> Self {
        Self::new(ErrorKind::FieldError, format!("{type_name} has no field: {field}"))
    }

    pub fn not_a_record(path: &str, got: &str) -> Self {
        Self::new(ErrorKind::FieldError, format!("{path} is not a record, got {got}"))
    }

    pub fn not_an_array(path: &str, got: &str) -> Self {
        Self::new(ErrorKind::FieldError, format!("{path} is not an array, got {got}"))
    }

    pub fn index_out_of_bounds(index: i64, len: usize) -> Self {
        Self::new(
            ErrorKind::FieldError,
            format!("index {index} out of bounds for length {len}"),
        )
    }

    pub fn type_error(expected: &str, got: &str) -> Self {
        Self::new(ErrorKind::TypeError, format!("expected {expected}, got {got}"))
    }

    pub fn operand_mismatch(op: &str, left: &str, right: &str) -> Self {
        Self::new(
            ErrorKind::TypeError,
            format!("operator {op} cannot be applied to {left} and {right}"),
        )
    }

    pub fn overflow(op: &str, left: i64, right: i64) -> Self {
        Self::new(
            ErrorKind::TypeError,
            format!("integer overflow or division by zero: {left} {op} {right}"),
        )
    }

    pub fn no_value(target: &str) -> Self {
        Self::new(ErrorKind::TypeError, format!("call to {target} produced no value"))
    }

    pub fn bad_type_name(name: &str) -> Self {
        Self::new(ErrorKind::TypeError, format!("malformed record type name: {name:?}"))
    }

    pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> Self {
        Self::new(
            ErrorKind::ArityError,
            format!("function {name} expects {expected} argument(s), got {got}"),
        )
    }

    pub fn duplicate_argument(function: &str, arg: &str) -> Self {
        Self::new(
            ErrorKind::ArityError,
            format!("argument {arg} given more than once in call to {function}"),
        )
    }

    pub fn bad_argument(function: &str, detail: &str) -> Self {
        Self::new(ErrorKind::ArityError, format!("{function}: {detail}"))
    }

    pub fn recursion_limit(limit: usize) -> Self {
        Self::new(
            ErrorKind::RecursionError,
            format!("maximum call depth {limit} exceeded"),
        )
    }

    pub fn io_error(msg: &str) -> Self {
        Self::new(ErrorKind::IoError, format!("output error: {msg}"))
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(e: std::io::Error) -> Self {
        RuntimeError::io_error(&e.to_string())
    }
}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;

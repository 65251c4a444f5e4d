//! Error types for value manipulation.
//!
//! Factory functions populate both the structured `kind` and the display
//! `message`, so callers can match on the category while diagnostics
//! stay readable.

use std::fmt;

/// Result of a value operation.
pub type EvalResult = Result<crate::value::Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// A value's type does not match the declared slot or parameter type.
    TypeMismatch { expected: String, got: String },
    /// A native method was called with the wrong number of arguments.
    WrongArgCount {
        method: String,
        expected: usize,
        found: usize,
    },
    /// A native method was called on the wrong kind of receiver.
    WrongReceiver { method: String, got: String },
    /// List index out of range.
    IndexOutOfBounds { index: i64, len: usize },
    /// A member name did not resolve in the memory space.
    UndefinedMember { name: String },
    /// A callable invocation failed inside the interpreter.
    Invoke { detail: String },
    /// An internal invariant did not hold.
    Internal { detail: String },
}

/// An error produced while manipulating runtime values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    message: String,
}

impl EvalError {
    fn new(kind: EvalErrorKind, message: String) -> Self {
        EvalError { kind, message }
    }

    /// The rendered message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

// Factory constructors

pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::TypeMismatch {
            expected: expected.to_owned(),
            got: got.to_owned(),
        },
        format!("type mismatch: expected `{expected}`, found `{got}`"),
    )
}

pub fn wrong_arg_count(method: &str, expected: usize, found: usize) -> EvalError {
    EvalError::new(
        EvalErrorKind::WrongArgCount {
            method: method.to_owned(),
            expected,
            found,
        },
        format!("`{method}` expects {expected} argument(s), found {found}"),
    )
}

pub fn wrong_receiver(method: &str, got: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::WrongReceiver {
            method: method.to_owned(),
            got: got.to_owned(),
        },
        format!("`{method}` is not defined on `{got}` receivers"),
    )
}

pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::new(
        EvalErrorKind::IndexOutOfBounds { index, len },
        format!("index {index} out of bounds for length {len}"),
    )
}

pub fn undefined_member(name: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::UndefinedMember {
            name: name.to_owned(),
        },
        format!("member `{name}` is not declared in this memory space"),
    )
}

pub fn invoke_failed(detail: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::Invoke {
            detail: detail.to_owned(),
        },
        format!("callable invocation failed: {detail}"),
    )
}

pub fn internal(detail: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::Internal {
            detail: detail.to_owned(),
        },
        format!("internal invariant violated: {detail}"),
    )
}

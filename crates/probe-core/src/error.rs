//! Error types for the harness.
//!
//! The harness distinguishes four families of errors:
//!
//! - [`ConfigError`]: wiring mistakes detected while building tests, suites,
//!   catalogs or loading configuration. Fatal to startup, never recorded in a
//!   [`TestResult`](crate::TestResult).
//! - [`TargetError`]: anything raised by code under test. Probes classify these
//!   as expected or unexpected.
//! - [`SetupError`]: the probe could not even set up an invocation (no receiver,
//!   no invoker). Aborts the probe; converted to a failing result at the
//!   [`Test::run`](crate::Test::run) boundary.
//! - [`ReportError`]: the full-detail report could not be written.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while wiring up tests, suites and the engine.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A target type was not found in the catalog.
    #[error("type '{0}' is not registered")]
    UnknownType(String),

    /// A covered operation is not part of the introspected operation set.
    #[error("operation '{operation}' was not found in the test types")]
    UnknownOperation { operation: String },

    /// An exactly-one lookup found zero or several operations.
    #[error("expected exactly one operation named '{name}' on '{type_name}', found {found}")]
    AmbiguousOperation {
        type_name: String,
        name: String,
        found: usize,
    },

    /// A constructor with the requested parameter shapes does not exist.
    #[error("no constructor ({params}) on '{type_name}'")]
    UnknownConstructor { type_name: String, params: String },

    /// A required value was empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// A type was registered twice.
    #[error("type '{0}' is registered more than once")]
    DuplicateType(String),

    /// A type expression could not be parsed.
    #[error("invalid type expression '{input}': {reason}")]
    InvalidTypeExpr { input: String, reason: String },

    /// Reading a configuration file failed.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parsing a configuration file failed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Classification of an error raised by code under test.
///
/// Probes use the kind to decide whether a raised error is on their allow-list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// An argument violated the operation's contract.
    IllegalArgument,
    /// The receiver was in a state that forbids the call.
    IllegalState,
    /// The target dereferenced an absent value without validating it first.
    NullDereference,
    /// The operation is not supported.
    Unsupported,
    /// An index or key was out of range.
    IndexOutOfBounds,
    /// Arithmetic overflow or division by zero.
    Arithmetic,
    /// A value of the wrong type reached the operation.
    TypeMismatch,
    /// The operation panicked.
    Panic,
    /// Any other, target-specific kind.
    Other(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::IllegalArgument => write!(f, "IllegalArgument"),
            ErrorKind::IllegalState => write!(f, "IllegalState"),
            ErrorKind::NullDereference => write!(f, "NullDereference"),
            ErrorKind::Unsupported => write!(f, "Unsupported"),
            ErrorKind::IndexOutOfBounds => write!(f, "IndexOutOfBounds"),
            ErrorKind::Arithmetic => write!(f, "Arithmetic"),
            ErrorKind::TypeMismatch => write!(f, "TypeMismatch"),
            ErrorKind::Panic => write!(f, "Panic"),
            ErrorKind::Other(name) => write!(f, "{}", name),
        }
    }
}

/// An error raised by code under test.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}: {message}")]
pub struct TargetError {
    pub kind: ErrorKind,
    pub message: String,
}

impl TargetError {
    /// Creates a new target error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalArgument, message)
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalState, message)
    }

    pub fn null_dereference(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NullDereference, message)
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch, message)
    }

    /// Builds a `Panic` error from a caught panic payload.
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "panic with non-string payload".to_string()
        };
        Self::new(ErrorKind::Panic, message)
    }

    /// Returns true for a raw absence dereference.
    pub fn is_null_dereference(&self) -> bool {
        self.kind == ErrorKind::NullDereference
    }
}

/// A probe could not set up an invocation.
#[derive(Debug, Clone, Error)]
pub enum SetupError {
    /// No default value is registered for a shape the probe requires.
    #[error("no default value available for '{0}'")]
    NoDefault(String),

    /// The catalog has no invoker for a discovered operation.
    #[error("no invoker registered for '{0}'")]
    NoInvoker(String),
}

/// Anything a test body may propagate with `?`.
///
/// Converted into a failing [`TestResult`](crate::TestResult) at the
/// [`Test::run`](crate::Test::run) boundary.
#[derive(Debug, Error)]
pub enum TestFault {
    #[error("setup aborted: {0}")]
    Setup(#[from] SetupError),

    #[error("{0}")]
    Target(#[from] TargetError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Other(String),
}

/// The full-detail report could not be written.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("could not write full output to '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_error_display() {
        let err = TargetError::illegal_argument("name must not be empty");
        assert_eq!(err.to_string(), "IllegalArgument: name must not be empty");
    }

    #[test]
    fn test_other_kind_display_uses_name() {
        let err = TargetError::new(ErrorKind::Other("QuotaExceeded".into()), "full");
        assert_eq!(err.to_string(), "QuotaExceeded: full");
    }

    #[test]
    fn test_from_panic_payloads() {
        let err = TargetError::from_panic(&"boom");
        assert_eq!(err.kind, ErrorKind::Panic);
        assert_eq!(err.message, "boom");

        let err = TargetError::from_panic(&String::from("owned boom"));
        assert_eq!(err.message, "owned boom");

        let err = TargetError::from_panic(&42_u8);
        assert!(err.message.contains("non-string"));
    }

    #[test]
    fn test_null_dereference_flag() {
        assert!(TargetError::null_dereference("x").is_null_dereference());
        assert!(!TargetError::illegal_state("x").is_null_dereference());
    }
}

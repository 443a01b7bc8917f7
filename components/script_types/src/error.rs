//! Script error types and error handling.
//!
//! This module provides the error taxonomy surfaced by the dynamic layer:
//! property accessors, callables, and the promise resolution procedure all
//! report failure through [`ScriptError`].

use std::fmt;
use thiserror::Error;

/// The kind of script error.
///
/// These correspond to the built-in error categories a host script can
/// observe as a rejection reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Type mismatch (e.g. resolving a promise with itself, calling a
    /// non-callable)
    TypeError,
    /// Value out of allowed range
    RangeError,
    /// Reference to something that does not exist
    ReferenceError,
    /// Internal runtime error
    InternalError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::InternalError => "InternalError",
        };
        write!(f, "{}", name)
    }
}

/// A script-level error with a kind and message.
///
/// Errors of this type never unwind across the promise core's public
/// boundary; they are converted into rejection values as early as possible.
///
/// # Examples
///
/// ```
/// use script_types::{ErrorKind, ScriptError};
///
/// let error = ScriptError::type_error("promise resolved with itself");
/// assert_eq!(error.kind, ErrorKind::TypeError);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ScriptError {
    /// The category of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl ScriptError {
    /// Creates a new error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a new `TypeError`.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    /// Creates a new `InternalError`.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message)
    }
}

/// Result type for fallible script operations.
pub type ScriptResult<T> = Result<T, ScriptError>;

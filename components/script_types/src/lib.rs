//! Core dynamic value types and error handling for the promise runtime.
//!
//! This crate provides the foundational types the promise resolution
//! procedure operates on: a dynamic value representation, callable handles,
//! plain data objects with fallible property reads, the promise settlement
//! record, and script-level error types.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of dynamic script values
//! - [`Function`] - Cloneable callable handle
//! - [`ObjectData`] - Plain data object with data and accessor properties
//! - [`PromiseCell`] - Settlement state record shared behind a [`PromiseRef`]
//! - [`ScriptError`] - Script errors with an [`ErrorKind`] taxonomy
//!
//! # Examples
//!
//! ```
//! use script_types::{ErrorKind, ScriptError, Value};
//!
//! let num = Value::Smi(42);
//! assert!(num.is_truthy());
//! assert_eq!(num.type_of(), "number");
//!
//! let error = ScriptError::new(ErrorKind::TypeError, "not callable");
//! assert_eq!(error.to_string(), "TypeError: not callable");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod function;
mod object;
mod promise_state;
mod value;

pub use error::{ErrorKind, ScriptError, ScriptResult};
pub use function::Function;
pub use object::{ObjectData, ObjectRef, Property};
pub use promise_state::{FinallyReaction, PromiseCell, PromiseRef, PromiseStatus, SettledReaction};
pub use value::Value;

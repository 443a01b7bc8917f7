//! Dynamic script value representation.
//!
//! This module provides the core `Value` enum that represents every value
//! the promise resolution procedure can be asked to resolve with: inline
//! primitives, heap-shared objects and callables, promises, and errors.

use crate::{Function, ObjectRef, PromiseRef, ScriptError};
use num_bigint::BigInt;
use num_traits::Zero;
use std::fmt;
use std::rc::Rc;

/// Represents any dynamic script value.
///
/// Primitive values are stored inline; objects, functions and promises are
/// shared by reference and compare by identity. The resolution procedure is
/// polymorphic over this type: any [`Value::Object`] or [`Value::Function`]
/// is a thenable candidate, any [`Value::Promise`] is adopted directly, and
/// everything else fulfills as-is.
///
/// # Examples
///
/// ```
/// use script_types::Value;
///
/// let undefined = Value::Undefined;
/// let number = Value::Smi(42);
/// let float = Value::Double(3.14);
///
/// assert!(!undefined.is_truthy());
/// assert!(number.is_truthy());
/// assert_eq!(number.type_of(), "number");
/// assert_eq!(float.type_of(), "number");
/// ```
#[derive(Clone)]
pub enum Value {
    /// The undefined value
    Undefined,
    /// The null value
    Null,
    /// Boolean (true or false)
    Boolean(bool),
    /// Small integer (fits in 32 bits)
    Smi(i32),
    /// IEEE 754 double-precision floating point
    Double(f64),
    /// String value
    String(String),
    /// Arbitrary precision integer
    BigInt(BigInt),
    /// Plain data object, shared by reference
    Object(ObjectRef),
    /// Callable value
    Function(Function),
    /// Promise, shared settlement state
    Promise(PromiseRef),
    /// Error value (e.g. a rejection reason produced by the runtime)
    Error(Rc<ScriptError>),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Smi(n) => f.debug_tuple("Smi").field(n).finish(),
            Value::Double(n) => f.debug_tuple("Double").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::BigInt(n) => f.debug_tuple("BigInt").field(n).finish(),
            Value::Object(_) => write!(f, "Object(...)"),
            Value::Function(_) => write!(f, "Function(...)"),
            Value::Promise(cell) => f.debug_tuple("Promise").field(&cell.borrow().status).finish(),
            Value::Error(e) => f.debug_tuple("Error").field(e).finish(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Smi(a), Value::Smi(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Promise(a), Value::Promise(b)) => Rc::ptr_eq(a, b),
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl From<ScriptError> for Value {
    fn from(err: ScriptError) -> Self {
        Value::Error(Rc::new(err))
    }
}

impl Value {
    /// Returns whether this value is truthy.
    ///
    /// Falsy values: undefined, null, false, 0 (including -0 and 0n), NaN,
    /// and the empty string. All other values are truthy, including all
    /// objects, functions and promises.
    ///
    /// # Examples
    ///
    /// ```
    /// use script_types::Value;
    ///
    /// assert!(!Value::Undefined.is_truthy());
    /// assert!(!Value::Smi(0).is_truthy());
    /// assert!(!Value::Double(f64::NAN).is_truthy());
    ///
    /// assert!(Value::Boolean(true).is_truthy());
    /// assert!(Value::String("x".to_string()).is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined => false,
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Smi(n) => *n != 0,
            Value::Double(n) => !n.is_nan() && *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::BigInt(n) => !n.is_zero(),
            Value::Object(_) => true,
            Value::Function(_) => true,
            Value::Promise(_) => true,
            Value::Error(_) => true,
        }
    }

    /// Returns the `typeof`-style tag for this value.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Boolean(_) => "boolean",
            Value::Smi(_) | Value::Double(_) => "number",
            Value::String(_) => "string",
            Value::BigInt(_) => "bigint",
            Value::Object(_) | Value::Promise(_) | Value::Error(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// Returns true if this value is a plain data object.
    ///
    /// This is the predicate the resolution procedure uses to decide whether
    /// a value should be probed for a `then` capability. Promises and error
    /// values are not plain data objects.
    pub fn is_plain_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns true if this value can be called.
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Returns the callable handle if this value is a function.
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Returns the string contents if this value is a string.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

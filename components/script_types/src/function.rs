//! Cloneable callable handles.

use crate::{ScriptError, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// A callable script value.
///
/// This represents a host-supplied function that can be stored in a
/// [`Value`], passed as a promise handler, or probed as a thenable's `then`
/// capability. Handles are cheaply cloneable and share the underlying
/// closure; the model is single-threaded, so no `Send` bound is required.
///
/// # Examples
///
/// ```
/// use script_types::{Function, Value};
///
/// let double = Function::new(|args| {
///     match args.first() {
///         Some(Value::Smi(n)) => Ok(Value::Smi(n * 2)),
///         _ => Ok(Value::Undefined),
///     }
/// });
///
/// assert_eq!(double.call(vec![Value::Smi(21)]).unwrap(), Value::Smi(42));
/// ```
#[derive(Clone)]
pub struct Function {
    callback: Rc<RefCell<dyn FnMut(Vec<Value>) -> Result<Value, ScriptError>>>,
}

impl Function {
    /// Creates a new Function from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(Vec<Value>) -> Result<Value, ScriptError> + 'static,
    {
        Self {
            callback: Rc::new(RefCell::new(f)),
        }
    }

    /// Calls the function with the given arguments.
    ///
    /// An `Err` return models a thrown script exception.
    pub fn call(&self, args: Vec<Value>) -> Result<Value, ScriptError> {
        (self.callback.borrow_mut())(args)
    }

    /// Returns true if both handles share the same underlying closure.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Function {{ ... }}")
    }
}

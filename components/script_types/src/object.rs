//! Plain data objects with data and accessor properties.

use crate::{Function, ScriptError, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A shared handle to a plain data object.
pub type ObjectRef = Rc<RefCell<ObjectData>>;

/// An own property of a plain data object.
///
/// A property is either a plain data slot or an accessor whose getter runs
/// on every read. Accessor reads can fail, which is how a property read
/// "throws" in this model.
#[derive(Debug, Clone)]
pub enum Property {
    /// A plain stored value
    Data(Value),
    /// A getter invoked on read
    Accessor(Function),
}

/// A plain data object: a mutable map of named own properties.
///
/// This is the value shape the resolution procedure probes for a `then`
/// capability. There is no prototype chain; only own properties exist.
///
/// # Examples
///
/// ```
/// use script_types::{ObjectData, Value};
///
/// let obj = ObjectData::new();
/// obj.borrow_mut().define("answer", Value::Smi(42));
/// let read = obj.borrow().get("answer").unwrap();
/// assert_eq!(read, Some(Value::Smi(42)));
/// ```
#[derive(Debug, Default)]
pub struct ObjectData {
    properties: HashMap<String, Property>,
}

impl ObjectData {
    /// Creates a new empty object behind a shared handle.
    pub fn new() -> ObjectRef {
        Rc::new(RefCell::new(ObjectData {
            properties: HashMap::new(),
        }))
    }

    /// Defines (or replaces) a data property.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.properties.insert(name.into(), Property::Data(value));
    }

    /// Defines (or replaces) an accessor property.
    ///
    /// The getter runs on every read of the property and may fail.
    pub fn define_accessor(&mut self, name: impl Into<String>, getter: Function) {
        self.properties
            .insert(name.into(), Property::Accessor(getter));
    }

    /// Reads an own property.
    ///
    /// Returns `Ok(None)` if the property does not exist. An accessor
    /// property's getter is invoked with no arguments; its error return
    /// propagates as the read's failure.
    pub fn get(&self, name: &str) -> Result<Option<Value>, ScriptError> {
        match self.properties.get(name) {
            None => Ok(None),
            Some(Property::Data(value)) => Ok(Some(value.clone())),
            Some(Property::Accessor(getter)) => getter.call(vec![]).map(Some),
        }
    }

    /// Returns a copy of the property slot itself, without running accessors.
    ///
    /// Lets a caller release its borrow of the object before invoking an
    /// accessor's getter.
    pub fn property(&self, name: &str) -> Option<Property> {
        self.properties.get(name).cloned()
    }

    /// Returns true if the object has an own property with this name.
    pub fn has(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Returns the number of own properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true if the object has no own properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

//! Promise/A+ settlement core.
//!
//! This crate provides a deferred-value primitive with the Promise/A+
//! resolution model:
//! - [`Promise`] - the primitive, with `then` / `catch_` / `finally` chaining
//! - [`Resolver`] / [`Rejector`] - the capability handles an executor receives
//! - [`Scheduler`] - the deferral service delivering continuations after the
//!   current synchronous context unwinds
//!
//! # Overview
//!
//! Construction synchronously invokes a caller-supplied executor with the
//! two capability handles. Settlement is write-once: the first accepted
//! resolution or rejection wins. Resolving with another promise or with a
//! thenable (any object exposing a callable `then` property) adopts that
//! value's eventual outcome, flattening arbitrary nesting. Continuations are
//! always delivered through the scheduler, in registration order, never
//! inline.
//!
//! # Examples
//!
//! ```
//! use promise_runtime::{Promise, Scheduler};
//! use script_types::{Function, Value};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let scheduler = Scheduler::new();
//! let seen = Rc::new(RefCell::new(None));
//!
//! let probe = seen.clone();
//! Promise::new(&scheduler, |resolver, _| {
//!     resolver.resolve(Value::Smi(41));
//!     Ok(())
//! })
//! .then(
//!     Some(Function::new(|args| match args.first() {
//!         Some(Value::Smi(n)) => Ok(Value::Smi(n + 1)),
//!         _ => Ok(Value::Undefined),
//!     })),
//!     None,
//! )
//! .then(
//!     Some(Function::new(move |args| {
//!         *probe.borrow_mut() = args.into_iter().next();
//!         Ok(Value::Undefined)
//!     })),
//!     None,
//! );
//!
//! scheduler.run_until_done();
//! assert_eq!(*seen.borrow(), Some(Value::Smi(42)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod promise;
pub mod scheduler;
pub mod task_queue;

// Re-export main types at crate root
pub use promise::{Promise, Rejector, Resolver};
pub use scheduler::Scheduler;
pub use task_queue::{Task, TaskQueue};

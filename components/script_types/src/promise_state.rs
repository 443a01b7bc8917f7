//! Promise settlement state record.
//!
//! The state record lives next to [`Value`](crate::Value) because promises
//! are themselves values: the resolution procedure must be able to find a
//! promise's settlement state inside any value it is asked to resolve with.
//! The resolution algorithm itself lives in the `promise_runtime` component.

use crate::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// The settlement state of a promise.
///
/// Promises transition through states according to the Promise/A+
/// specification. Once settled (Fulfilled or Rejected), a promise cannot
/// change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseStatus {
    /// The initial state; the promise is neither fulfilled nor rejected.
    Pending,
    /// The promise has been fulfilled with a value.
    Fulfilled,
    /// The promise has been rejected with a reason.
    Rejected,
}

/// A buffered continuation waiting on fulfillment or rejection.
///
/// Invoked at most once, with the terminal value or reason.
pub type SettledReaction = Box<dyn FnOnce(Value)>;

/// A buffered continuation waiting on settlement of either kind.
pub type FinallyReaction = Box<dyn FnOnce()>;

/// A shared handle to a promise's settlement state.
pub type PromiseRef = Rc<RefCell<PromiseCell>>;

/// The settlement state of a single promise.
///
/// Each promise exclusively owns one cell. The cell holds the status, the
/// write-once terminal result, the resolution guard latch, and the three
/// append-only listener ledgers that are drained exactly once at dispatch
/// time.
pub struct PromiseCell {
    /// Current settlement state. Monotonic: never leaves a terminal state.
    pub status: PromiseStatus,
    /// Fulfillment value or rejection reason; unset while pending,
    /// write-once after.
    pub result: Option<Value>,
    /// Guard latch: true the instant a resolution or rejection has been
    /// accepted, before the status is updated. First caller wins.
    pub resolve_called: bool,
    /// Continuations to run on fulfillment, in registration order.
    pub on_fulfilled: Vec<SettledReaction>,
    /// Continuations to run on rejection, in registration order.
    pub on_rejected: Vec<SettledReaction>,
    /// Continuations to run after either outcome has been dispatched.
    pub on_finally: Vec<FinallyReaction>,
    /// True once any rejection-path listener has ever been registered.
    /// Consulted by the unhandled-rejection diagnostic.
    pub has_rejection_listeners: bool,
    /// True once any finally listener has ever been registered.
    pub has_finally_listeners: bool,
}

impl PromiseCell {
    /// Creates a new pending cell behind a shared handle.
    pub fn new_pending() -> PromiseRef {
        Rc::new(RefCell::new(PromiseCell {
            status: PromiseStatus::Pending,
            result: None,
            resolve_called: false,
            on_fulfilled: Vec::new(),
            on_rejected: Vec::new(),
            on_finally: Vec::new(),
            has_rejection_listeners: false,
            has_finally_listeners: false,
        }))
    }

    /// Returns true if the promise has not settled yet.
    pub fn is_pending(&self) -> bool {
        matches!(self.status, PromiseStatus::Pending)
    }
}

impl fmt::Debug for PromiseCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromiseCell")
            .field("status", &self.status)
            .field("result", &self.result)
            .field("resolve_called", &self.resolve_called)
            .field("on_fulfilled", &self.on_fulfilled.len())
            .field("on_rejected", &self.on_rejected.len())
            .field("on_finally", &self.on_finally.len())
            .finish()
    }
}

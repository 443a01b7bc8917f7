//! Promise implementation following the Promise/A+ specification.
//!
//! This module provides the settlement state machine, the resolution
//! procedure (including adoption of nested promises and foreign thenables),
//! and the chaining surface (`then` / `catch_` / `finally`).
//!
//! All continuation delivery is deferred through the [`Scheduler`]: a
//! promise never invokes a handler inline, even when it is already settled
//! at registration time.

use crate::scheduler::Scheduler;
use crate::task_queue::Task;
use script_types::{
    Function, PromiseCell, PromiseRef, PromiseStatus, Property, ScriptError, SettledReaction, Value,
};
use std::cell::Cell;
use std::rc::Rc;

/// A promise: the eventual outcome of an asynchronous operation.
///
/// A promise is a cheap handle over shared settlement state plus the
/// scheduler it delivers continuations through. Construction runs the
/// executor synchronously with two capability handles; settlement happens at
/// most once, and every synchronous failure mode is converted into a
/// rejection rather than an escaping error.
///
/// # Examples
///
/// ```
/// use promise_runtime::{Promise, Scheduler};
/// use script_types::{PromiseStatus, Value};
///
/// let scheduler = Scheduler::new();
/// let promise = Promise::new(&scheduler, |resolver, _rejector| {
///     resolver.resolve(Value::Smi(42));
///     Ok(())
/// });
///
/// assert_eq!(promise.status(), PromiseStatus::Fulfilled);
/// assert_eq!(promise.result(), Some(Value::Smi(42)));
/// ```
#[derive(Clone)]
pub struct Promise {
    cell: PromiseRef,
    scheduler: Scheduler,
}

/// The fulfillment capability handed to an executor.
///
/// Cloneable; only the first accepted resolution or rejection on the
/// underlying promise has any effect.
#[derive(Clone)]
pub struct Resolver {
    cell: PromiseRef,
    scheduler: Scheduler,
}

impl Resolver {
    /// Offers `value` to the promise's resolution procedure.
    ///
    /// Ignored if a resolution or rejection has already been accepted.
    pub fn resolve(&self, value: Value) {
        resolve_value(&self.cell, &self.scheduler, value);
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Resolver {{ ... }}")
    }
}

/// The rejection capability handed to an executor.
#[derive(Clone)]
pub struct Rejector {
    cell: PromiseRef,
    scheduler: Scheduler,
}

impl Rejector {
    /// Rejects the promise with `reason`.
    ///
    /// Ignored if a resolution or rejection has already been accepted.
    pub fn reject(&self, reason: Value) {
        reject_value(&self.cell, &self.scheduler, reason);
    }
}

impl std::fmt::Debug for Rejector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rejector {{ ... }}")
    }
}

impl Promise {
    /// Creates a new promise and synchronously runs `executor` with the
    /// resolve and reject capabilities.
    ///
    /// An `Err` returned by the executor rejects the promise, unless a
    /// resolution or rejection was already accepted while it ran.
    pub fn new<E>(scheduler: &Scheduler, executor: E) -> Promise
    where
        E: FnOnce(Resolver, Rejector) -> Result<(), ScriptError>,
    {
        let promise = Promise::pending(scheduler);
        let resolver = Resolver {
            cell: promise.cell.clone(),
            scheduler: scheduler.clone(),
        };
        let rejector = Rejector {
            cell: promise.cell.clone(),
            scheduler: scheduler.clone(),
        };
        if let Err(err) = executor(resolver, rejector) {
            reject_value(&promise.cell, scheduler, err.into());
        }
        promise
    }

    fn pending(scheduler: &Scheduler) -> Promise {
        Promise {
            cell: PromiseCell::new_pending(),
            scheduler: scheduler.clone(),
        }
    }

    /// Returns the current settlement state.
    pub fn status(&self) -> PromiseStatus {
        self.cell.borrow().status
    }

    /// Returns the fulfillment value or rejection reason, if settled.
    pub fn result(&self) -> Option<Value> {
        self.cell.borrow().result.clone()
    }

    /// Wraps this promise as a [`Value`], sharing the settlement state.
    pub fn to_value(&self) -> Value {
        Value::Promise(self.cell.clone())
    }

    /// Registers fulfillment and rejection handlers; returns the derived
    /// promise.
    ///
    /// A missing handler forwards the parent's settlement unchanged. A
    /// handler's return value is fed through the derived promise's
    /// resolution procedure; a handler's error rejects the derived promise.
    /// Handlers registered before settlement are delivered in registration
    /// order; handlers registered after settlement are still delivered
    /// through the scheduler, never inline.
    pub fn then(&self, on_fulfilled: Option<Function>, on_rejected: Option<Function>) -> Promise {
        let derived = Promise::pending(&self.scheduler);

        let fulfilled_wrapper: SettledReaction = {
            let target = derived.cell.clone();
            let scheduler = self.scheduler.clone();
            Box::new(move |value| match &on_fulfilled {
                Some(handler) => match handler.call(vec![value]) {
                    Ok(next) => resolve_value(&target, &scheduler, next),
                    Err(err) => reject_value(&target, &scheduler, err.into()),
                },
                None => resolve_value(&target, &scheduler, value),
            })
        };
        let rejected_wrapper: SettledReaction = {
            let target = derived.cell.clone();
            let scheduler = self.scheduler.clone();
            Box::new(move |reason| match &on_rejected {
                Some(handler) => match handler.call(vec![reason]) {
                    Ok(next) => resolve_value(&target, &scheduler, next),
                    Err(err) => reject_value(&target, &scheduler, err.into()),
                },
                None => reject_value(&target, &scheduler, reason),
            })
        };

        let mut state = self.cell.borrow_mut();
        state.has_rejection_listeners = true;
        match state.status {
            PromiseStatus::Pending => {
                state.on_fulfilled.push(fulfilled_wrapper);
                state.on_rejected.push(rejected_wrapper);
            }
            PromiseStatus::Fulfilled => {
                let value = settled_result(&state);
                drop(state);
                self.scheduler
                    .schedule(Task::new(move || fulfilled_wrapper(value)));
            }
            PromiseStatus::Rejected => {
                let reason = settled_result(&state);
                drop(state);
                self.scheduler
                    .schedule(Task::new(move || rejected_wrapper(reason)));
            }
        }

        derived
    }

    /// Registers a rejection handler. Sugar for `then(None, on_rejected)`.
    pub fn catch_(&self, on_rejected: Option<Function>) -> Promise {
        self.then(None, on_rejected)
    }

    /// Registers a callback that runs once the promise settles, without
    /// observing the value or reason.
    ///
    /// The derived promise mirrors this promise's outcome unchanged, unless
    /// the callback fails or returns a rejecting value, in which case that
    /// failure propagates instead.
    pub fn finally(&self, on_finally: Option<Function>) -> Promise {
        let derived = Promise::pending(&self.scheduler);

        let reaction = {
            let source = self.cell.clone();
            let target = derived.cell.clone();
            let scheduler = self.scheduler.clone();
            move || run_finally(&source, &target, &scheduler, on_finally)
        };

        let mut state = self.cell.borrow_mut();
        state.has_finally_listeners = true;
        if state.is_pending() {
            state.on_finally.push(Box::new(reaction));
        } else {
            drop(state);
            self.scheduler.schedule(Task::new(reaction));
        }

        derived
    }
}

impl std::fmt::Debug for Promise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Promise")
            .field("status", &self.status())
            .finish()
    }
}

/// Clones the terminal result out of a settled cell.
fn settled_result(state: &PromiseCell) -> Value {
    state.result.clone().unwrap_or(Value::Undefined)
}

/// Latch-guarded entry point of the resolution procedure.
///
/// The first accepted resolution or rejection wins; all later offers are
/// silently ignored. The latch is set strictly before any result becomes
/// observable.
fn resolve_value(cell: &PromiseRef, scheduler: &Scheduler, value: Value) {
    {
        let mut state = cell.borrow_mut();
        if state.resolve_called {
            return;
        }
        state.resolve_called = true;
    }
    apply_resolution(cell, scheduler, value);
}

/// Latch-guarded rejection path. No adoption: any reason is final.
fn reject_value(cell: &PromiseRef, scheduler: &Scheduler, reason: Value) {
    {
        let mut state = cell.borrow_mut();
        if state.resolve_called {
            return;
        }
        state.resolve_called = true;
    }
    settle_rejected(cell, scheduler, reason);
}

/// The body of the resolution procedure, past the acceptance latch.
///
/// Adoption continuations re-enter here directly: the latch guards
/// acceptance of a resolution, not completion of one already accepted.
fn apply_resolution(cell: &PromiseRef, scheduler: &Scheduler, value: Value) {
    if let Value::Promise(other) = &value {
        if Rc::ptr_eq(other, cell) {
            let err = ScriptError::type_error("promise cannot be resolved with itself");
            settle_rejected(cell, scheduler, err.into());
        } else {
            adopt_promise(cell, scheduler, other);
        }
        return;
    }

    if value.is_plain_object() || value.is_callable() {
        resolve_thenable(cell, scheduler, value);
        return;
    }

    settle_fulfilled(cell, scheduler, value);
}

/// Adopts another promise's settlement as this promise's own.
///
/// If the other promise is already settled its terminal result propagates
/// immediately; otherwise continuations are attached so this promise mirrors
/// whatever the other eventually does.
fn adopt_promise(cell: &PromiseRef, scheduler: &Scheduler, other: &PromiseRef) {
    let snapshot = {
        let state = other.borrow();
        match state.status {
            PromiseStatus::Pending => None,
            PromiseStatus::Fulfilled => Some((PromiseStatus::Fulfilled, settled_result(&state))),
            PromiseStatus::Rejected => Some((PromiseStatus::Rejected, settled_result(&state))),
        }
    };

    match snapshot {
        Some((PromiseStatus::Fulfilled, value)) => settle_fulfilled(cell, scheduler, value),
        Some((_, reason)) => {
            // The adopting promise takes responsibility for the rejection.
            other.borrow_mut().has_rejection_listeners = true;
            settle_rejected(cell, scheduler, reason);
        }
        None => {
            let mut state = other.borrow_mut();
            let (target, sched) = (cell.clone(), scheduler.clone());
            state
                .on_fulfilled
                .push(Box::new(move |value| apply_resolution(&target, &sched, value)));
            let (target, sched) = (cell.clone(), scheduler.clone());
            state
                .on_rejected
                .push(Box::new(move |reason| settle_rejected(&target, &sched, reason)));
            // The adopting promise takes responsibility for the rejection.
            state.has_rejection_listeners = true;
        }
    }
}

/// Reads the `then` capability off a thenable candidate.
///
/// `Ok(None)` means the value has no callable `then` and should fulfill
/// as-is. An accessor failure during the read propagates as `Err`.
fn read_then_capability(value: &Value) -> Result<Option<Function>, ScriptError> {
    let slot = match value {
        Value::Object(obj) => obj.borrow().property("then"),
        // Native callables carry no properties in this value model.
        _ => None,
    };
    // The object borrow is released before a getter runs; the getter may
    // mutate the thenable itself.
    let read = match slot {
        None => None,
        Some(Property::Data(value)) => Some(value),
        Some(Property::Accessor(getter)) => Some(getter.call(vec![])?),
    };
    Ok(match read {
        Some(Value::Function(then)) => Some(then),
        _ => None,
    })
}

/// Resolves with a thenable candidate: probes for a callable `then` and, if
/// found, invokes it with two fresh once-guarded continuation handles.
fn resolve_thenable(cell: &PromiseRef, scheduler: &Scheduler, value: Value) {
    let then = match read_then_capability(&value) {
        Ok(then) => then,
        Err(err) => {
            settle_rejected(cell, scheduler, err.into());
            return;
        }
    };
    let Some(then) = then else {
        settle_fulfilled(cell, scheduler, value);
        return;
    };

    // Both handles share one first-wins guard; a failure thrown by `then`
    // after either handle fired is ignored.
    let fired = Rc::new(Cell::new(false));
    let on_resolve = {
        let fired = fired.clone();
        let (target, sched) = (cell.clone(), scheduler.clone());
        Function::new(move |args: Vec<Value>| {
            if !fired.replace(true) {
                let value = args.into_iter().next().unwrap_or(Value::Undefined);
                apply_resolution(&target, &sched, value);
            }
            Ok(Value::Undefined)
        })
    };
    let on_reject = {
        let fired = fired.clone();
        let (target, sched) = (cell.clone(), scheduler.clone());
        Function::new(move |args: Vec<Value>| {
            if !fired.replace(true) {
                let reason = args.into_iter().next().unwrap_or(Value::Undefined);
                settle_rejected(&target, &sched, reason);
            }
            Ok(Value::Undefined)
        })
    };

    let outcome = then.call(vec![Value::Function(on_resolve), Value::Function(on_reject)]);
    if let Err(err) = outcome {
        if !fired.get() {
            settle_rejected(cell, scheduler, err.into());
        }
    }
}

/// Transitions a pending cell to Fulfilled and schedules dispatch.
///
/// The fulfillment ledger captured at this instant is delivered as one
/// deferred task, in registration order, followed by the finally ledger. The
/// rejection ledger is discarded: exactly one sequence ever fires.
fn settle_fulfilled(cell: &PromiseRef, scheduler: &Scheduler, value: Value) {
    let (callbacks, finals) = {
        let mut state = cell.borrow_mut();
        if !state.is_pending() {
            return;
        }
        state.status = PromiseStatus::Fulfilled;
        state.result = Some(value.clone());
        state.on_rejected.clear();
        (
            std::mem::take(&mut state.on_fulfilled),
            std::mem::take(&mut state.on_finally),
        )
    };
    scheduler.schedule(Task::new(move || {
        for callback in callbacks {
            callback(value.clone());
        }
        for callback in finals {
            callback();
        }
    }));
}

/// Transitions a pending cell to Rejected and schedules dispatch.
///
/// If no rejection or finally listener has been registered by the time the
/// dispatch task runs, the reason is reported as an unhandled rejection.
fn settle_rejected(cell: &PromiseRef, scheduler: &Scheduler, reason: Value) {
    let (callbacks, finals) = {
        let mut state = cell.borrow_mut();
        if !state.is_pending() {
            return;
        }
        state.status = PromiseStatus::Rejected;
        state.result = Some(reason.clone());
        state.on_fulfilled.clear();
        (
            std::mem::take(&mut state.on_rejected),
            std::mem::take(&mut state.on_finally),
        )
    };
    let cell = cell.clone();
    let sched = scheduler.clone();
    scheduler.schedule(Task::new(move || {
        let handled = {
            let state = cell.borrow();
            state.has_rejection_listeners || state.has_finally_listeners
        };
        if !handled {
            sched.report_unhandled_rejection(reason.clone());
        }
        for callback in callbacks {
            callback(reason.clone());
        }
        for callback in finals {
            callback();
        }
    }));
}

/// Settles `target` with `source`'s terminal outcome.
fn mirror_outcome(source: &PromiseRef, target: &PromiseRef, scheduler: &Scheduler) {
    let (status, result) = {
        let state = source.borrow();
        (state.status, settled_result(&state))
    };
    match status {
        PromiseStatus::Fulfilled => settle_fulfilled(target, scheduler, result),
        PromiseStatus::Rejected => settle_rejected(target, scheduler, result),
        // Finally reactions only run after settlement.
        PromiseStatus::Pending => {}
    }
}

/// Runs a finally callback once `source` has settled.
///
/// The callback's return value is resolved first: if it rejects, that reason
/// wins; otherwise `target` mirrors `source`'s outcome unchanged.
fn run_finally(
    source: &PromiseRef,
    target: &PromiseRef,
    scheduler: &Scheduler,
    on_finally: Option<Function>,
) {
    let Some(callback) = on_finally else {
        mirror_outcome(source, target, scheduler);
        return;
    };

    let next = match callback.call(vec![]) {
        Ok(next) => next,
        Err(err) => {
            settle_rejected(target, scheduler, err.into());
            return;
        }
    };

    let continuation = PromiseCell::new_pending();
    // Never exposed; its rejection always reaches `target`.
    continuation.borrow_mut().has_rejection_listeners = true;
    resolve_value(&continuation, scheduler, next);

    let pending = continuation.borrow().is_pending();
    if pending {
        let mut state = continuation.borrow_mut();
        let (src, tgt, sched) = (source.clone(), target.clone(), scheduler.clone());
        state
            .on_fulfilled
            .push(Box::new(move |_| mirror_outcome(&src, &tgt, &sched)));
        let (tgt, sched) = (target.clone(), scheduler.clone());
        state
            .on_rejected
            .push(Box::new(move |reason| settle_rejected(&tgt, &sched, reason)));
    } else {
        let (status, result) = {
            let state = continuation.borrow();
            (state.status, settled_result(&state))
        };
        match status {
            PromiseStatus::Rejected => settle_rejected(target, scheduler, result),
            _ => mirror_outcome(source, target, scheduler),
        }
    }
}

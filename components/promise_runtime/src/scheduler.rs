//! The deferral service.
//!
//! This module provides the scheduler that delays promise dispatch until the
//! current synchronous execution context has unwound. Callbacks scheduled
//! through the same handle run in FIFO order, one at a time.

use crate::task_queue::{Task, TaskQueue};
use script_types::Value;
use std::cell::RefCell;
use std::rc::Rc;

struct SchedulerInner {
    queue: TaskQueue,
    unhandled_rejections: Vec<Value>,
}

/// A cheaply-cloneable handle to the deferral service.
///
/// Every promise holds a clone of the handle it was created with; settlement
/// never invokes continuations inline, it hands them to the scheduler. The
/// host drives delivery by calling [`run_until_done`](Scheduler::run_until_done)
/// (or [`run_one`](Scheduler::run_one)) after its own synchronous work.
///
/// The scheduler also collects the unhandled-rejection diagnostic: reasons
/// of rejected promises that had no rejection or finally listener when their
/// dispatch ran.
///
/// # Examples
///
/// ```
/// use promise_runtime::{Scheduler, Task};
///
/// let scheduler = Scheduler::new();
/// scheduler.schedule(Task::new(|| println!("deferred")));
/// assert_eq!(scheduler.pending_tasks(), 1);
/// scheduler.run_until_done();
/// assert!(scheduler.is_empty());
/// ```
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl Scheduler {
    /// Creates a new scheduler with an empty queue.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                queue: TaskQueue::new(),
                unhandled_rejections: Vec::new(),
            })),
        }
    }

    /// Adds a task to the end of the queue.
    ///
    /// The task runs after every task scheduled before it, once the host
    /// drives the queue.
    pub fn schedule(&self, task: Task) {
        self.inner.borrow_mut().queue.enqueue(task);
    }

    /// Runs the next task, if any. Returns true if a task ran.
    ///
    /// The task is dequeued before it runs, so tasks may schedule further
    /// tasks without holding up the queue.
    pub fn run_one(&self) -> bool {
        let task = self.inner.borrow_mut().queue.dequeue();
        match task {
            Some(task) => {
                task.run();
                true
            }
            None => false,
        }
    }

    /// Runs tasks until the queue is empty.
    ///
    /// Tasks scheduled by running tasks are processed in the same call.
    pub fn run_until_done(&self) {
        while self.run_one() {}
    }

    /// Returns true if no tasks are queued.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().queue.is_empty()
    }

    /// Returns the number of queued tasks.
    pub fn pending_tasks(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Records a rejection that settled with no listener to observe it.
    ///
    /// Surfaced as a `tracing` warning and retained for inspection through
    /// [`take_unhandled_rejections`](Scheduler::take_unhandled_rejections).
    pub fn report_unhandled_rejection(&self, reason: Value) {
        tracing::warn!(reason = ?reason, "unhandled promise rejection");
        self.inner.borrow_mut().unhandled_rejections.push(reason);
    }

    /// Drains and returns the recorded unhandled rejections.
    pub fn take_unhandled_rejections(&self) -> Vec<Value> {
        std::mem::take(&mut self.inner.borrow_mut().unhandled_rejections)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("pending_tasks", &inner.queue.len())
            .field("unhandled_rejections", &inner.unhandled_rejections.len())
            .finish()
    }
}

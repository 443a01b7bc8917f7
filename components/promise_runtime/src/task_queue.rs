//! Deferred task queue.
//!
//! This module provides the FIFO queue backing the deferral service. A task
//! is a unit of deferred work; the scheduler runs tasks one at a time, in
//! the order they were scheduled.

use std::collections::VecDeque;

/// A deferred unit of work.
///
/// Tasks carry promise dispatch work: delivery of fulfillment, rejection and
/// finally continuations after the scheduling context has unwound. Task
/// closures are infallible; every failure mode has already been converted
/// into a rejection by the time a task is built.
pub struct Task {
    callback: Box<dyn FnOnce()>,
}

impl Task {
    /// Creates a new Task from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the task, consuming it.
    pub fn run(self) {
        (self.callback)()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task {{ ... }}")
    }
}

/// A FIFO queue of deferred tasks.
#[derive(Debug, Default)]
pub struct TaskQueue {
    queue: VecDeque<Task>,
}

impl TaskQueue {
    /// Creates a new empty TaskQueue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Adds a task to the end of the queue.
    pub fn enqueue(&mut self, task: Task) {
        self.queue.push_back(task);
    }

    /// Removes and returns the next task from the queue.
    pub fn dequeue(&mut self) -> Option<Task> {
        self.queue.pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of tasks in the queue.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

//! Single-writer task queue primitives.
//!
//! A [`SerialQueue`] gives exclusive ownership of some state to one worker
//! task. Callers submit closures and suspend until the worker has run them;
//! at most one closure runs at a time, in admission order.

mod panic;
mod queue;
mod spawn;

pub use queue::{DEFAULT_QUEUE_CAPACITY, QueueError, QueueSpec, SerialQueue};

//! # Serialized Execution Context
//!
//! The router does no locking of its own. All of its state lives on one
//! logical context supplied by the owner, and every piece of deferred work
//! (drain passes, timeouts) is submitted back onto that context as a
//! [`Job`].
//!
//! # Contract
//!
//! An implementation must:
//!
//! - run jobs one at a time, never two concurrently;
//! - run jobs submitted through [`SerialContext::execute`] in submission order;
//! - never run a job inside the `execute` call that submitted it.
//!
//! The last point matters: `dispatch` must return before matching happens,
//! and an action that attaches another action must not recurse into a drain.

use std::time::Duration;

/// A unit of deferred work.
///
/// Jobs are not `Send`. They capture router state that is confined to the
/// context's thread.
pub type Job = Box<dyn FnOnce() + 'static>;

/// The owner-supplied, serialized place where routing work runs.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a serialized execution context",
    label = "missing `SerialContext` implementation",
    note = "Implement `execute` and `execute_after` so jobs run one at a time, in order."
)]
pub trait SerialContext: 'static {
    /// Run `job` later on this context.
    fn execute(&self, job: Job);

    /// Run `job` on this context once `delay` has elapsed.
    fn execute_after(&self, delay: Duration, job: Job);
}

impl<C: SerialContext + ?Sized> SerialContext for std::rc::Rc<C> {
    fn execute(&self, job: Job) {
        (**self).execute(job)
    }

    fn execute_after(&self, delay: Duration, job: Job) {
        (**self).execute_after(delay, job)
    }
}

//! Tokio-backed serialized context.
//!
//! **Note**: This module requires the `tokio` feature. Any other runtime
//! can be used by implementing [`SerialContext`] for it.

use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::LocalSet;
use waypost_core::{Job, SerialContext};

/// A [`SerialContext`] that runs jobs as tasks on a shared tokio `LocalSet`.
///
/// All jobs run on the thread that drives the set, one at a time. Jobs are
/// synchronous, so a job never interleaves with another. Delayed jobs sleep
/// with `tokio::time::sleep` first.
///
/// Nothing runs until the owner drives the set with
/// [`run_until`](Self::run_until).
///
/// # Example
///
/// ```rust,ignore
/// let context = LocalContext::new();
/// let router = Router::<Screen>::new(context.clone());
///
/// context
///     .run_until(async {
///         router.dispatch(url, Some(Duration::from_secs(2)));
///         tokio::time::sleep(Duration::from_millis(10)).await;
///     })
///     .await;
/// ```
///
/// # Runtime Requirements
///
/// Delayed jobs need a tokio runtime with the time driver enabled.
#[derive(Clone, Default)]
pub struct LocalContext {
    set: Rc<LocalSet>,
}

impl LocalContext {
    /// Create a context with its own `LocalSet`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive queued jobs until `future` completes.
    pub async fn run_until<F: Future>(&self, future: F) -> F::Output {
        self.set.run_until(future).await
    }
}

impl SerialContext for LocalContext {
    fn execute(&self, job: Job) {
        let _ = self.set.spawn_local(async move { job() });
    }

    fn execute_after(&self, delay: Duration, job: Job) {
        let _ = self.set.spawn_local(async move {
            tokio::time::sleep(delay).await;
            job()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[tokio::test]
    async fn test_jobs_run_in_submission_order() {
        let context = LocalContext::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for i in 0..3 {
            let log = log.clone();
            context.execute(Box::new(move || log.borrow_mut().push(i)));
        }
        assert!(log.borrow().is_empty());

        context
            .run_until(tokio::time::sleep(Duration::from_millis(5)))
            .await;
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_delayed_job_waits() {
        let context = LocalContext::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let late = log.clone();
        context.execute_after(
            Duration::from_millis(30),
            Box::new(move || late.borrow_mut().push("late")),
        );
        let soon = log.clone();
        context.execute(Box::new(move || soon.borrow_mut().push("soon")));

        context
            .run_until(tokio::time::sleep(Duration::from_millis(5)))
            .await;
        assert_eq!(*log.borrow(), vec!["soon"]);

        context
            .run_until(tokio::time::sleep(Duration::from_millis(60)))
            .await;
        assert_eq!(*log.borrow(), vec!["soon", "late"]);
    }
}

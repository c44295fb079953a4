//! Testing utilities for Waypost.
//!
//! This module provides utilities to make testing routers, actions and
//! delegates deterministic.
//!
//! # Features
//!
//! - [`ManualContext`]: A serialized context driven by hand, with a virtual clock
//! - [`RecordingDelegate`]: A delegate that records every lifecycle event
//! - [`CountingAction`]: An action that counts invocations

use crate::action::Action;
use crate::delegate::RouterDelegate;
use crate::entry::RoutingEntry;
use crate::router::Router;
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
    time::Duration,
};
use waypost_core::{Job, Params, Request, RouteId, SerialContext, Url};

// ============================================================================
// Manual Context
// ============================================================================

/// A [`SerialContext`] that only runs jobs when told to.
///
/// Delayed jobs are kept against a virtual clock that moves only through
/// [`advance`](Self::advance).
///
/// # Example
///
/// ```rust,ignore
/// let context = ManualContext::new();
/// let router = Router::<()>::new(context.clone());
///
/// router.dispatch(url, Some(Duration::from_millis(100)));
/// context.run_until_idle();                       // drain pass
/// context.advance(Duration::from_millis(100));    // timeout fires
/// ```
#[derive(Clone, Default)]
pub struct ManualContext {
    inner: Rc<RefCell<ManualState>>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    seq: u64,
    ready: VecDeque<Job>,
    timers: Vec<Timer>,
}

struct Timer {
    due: Duration,
    seq: u64,
    job: Job,
}

impl ManualContext {
    /// Create a new context with the clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Number of jobs ready to run.
    pub fn queued(&self) -> usize {
        self.inner.borrow().ready.len()
    }

    /// Number of delayed jobs not yet due.
    pub fn timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Run ready jobs, including ones they submit, until none are left.
    ///
    /// Returns how many jobs ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        loop {
            let job = self.inner.borrow_mut().ready.pop_front();
            match job {
                Some(job) => {
                    job();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    /// Move the clock forward by `by`, firing due timers in deadline order
    /// and running the jobs they submit.
    ///
    /// The clock saturates at `Duration::MAX`, as do timer deadlines.
    ///
    /// Returns how many jobs ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now().checked_add(by).unwrap_or(Duration::MAX);
        let mut ran = self.run_until_idle();

        while let Some(timer) = self.pop_due(target) {
            (timer.job)();
            ran += 1 + self.run_until_idle();
        }

        self.inner.borrow_mut().now = target;
        ran
    }

    fn pop_due(&self, target: Duration) -> Option<Timer> {
        let mut state = self.inner.borrow_mut();
        let index = state
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= target)
            .min_by_key(|(_, timer)| (timer.due, timer.seq))
            .map(|(index, _)| index)?;
        let timer = state.timers.swap_remove(index);
        state.now = state.now.max(timer.due);
        Some(timer)
    }
}

impl SerialContext for ManualContext {
    fn execute(&self, job: Job) {
        self.inner.borrow_mut().ready.push_back(job);
    }

    fn execute_after(&self, delay: Duration, job: Job) {
        let mut state = self.inner.borrow_mut();
        let due = state.now.checked_add(delay).unwrap_or(Duration::MAX);
        let seq = state.seq;
        state.seq += 1;
        state.timers.push(Timer { due, seq, job });
    }
}

// ============================================================================
// Recording Delegate
// ============================================================================

/// One delegate callback, as recorded by [`RecordingDelegate`].
#[derive(Debug, Clone, PartialEq)]
pub enum RouterEvent<O> {
    /// `will_route`
    WillRoute {
        /// Matched entry.
        route: RouteId,
        /// Request handed to the action.
        request: Request,
    },
    /// `did_route`
    DidRoute {
        /// Matched entry.
        route: RouteId,
        /// Request handed to the action.
        request: Request,
        /// What the action returned.
        result: Option<O>,
    },
    /// `did_fail_to_route`
    DidFailToRoute {
        /// The unmatched URL.
        url: Url,
        /// Its query parameters.
        query: Params,
    },
    /// `did_timeout`
    DidTimeout {
        /// The expired URL.
        url: Url,
        /// Its query parameters.
        query: Params,
    },
    /// `did_cancel`
    DidCancel,
}

/// A delegate that records all events it receives.
///
/// Clones share the same log, so keep one clone and hand the other to the
/// router.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingDelegate::<String>::new();
/// router.set_delegate(recorder.clone());
///
/// // ... dispatch and drive the context ...
///
/// assert_eq!(recorder.routed().len(), 1);
/// ```
pub struct RecordingDelegate<O> {
    events: Rc<RefCell<Vec<RouterEvent<O>>>>,
}

impl<O: Clone> RecordingDelegate<O> {
    /// Create a new, empty recorder.
    pub fn new() -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Get a clone of the recorded events.
    pub fn events(&self) -> Vec<RouterEvent<O>> {
        self.events.borrow().clone()
    }

    /// Get the number of recorded events.
    pub fn count(&self) -> usize {
        self.events.borrow().len()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// `will_route` events as `(route, request)`.
    pub fn will_route_events(&self) -> Vec<(RouteId, Request)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                RouterEvent::WillRoute { route, request } => Some((*route, request.clone())),
                _ => None,
            })
            .collect()
    }

    /// `did_route` events as `(route, request, result)`.
    pub fn routed(&self) -> Vec<(RouteId, Request, Option<O>)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                RouterEvent::DidRoute {
                    route,
                    request,
                    result,
                } => Some((*route, request.clone(), result.clone())),
                _ => None,
            })
            .collect()
    }

    /// `did_fail_to_route` events as `(url, query)`.
    pub fn failed(&self) -> Vec<(Url, Params)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                RouterEvent::DidFailToRoute { url, query } => Some((url.clone(), query.clone())),
                _ => None,
            })
            .collect()
    }

    /// `did_timeout` events as `(url, query)`.
    pub fn timed_out(&self) -> Vec<(Url, Params)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                RouterEvent::DidTimeout { url, query } => Some((url.clone(), query.clone())),
                _ => None,
            })
            .collect()
    }

    /// Number of `did_cancel` events.
    pub fn cancelled(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, RouterEvent::DidCancel))
            .count()
    }

    fn push(&self, event: RouterEvent<O>) {
        self.events.borrow_mut().push(event);
    }
}

impl<O: Clone> Default for RecordingDelegate<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> Clone for RecordingDelegate<O> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
        }
    }
}

impl<O: Clone + 'static> RouterDelegate<O> for RecordingDelegate<O> {
    fn will_route(&self, _router: &Router<O>, route: &RoutingEntry<O>, request: &Request) {
        self.push(RouterEvent::WillRoute {
            route: route.id(),
            request: request.clone(),
        });
    }

    fn did_route(
        &self,
        _router: &Router<O>,
        route: &RoutingEntry<O>,
        request: &Request,
        result: Option<&O>,
    ) {
        self.push(RouterEvent::DidRoute {
            route: route.id(),
            request: request.clone(),
            result: result.cloned(),
        });
    }

    fn did_fail_to_route(&self, _router: &Router<O>, url: &Url, query: &Params) {
        self.push(RouterEvent::DidFailToRoute {
            url: url.clone(),
            query: query.clone(),
        });
    }

    fn did_timeout(&self, _router: &Router<O>, url: &Url, query: &Params) {
        self.push(RouterEvent::DidTimeout {
            url: url.clone(),
            query: query.clone(),
        });
    }

    fn did_cancel(&self, _router: &Router<O>) {
        self.push(RouterEvent::DidCancel);
    }
}

// ============================================================================
// Counting Action
// ============================================================================

/// An action that counts invocations and returns `None`.
///
/// # Example
///
/// ```rust,ignore
/// let counter = CountingAction::new();
/// entry.set_action(Some(ActionRef::new(counter.clone())));
///
/// // ... dispatch and drive the context ...
///
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct CountingAction {
    count: Rc<Cell<usize>>,
}

impl CountingAction {
    /// Create a new counting action.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.get()
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.set(0);
    }
}

impl<O> Action<O> for CountingAction {
    fn run(&self, _route: &RoutingEntry<O>, _request: &Request) -> Option<O> {
        self.count.set(self.count.get() + 1);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_context_runs_in_order() {
        let context = ManualContext::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for i in 0..3 {
            let log = log.clone();
            context.execute(Box::new(move || log.borrow_mut().push(i)));
        }
        assert_eq!(context.queued(), 3);
        assert!(log.borrow().is_empty());

        assert_eq!(context.run_until_idle(), 3);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_manual_context_timers_follow_the_clock() {
        let context = ManualContext::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (name, ms) in [("late", 30), ("early", 10), ("tie", 10)] {
            let log = log.clone();
            context.execute_after(
                Duration::from_millis(ms),
                Box::new(move || log.borrow_mut().push(name)),
            );
        }

        context.advance(Duration::from_millis(5));
        assert!(log.borrow().is_empty());

        context.advance(Duration::from_millis(5));
        assert_eq!(*log.borrow(), vec!["early", "tie"]);
        assert_eq!(context.now(), Duration::from_millis(10));

        context.advance(Duration::from_millis(100));
        assert_eq!(*log.borrow(), vec!["early", "tie", "late"]);
        assert_eq!(context.timers(), 0);
    }

    #[test]
    fn test_manual_context_clock_saturates() {
        let context = ManualContext::new();
        let fired = Rc::new(Cell::new(false));

        context.advance(Duration::from_secs(1));
        let flag = fired.clone();
        context.execute_after(Duration::MAX, Box::new(move || flag.set(true)));
        assert_eq!(context.timers(), 1);

        context.advance(Duration::from_secs(3600));
        assert!(!fired.get());

        context.advance(Duration::MAX);
        assert!(fired.get());
        assert_eq!(context.now(), Duration::MAX);

        context.advance(Duration::MAX);
        assert_eq!(context.now(), Duration::MAX);
    }

    #[test]
    fn test_jobs_submitted_by_timers_run() {
        let context = ManualContext::new();
        let hits = Rc::new(Cell::new(0));

        let inner_context = context.clone();
        let inner_hits = hits.clone();
        context.execute_after(
            Duration::from_millis(1),
            Box::new(move || {
                inner_context.execute(Box::new(move || inner_hits.set(inner_hits.get() + 1)));
            }),
        );

        assert_eq!(context.advance(Duration::from_millis(1)), 2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_counting_action() {
        let counter = CountingAction::new();
        let context = ManualContext::new();
        let router = Router::<()>::new(context);
        let route = router.add_route("/x");
        let request = Request::new(
            Url::parse("app://localhost/x").unwrap(),
            Params::new(),
            Params::new(),
        );

        assert_eq!(Action::<()>::run(&counter, &route, &request), None);
        assert_eq!(counter.count(), 1);
        counter.reset();
        assert_eq!(counter.count(), 0);
    }
}

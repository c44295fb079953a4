//! # Router Delegate
//!
//! The delegate is told about every terminal outcome of a dispatch:
//!
//! | Callback | When |
//! |----------|------|
//! | `will_route` | a route with an action matched, right before the action runs |
//! | `did_route` | right after the action ran, with its outcome |
//! | `did_fail_to_route` | no pattern matched the URL |
//! | `did_timeout` | the dispatch was still pending when its timer fired |
//! | `did_cancel` | [`Router::cancel`] dropped the pending set |
//!
//! Every method has an empty default body, so a delegate only implements
//! what it cares about. `()` is the do-nothing delegate, a tuple `(A, B)`
//! forwards to both halves in order, and [`Callbacks`] builds a delegate out
//! of optional closures.
//!
//! Callbacks run on the router's context. They may call back into the
//! router (dispatch, add routes, attach actions, cancel).

use crate::entry::RoutingEntry;
use crate::router::Router;
use std::rc::Rc;
use waypost_core::{Params, Request, Url};

/// Receiver of router lifecycle events.
pub trait RouterDelegate<O>: 'static {
    /// A route matched and its action is about to run.
    fn will_route(&self, _router: &Router<O>, _route: &RoutingEntry<O>, _request: &Request) {}

    /// The action ran and returned `result`.
    fn did_route(
        &self,
        _router: &Router<O>,
        _route: &RoutingEntry<O>,
        _request: &Request,
        _result: Option<&O>,
    ) {
    }

    /// No registered pattern matches `url`.
    fn did_fail_to_route(&self, _router: &Router<O>, _url: &Url, _query: &Params) {}

    /// `url` was still pending when its timeout elapsed.
    fn did_timeout(&self, _router: &Router<O>, _url: &Url, _query: &Params) {}

    /// All pending dispatches were dropped.
    fn did_cancel(&self, _router: &Router<O>) {}
}

impl<O> RouterDelegate<O> for () {}

impl<O, D> RouterDelegate<O> for Rc<D>
where
    D: RouterDelegate<O> + ?Sized,
{
    fn will_route(&self, router: &Router<O>, route: &RoutingEntry<O>, request: &Request) {
        (**self).will_route(router, route, request)
    }

    fn did_route(
        &self,
        router: &Router<O>,
        route: &RoutingEntry<O>,
        request: &Request,
        result: Option<&O>,
    ) {
        (**self).did_route(router, route, request, result)
    }

    fn did_fail_to_route(&self, router: &Router<O>, url: &Url, query: &Params) {
        (**self).did_fail_to_route(router, url, query)
    }

    fn did_timeout(&self, router: &Router<O>, url: &Url, query: &Params) {
        (**self).did_timeout(router, url, query)
    }

    fn did_cancel(&self, router: &Router<O>) {
        (**self).did_cancel(router)
    }
}

impl<O, A, B> RouterDelegate<O> for (A, B)
where
    A: RouterDelegate<O>,
    B: RouterDelegate<O>,
{
    fn will_route(&self, router: &Router<O>, route: &RoutingEntry<O>, request: &Request) {
        self.0.will_route(router, route, request);
        self.1.will_route(router, route, request);
    }

    fn did_route(
        &self,
        router: &Router<O>,
        route: &RoutingEntry<O>,
        request: &Request,
        result: Option<&O>,
    ) {
        self.0.did_route(router, route, request, result);
        self.1.did_route(router, route, request, result);
    }

    fn did_fail_to_route(&self, router: &Router<O>, url: &Url, query: &Params) {
        self.0.did_fail_to_route(router, url, query);
        self.1.did_fail_to_route(router, url, query);
    }

    fn did_timeout(&self, router: &Router<O>, url: &Url, query: &Params) {
        self.0.did_timeout(router, url, query);
        self.1.did_timeout(router, url, query);
    }

    fn did_cancel(&self, router: &Router<O>) {
        self.0.did_cancel(router);
        self.1.did_cancel(router);
    }
}

// ============================================================================
// Callbacks
// ============================================================================

type RouteFn<O> = Box<dyn Fn(&Router<O>, &RoutingEntry<O>, &Request)>;
type RoutedFn<O> = Box<dyn Fn(&Router<O>, &RoutingEntry<O>, &Request, Option<&O>)>;
type UrlFn<O> = Box<dyn Fn(&Router<O>, &Url, &Params)>;
type CancelFn<O> = Box<dyn Fn(&Router<O>)>;

/// A delegate assembled from optional closures.
///
/// # Example
///
/// ```rust,ignore
/// router.set_delegate(
///     Callbacks::new()
///         .on_did_fail_to_route(|_router, url, _query| eprintln!("no route for {url}"))
///         .on_did_timeout(|_router, url, _query| eprintln!("gave up on {url}")),
/// );
/// ```
pub struct Callbacks<O> {
    will_route: Option<RouteFn<O>>,
    did_route: Option<RoutedFn<O>>,
    did_fail_to_route: Option<UrlFn<O>>,
    did_timeout: Option<UrlFn<O>>,
    did_cancel: Option<CancelFn<O>>,
}

impl<O> Callbacks<O> {
    /// A delegate with no callbacks set.
    pub fn new() -> Self {
        Self {
            will_route: None,
            did_route: None,
            did_fail_to_route: None,
            did_timeout: None,
            did_cancel: None,
        }
    }

    /// Set the `will_route` callback.
    pub fn on_will_route<F>(mut self, f: F) -> Self
    where
        F: Fn(&Router<O>, &RoutingEntry<O>, &Request) + 'static,
    {
        self.will_route = Some(Box::new(f));
        self
    }

    /// Set the `did_route` callback.
    pub fn on_did_route<F>(mut self, f: F) -> Self
    where
        F: Fn(&Router<O>, &RoutingEntry<O>, &Request, Option<&O>) + 'static,
    {
        self.did_route = Some(Box::new(f));
        self
    }

    /// Set the `did_fail_to_route` callback.
    pub fn on_did_fail_to_route<F>(mut self, f: F) -> Self
    where
        F: Fn(&Router<O>, &Url, &Params) + 'static,
    {
        self.did_fail_to_route = Some(Box::new(f));
        self
    }

    /// Set the `did_timeout` callback.
    pub fn on_did_timeout<F>(mut self, f: F) -> Self
    where
        F: Fn(&Router<O>, &Url, &Params) + 'static,
    {
        self.did_timeout = Some(Box::new(f));
        self
    }

    /// Set the `did_cancel` callback.
    pub fn on_did_cancel<F>(mut self, f: F) -> Self
    where
        F: Fn(&Router<O>) + 'static,
    {
        self.did_cancel = Some(Box::new(f));
        self
    }
}

impl<O> Default for Callbacks<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: 'static> RouterDelegate<O> for Callbacks<O> {
    fn will_route(&self, router: &Router<O>, route: &RoutingEntry<O>, request: &Request) {
        if let Some(f) = &self.will_route {
            f(router, route, request);
        }
    }

    fn did_route(
        &self,
        router: &Router<O>,
        route: &RoutingEntry<O>,
        request: &Request,
        result: Option<&O>,
    ) {
        if let Some(f) = &self.did_route {
            f(router, route, request, result);
        }
    }

    fn did_fail_to_route(&self, router: &Router<O>, url: &Url, query: &Params) {
        if let Some(f) = &self.did_fail_to_route {
            f(router, url, query);
        }
    }

    fn did_timeout(&self, router: &Router<O>, url: &Url, query: &Params) {
        if let Some(f) = &self.did_timeout {
            f(router, url, query);
        }
    }

    fn did_cancel(&self, router: &Router<O>) {
        if let Some(f) = &self.did_cancel {
            f(router);
        }
    }
}

// ============================================================================
// Tracing
// ============================================================================

/// A delegate wrapper that records each event with `tracing`, then forwards
/// it to the inner delegate.
#[cfg(feature = "tracing")]
pub struct TracingDelegate<D = ()> {
    inner: D,
}

#[cfg(feature = "tracing")]
impl TracingDelegate<()> {
    /// Log only.
    pub const fn new() -> Self {
        Self { inner: () }
    }
}

#[cfg(feature = "tracing")]
impl Default for TracingDelegate<()> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "tracing")]
impl<D> TracingDelegate<D> {
    /// Log, then forward to `inner`.
    pub const fn wrap(inner: D) -> Self {
        Self { inner }
    }

    /// The wrapped delegate.
    pub fn inner(&self) -> &D {
        &self.inner
    }
}

#[cfg(feature = "tracing")]
impl<O, D> RouterDelegate<O> for TracingDelegate<D>
where
    O: 'static,
    D: RouterDelegate<O>,
{
    fn will_route(&self, router: &Router<O>, route: &RoutingEntry<O>, request: &Request) {
        let span = tracing::info_span!(
            "will_route",
            router = %router.label(),
            route = %route.pattern(),
            url = %request.url(),
        );
        let _guard = span.enter();
        tracing::debug!(parameters = ?request.parameters(), "running action");
        self.inner.will_route(router, route, request);
    }

    fn did_route(
        &self,
        router: &Router<O>,
        route: &RoutingEntry<O>,
        request: &Request,
        result: Option<&O>,
    ) {
        tracing::info!(
            router = %router.label(),
            route = %route.pattern(),
            url = %request.url(),
            has_result = result.is_some(),
            "routed"
        );
        self.inner.did_route(router, route, request, result);
    }

    fn did_fail_to_route(&self, router: &Router<O>, url: &Url, query: &Params) {
        tracing::warn!(router = %router.label(), %url, ?query, "no route matched");
        self.inner.did_fail_to_route(router, url, query);
    }

    fn did_timeout(&self, router: &Router<O>, url: &Url, query: &Params) {
        tracing::warn!(router = %router.label(), %url, ?query, "dispatch timed out");
        self.inner.did_timeout(router, url, query);
    }

    fn did_cancel(&self, router: &Router<O>) {
        tracing::info!(router = %router.label(), "pending dispatches cancelled");
        self.inner.did_cancel(router);
    }
}

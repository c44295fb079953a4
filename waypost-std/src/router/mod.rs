//! # Pending-Dispatch Engine
//!
//! [`Router`] owns the routing entries and the pending set. `dispatch` only
//! enqueues; the actual work happens in a *drain pass* that runs later on
//! the owner's [`SerialContext`].
//!
//! # Drain Pass
//!
//! The pending set is snapshotted and cleared, then each entry is resolved
//! against the live routing entries in registration order (first match
//! wins):
//!
//! - **No match**: `did_fail_to_route`, entry dropped.
//! - **Match, no action**: entry goes back into the pending set.
//! - **Match, action**: `will_route`, action, `did_route`, entry dropped.
//!
//! Drain requests are coalesced: any number of triggers before the drain
//! runs produce one pass.
//!
//! # Starvation
//!
//! There is no retry limit. An entry whose route never gets an action stays
//! pending until its timeout fires or the router is cancelled. Dispatch
//! with no timeout only when the route is known to get an action.
//!
//! # Threading
//!
//! All state is `Rc`/`RefCell` and confined to the context's thread. Every
//! public method must be called from that context. No `RefCell` borrow is
//! held while actions or delegate callbacks run, so both may call back into
//! the router.

mod builder;
mod pending;

pub use builder::RouterBuilder;

use crate::binding::{match_path, parse_query};
use crate::delegate::RouterDelegate;
use crate::entry::RoutingEntry;
use crate::pattern::RoutePattern;
use pending::{PendingEntry, PendingQueue};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;
use waypost_core::{Outcome, Params, PendingId, Request, RouteId, RouterError, SerialContext, Url};

/// Router state. Shared by the [`Router`] handles; routing entries and
/// scheduled jobs only hold weak references.
pub(crate) struct RouterState<O> {
    context: Rc<dyn SerialContext>,
    label: String,
    default_timeout: Option<Duration>,
    routes: RefCell<Vec<RoutingEntry<O>>>,
    pending: RefCell<PendingQueue>,
    delegate: RefCell<Option<Rc<dyn RouterDelegate<O>>>>,
    drain_scheduled: Cell<bool>,
    generation: Cell<u64>,
    next_pending: Cell<u64>,
}

/// Resolves dispatched URLs against registered patterns and runs actions,
/// holding URLs whose action is not attached yet.
///
/// `Router` is a handle; clones share the same routes and pending set.
pub struct Router<O> {
    state: Rc<RouterState<O>>,
}

impl<O: Outcome> Router<O> {
    /// Create a router that runs its work on `context`.
    pub fn new(context: impl SerialContext) -> Self {
        Self::builder(context).build()
    }

    /// Start configuring a router that runs its work on `context`.
    pub fn builder(context: impl SerialContext) -> RouterBuilder<O> {
        RouterBuilder::new(Rc::new(context))
    }

    pub(crate) fn from_parts(
        context: Rc<dyn SerialContext>,
        delegate: Option<Rc<dyn RouterDelegate<O>>>,
        default_timeout: Option<Duration>,
        label: String,
    ) -> Self {
        Self {
            state: Rc::new(RouterState {
                context,
                label,
                default_timeout,
                routes: RefCell::new(Vec::new()),
                pending: RefCell::new(PendingQueue::default()),
                delegate: RefCell::new(delegate),
                drain_scheduled: Cell::new(false),
                generation: Cell::new(0),
                next_pending: Cell::new(1),
            }),
        }
    }

    pub(crate) fn from_state(state: Rc<RouterState<O>>) -> Self {
        Self { state }
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Register a pattern at the end of the resolution order.
    ///
    /// Safe to call while dispatches are pending; the next drain sees it.
    pub fn add_route(&self, pattern: impl Into<RoutePattern>) -> RoutingEntry<O> {
        let mut routes = self.state.routes.borrow_mut();
        let entry = RoutingEntry::new(
            RouteId::from_index(routes.len()),
            pattern.into(),
            Rc::downgrade(&self.state),
        );
        routes.push(entry.clone());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            router = %self.state.label,
            route = %entry.pattern(),
            id = %entry.id(),
            "route registered"
        );

        entry
    }

    /// All routing entries, in registration order.
    pub fn routes(&self) -> Vec<RoutingEntry<O>> {
        self.state.routes.borrow().clone()
    }

    /// The first routing entry matching `url`, with its path parameters.
    pub fn resolve(&self, url: &Url) -> Option<(RoutingEntry<O>, Params)> {
        self.state.routes.borrow().iter().find_map(|route| {
            match_path(route.pattern(), url).map(|params| (route.clone(), params))
        })
    }

    // ------------------------------------------------------------------------
    // Delegate
    // ------------------------------------------------------------------------

    /// Replace the delegate.
    pub fn set_delegate<D: RouterDelegate<O>>(&self, delegate: D) {
        self.set_shared_delegate(Rc::new(delegate));
    }

    /// Replace the delegate with one that is shared elsewhere.
    pub fn set_shared_delegate(&self, delegate: Rc<dyn RouterDelegate<O>>) {
        let previous = self.state.delegate.replace(Some(delegate));
        drop(previous);
    }

    /// Remove the delegate. Events are dropped until a new one is set.
    pub fn clear_delegate(&self) {
        let previous = self.state.delegate.replace(None);
        drop(previous);
    }

    fn notify(&self, f: impl FnOnce(&dyn RouterDelegate<O>)) {
        let delegate = self.state.delegate.borrow().clone();
        if let Some(delegate) = delegate {
            f(delegate.as_ref());
        }
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    /// Queue `url` for routing and return immediately.
    ///
    /// With `Some(timeout)` (non-zero), the dispatch is dropped with
    /// `did_timeout` if it is still pending when the timeout elapses.
    /// `None` or a zero duration keeps it pending for as long as it takes.
    pub fn dispatch(&self, url: Url, timeout: Option<Duration>) -> PendingId {
        let id = PendingId::from_raw(self.state.next_pending.get());
        self.state.next_pending.set(id.as_u64() + 1);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            router = %self.state.label,
            pending_id = %id,
            %url,
            timeout = ?timeout,
            "dispatch"
        );

        self.state.pending.borrow_mut().push(PendingEntry::new(id, url));
        self.schedule_drain();

        if let Some(timeout) = timeout.filter(|t| !t.is_zero()) {
            let weak = Rc::downgrade(&self.state);
            self.state.context.execute_after(
                timeout,
                Box::new(move || {
                    if let Some(state) = weak.upgrade() {
                        Router::from_state(state).expire(id);
                    }
                }),
            );
        }

        id
    }

    /// Dispatch with the builder's default timeout.
    pub fn dispatch_default(&self, url: Url) -> PendingId {
        self.dispatch(url, self.state.default_timeout)
    }

    /// Parse `url` and dispatch it.
    pub fn dispatch_str(&self, url: &str, timeout: Option<Duration>) -> Result<PendingId, RouterError> {
        let url = Url::parse(url)?;
        Ok(self.dispatch(url, timeout))
    }

    /// Drop every pending dispatch and notify `did_cancel`.
    ///
    /// Timers already scheduled for the dropped entries become no-ops. When
    /// called from inside an action, the rest of the running drain pass is
    /// dropped as well.
    pub fn cancel(&self) {
        let dropped = self.state.pending.borrow_mut().clear();
        self.state.generation.set(self.state.generation.get() + 1);

        #[cfg(feature = "tracing")]
        tracing::debug!(router = %self.state.label, dropped, "cancel");
        #[cfg(not(feature = "tracing"))]
        let _ = dropped;

        self.notify(|delegate| delegate.did_cancel(self));
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    /// Number of dispatches waiting in the pending set.
    pub fn pending_len(&self) -> usize {
        self.state.pending.borrow().len()
    }

    /// Whether the dispatch `id` is still waiting.
    pub fn is_pending(&self, id: PendingId) -> bool {
        self.state.pending.borrow().contains(id)
    }

    // ------------------------------------------------------------------------
    // Engine
    // ------------------------------------------------------------------------

    /// Ask the context for a drain pass, unless one is already queued.
    pub(crate) fn schedule_drain(&self) {
        if self.state.drain_scheduled.replace(true) {
            return;
        }
        let weak = Rc::downgrade(&self.state);
        self.state.context.execute(Box::new(move || {
            if let Some(state) = weak.upgrade() {
                Router::from_state(state).drain();
            }
        }));
    }

    fn drain(&self) {
        self.state.drain_scheduled.set(false);

        let batch = self.state.pending.borrow_mut().take_all();
        if batch.is_empty() {
            return;
        }
        let generation = self.state.generation.get();

        #[cfg(feature = "tracing")]
        tracing::trace!(router = %self.state.label, pending = batch.len(), "drain start");

        for entry in batch {
            if self.state.generation.get() != generation {
                #[cfg(feature = "tracing")]
                tracing::debug!(router = %self.state.label, "drain interrupted by cancel");
                break;
            }

            match self.resolve(entry.url()) {
                None => self.fail(entry),
                Some((route, path_parameters)) => match route.action() {
                    None => {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(
                            router = %self.state.label,
                            pending_id = %entry.id(),
                            route = %route.pattern(),
                            "route has no action yet, requeued"
                        );
                        self.state.pending.borrow_mut().push(entry);
                    }
                    Some(action) => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(
                            router = %self.state.label,
                            pending_id = %entry.id(),
                            route = %route.pattern(),
                            waited = ?entry.waited(),
                            "routing"
                        );

                        let query_parameters = parse_query(entry.url());
                        let request =
                            Request::new(entry.into_url(), path_parameters, query_parameters);

                        self.notify(|delegate| delegate.will_route(self, &route, &request));
                        let result = action.run(&route, &request);
                        self.notify(|delegate| {
                            delegate.did_route(self, &route, &request, result.as_ref())
                        });
                    }
                },
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            router = %self.state.label,
            still_pending = self.state.pending.borrow().len(),
            "drain finished"
        );
    }

    fn fail(&self, entry: PendingEntry) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            router = %self.state.label,
            pending_id = %entry.id(),
            url = %entry.url(),
            "no route matched"
        );

        let url = entry.into_url();
        let query = parse_query(&url);
        self.notify(|delegate| delegate.did_fail_to_route(self, &url, &query));
    }

    fn expire(&self, id: PendingId) {
        let Some(entry) = self.state.pending.borrow_mut().remove(id) else {
            return;
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            router = %self.state.label,
            pending_id = %id,
            url = %entry.url(),
            waited = ?entry.waited(),
            "timed out"
        );

        let url = entry.into_url();
        let query = parse_query(&url);
        self.notify(|delegate| delegate.did_timeout(self, &url, &query));
    }
}

impl<O> Router<O> {
    /// The name used in this router's log records.
    pub fn label(&self) -> &str {
        &self.state.label
    }

    /// Whether two handles refer to the same router.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// A non-owning handle.
    pub fn downgrade(&self) -> WeakRouter<O> {
        WeakRouter {
            state: Rc::downgrade(&self.state),
        }
    }
}

impl<O> Clone for Router<O> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<O> fmt::Debug for Router<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("label", &self.state.label)
            .field("routes", &self.state.routes.borrow().len())
            .field("pending", &self.state.pending.borrow().len())
            .finish()
    }
}

/// A non-owning router handle, for delegates and actions that must not keep
/// the router alive.
pub struct WeakRouter<O> {
    state: Weak<RouterState<O>>,
}

impl<O> WeakRouter<O> {
    /// The router, if it is still alive.
    pub fn upgrade(&self) -> Option<Router<O>> {
        self.state.upgrade().map(|state| Router { state })
    }
}

impl<O> Clone for WeakRouter<O> {
    fn clone(&self) -> Self {
        Self {
            state: Weak::clone(&self.state),
        }
    }
}

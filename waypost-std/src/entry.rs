//! Routing entries: a pattern plus a late-bindable action slot.
//!
//! Entries are created by [`Router::add_route`] and live as long as the
//! router. The handle returned to the caller is cheap to clone; every clone
//! refers to the same slot.

use crate::action::ActionRef;
use crate::pattern::RoutePattern;
use crate::router::{Router, RouterState};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use waypost_core::{Outcome, RouteId, RouterError};

/// A registered route pattern and its (possibly absent) action.
pub struct RoutingEntry<O> {
    inner: Rc<EntryInner<O>>,
}

struct EntryInner<O> {
    id: RouteId,
    pattern: RoutePattern,
    action: RefCell<Option<ActionRef<O>>>,
    router: Weak<RouterState<O>>,
}

impl<O: Outcome> RoutingEntry<O> {
    pub(crate) fn new(id: RouteId, pattern: RoutePattern, router: Weak<RouterState<O>>) -> Self {
        Self {
            inner: Rc::new(EntryInner {
                id,
                pattern,
                action: RefCell::new(None),
                router,
            }),
        }
    }

    /// The router that created this entry, if it is still alive.
    pub fn router(&self) -> Option<Router<O>> {
        self.inner.router.upgrade().map(Router::from_state)
    }

    /// Replace the action.
    ///
    /// Attaching an action (`Some`) schedules a drain on the router, so URLs
    /// that were waiting for this route resolve without a new dispatch.
    /// Detaching (`None`) does not.
    pub fn set_action(&self, action: Option<ActionRef<O>>) {
        let attached = action.is_some();
        let previous = self.inner.action.replace(action);
        drop(previous);

        if attached {
            if let Some(router) = self.router() {
                router.schedule_drain();
            }
        }
    }

    /// Like [`set_action`](Self::set_action), but reports a dropped router.
    ///
    /// The slot is left untouched on error.
    pub fn try_set_action(&self, action: Option<ActionRef<O>>) -> Result<(), RouterError> {
        if self.inner.router.strong_count() == 0 {
            return Err(RouterError::RouterDropped(self.inner.pattern.to_string()));
        }
        self.set_action(action);
        Ok(())
    }

    /// Detach `action`, but only if it is the one currently attached.
    ///
    /// Returns whether the slot was cleared. A caller holding a stale action
    /// can never clear a newer one.
    pub fn clear_if_current(&self, action: &ActionRef<O>) -> bool {
        let previous = {
            let mut slot = self.inner.action.borrow_mut();
            if slot.as_ref().is_some_and(|current| current.id() == action.id()) {
                slot.take()
            } else {
                None
            }
        };
        previous.is_some()
    }
}

impl<O> RoutingEntry<O> {
    /// Position in registration order.
    pub fn id(&self) -> RouteId {
        self.inner.id
    }

    /// The pattern this entry was registered with.
    pub fn pattern(&self) -> &RoutePattern {
        &self.inner.pattern
    }

    /// The currently attached action.
    pub fn action(&self) -> Option<ActionRef<O>> {
        self.inner.action.borrow().clone()
    }

    /// Whether an action is attached.
    pub fn has_action(&self) -> bool {
        self.inner.action.borrow().is_some()
    }

    /// Whether two handles refer to the same entry.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<O> Clone for RoutingEntry<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<O> fmt::Debug for RoutingEntry<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingEntry")
            .field("id", &self.inner.id)
            .field("pattern", &self.inner.pattern.as_str())
            .field("action", &self.inner.action.borrow().as_ref().map(ActionRef::id))
            .finish()
    }
}

//! # Actions
//!
//! An action is the caller-supplied logic that runs once a dispatched URL
//! has been resolved to a routing entry. It receives the entry and the
//! [`Request`] and may produce an outcome, which the router passes to the
//! delegate without looking at it.
//!
//! Actions are attached to routing entries through [`ActionRef`], which
//! pairs the action with an [`ActionId`] assigned at wrap time. Detaching
//! compares ids, never addresses.
//!
//! # Usage Patterns
//!
//! 1. **Closure**: `ActionRef::from_fn(|route, request| Some(...))`
//! 2. **Struct implementation**: `impl Action<MyOutcome> for MyAction`

use crate::entry::RoutingEntry;
use std::fmt;
use std::rc::Rc;
use waypost_core::{ActionId, Outcome, Request};

/// Logic bound to a routing entry.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot act on routes producing `{O}`",
    label = "missing `Action<{O}>` implementation",
    note = "Implement `run(&self, &RoutingEntry<{O}>, &Request) -> Option<{O}>`."
)]
pub trait Action<O>: 'static {
    /// Handle a resolved request.
    fn run(&self, route: &RoutingEntry<O>, request: &Request) -> Option<O>;
}

// Blanket impl for closures
impl<O, F> Action<O> for F
where
    F: Fn(&RoutingEntry<O>, &Request) -> Option<O> + 'static,
{
    fn run(&self, route: &RoutingEntry<O>, request: &Request) -> Option<O> {
        (self)(route, request)
    }
}

/// A shared action together with its identity token.
///
/// Cloning is cheap and keeps the id, so a clone can later be used to
/// detach the action it came from.
pub struct ActionRef<O> {
    id: ActionId,
    action: Rc<dyn Action<O>>,
}

impl<O: Outcome> ActionRef<O> {
    /// Wrap an action, assigning it a fresh id.
    pub fn new<A: Action<O>>(action: A) -> Self {
        Self {
            id: ActionId::next(),
            action: Rc::new(action),
        }
    }

    /// Wrap a closure.
    ///
    /// Same as [`ActionRef::new`], but the explicit bound lets the closure's
    /// argument types be inferred.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&RoutingEntry<O>, &Request) -> Option<O> + 'static,
    {
        Self::new(f)
    }

    /// Run the wrapped action.
    pub fn run(&self, route: &RoutingEntry<O>, request: &Request) -> Option<O> {
        self.action.run(route, request)
    }
}

impl<O> ActionRef<O> {
    /// The identity token of the wrapped action.
    pub fn id(&self) -> ActionId {
        self.id
    }
}

impl<O> Clone for ActionRef<O> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            action: Rc::clone(&self.action),
        }
    }
}

impl<O> PartialEq for ActionRef<O> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<O> Eq for ActionRef<O> {}

impl<O> fmt::Debug for ActionRef<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActionRef").field(&self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl Action<String> for Fixed {
        fn run(&self, _route: &RoutingEntry<String>, _request: &Request) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    #[test]
    fn test_clones_share_identity() {
        let action = ActionRef::new(Fixed("show"));
        let clone = action.clone();
        assert_eq!(action.id(), clone.id());
        assert_eq!(action, clone);
    }

    #[test]
    fn test_separate_wraps_differ() {
        let a = ActionRef::new(Fixed("show"));
        let b = ActionRef::new(Fixed("show"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_fn_infers_arguments() {
        let action: ActionRef<usize> =
            ActionRef::from_fn(|_route, request| Some(request.parameters().len()));
        assert!(format!("{action:?}").starts_with("ActionRef"));
    }
}

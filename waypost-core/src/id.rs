//! Identity tokens.
//!
//! Waypost never compares actions or dispatches by address. Each of these
//! is a plain integer token with value semantics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ACTION_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an action, assigned once when the action is wrapped.
///
/// Clones of the same action share its id; two separately wrapped actions
/// never do, even if they are equal by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(u64);

impl ActionId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        Self(NEXT_ACTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw value.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action#{}", self.0)
    }
}

/// Identity of one dispatch call.
///
/// Unique within the router that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PendingId(u64);

impl PendingId {
    /// Wrap a raw value. Routers hand these out sequentially.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw value.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PendingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pending#{}", self.0)
    }
}

/// Identity of a routing entry: its position in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(usize);

impl RouteId {
    /// Wrap a registration index.
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Registration index; lower ids win when several patterns match.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "route#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_ids_are_unique() {
        let a = ActionId::next();
        let b = ActionId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_display() {
        assert_eq!(PendingId::from_raw(7).to_string(), "pending#7");
        assert_eq!(RouteId::from_index(0).to_string(), "route#0");
    }
}

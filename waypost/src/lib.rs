//! # waypost - Deferred URL Routing
//!
//! `waypost` resolves incoming URLs against registered route patterns and
//! hands each match to an action. The action does not have to exist yet:
//! a URL whose route has no action waits in a pending set until one is
//! attached, its timeout fires, or the router is cancelled.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use waypost::prelude::*;
//!
//! let context = LocalContext::new();
//! let router = Router::<String>::new(context.clone());
//! let show = router.add_route("/people/:id/show");
//!
//! // Dispatch before anyone can handle it...
//! router.dispatch_str("app://localhost/people/1/show", Some(Duration::from_secs(2)))?;
//!
//! // ...and it is routed as soon as the screen registers.
//! show.set_action(Some(ActionRef::from_fn(|_route, request| {
//!     Some(format!("person {}", request.parameter("id")?))
//! })));
//! ```
//!
//! ## Pieces
//!
//! - [`RoutePattern`] and the [`binding`] functions: pure matching and query parsing
//! - [`RoutingEntry`]: a pattern with a late-bindable [`ActionRef`]
//! - [`Router`]: pending set, drain passes, timeouts, cancellation
//! - [`RouterDelegate`]: lifecycle notifications
//! - [`SerialContext`]: where all of the above runs

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use waypost_core::{
    // Identity
    ActionId,
    // Errors
    BoxError,
    // Context
    Job,
    // Request
    Outcome,
    Params,
    PendingId,
    Request,
    RouteId,
    RouterError,
    SerialContext,
    Url,
    WaypostError,
};

pub use waypost_std::{
    // Actions
    Action,
    ActionRef,
    // Delegates
    Callbacks,
    // Patterns
    PatternMode,
    RoutePattern,
    // Router
    Router,
    RouterBuilder,
    RouterDelegate,
    RoutingEntry,
    Segment,
    WeakRouter,
};

#[cfg(feature = "tokio")]
pub use waypost_std::LocalContext;

#[cfg(feature = "tracing")]
pub use waypost_std::TracingDelegate;

/// Pattern matching and query parsing.
pub mod binding {
    pub use waypost_std::binding::{match_path, parse_query, parse_query_str, percent_decode};
}

/// Testing utilities.
pub mod testing {
    pub use waypost_std::testing::{
        CountingAction, ManualContext, RecordingDelegate, RouterEvent,
    };
}

/// Prelude module - common imports for Waypost.
///
/// # Usage
///
/// ```rust,ignore
/// use waypost::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "tokio")]
    pub use crate::LocalContext;
    pub use crate::{
        Action, ActionRef, Callbacks, Params, PendingId, Request, RoutePattern, Router,
        RouterDelegate, RouterError, RoutingEntry, SerialContext, Url,
    };
}

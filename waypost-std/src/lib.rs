//! # waypost-std
//!
//! Standard implementations for the Waypost deferred URL router.
//!
//! This crate provides:
//! - **Pattern binding**: [`binding::match_path`], [`binding::parse_query`]
//! - **Route patterns**: [`RoutePattern`] in path, host-path and URL modes
//! - **Routing entries**: [`RoutingEntry`] with late-bindable [`ActionRef`]s
//! - **Dispatch engine**: [`Router`] with its pending set, drain passes and timeouts
//! - **Delegates**: [`RouterDelegate`], [`Callbacks`], `TracingDelegate`
//! - **Contexts**: `LocalContext` (tokio), [`testing::ManualContext`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use waypost_core;

// Modules
pub mod action;
pub mod binding;
#[cfg(feature = "tokio")]
pub mod context;
pub mod delegate;
pub mod entry;
pub mod pattern;
pub mod router;
pub mod testing;

pub use action::{Action, ActionRef};
pub use binding::{match_path, parse_query, parse_query_str};
#[cfg(feature = "tokio")]
pub use context::LocalContext;
#[cfg(feature = "tracing")]
pub use delegate::TracingDelegate;
pub use delegate::{Callbacks, RouterDelegate};
pub use entry::RoutingEntry;
pub use pattern::{PatternMode, RoutePattern, Segment};
pub use router::{Router, RouterBuilder, WeakRouter};

//! # waypost-core
//!
//! Core types and contracts for the Waypost deferred URL router.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! code that only needs to *talk about* routing (delegates, actions, custom
//! execution contexts) without pulling in the engine from `waypost-std`.
//!
//! # What Lives Here
//!
//! ## Requests ([`Request`], [`Params`])
//!
//! The immutable value handed to an action once a URL has been resolved:
//! the URL itself plus the parameters captured from its path and parsed
//! from its query string.
//!
//! ## Identity ([`ActionId`], [`PendingId`], [`RouteId`])
//!
//! Opaque tokens used instead of reference equality. An action keeps its
//! [`ActionId`] for life, so "detach only if still mine" is a token
//! comparison. Every dispatch gets a fresh [`PendingId`], even for
//! identical URLs.
//!
//! ## Execution Context ([`SerialContext`])
//!
//! The owner-supplied, serialized place where drains, timers, delegate
//! callbacks and actions run. The router never creates one.
//!
//! # Error Types
//!
//! - [`WaypostError`] - Top-level error type
//! - [`RouterError`] - Errors at the router API edges

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod error;
mod id;
mod outcome;
mod request;

// Re-exports
pub use context::{Job, SerialContext};
pub use error::{BoxError, RouterError, WaypostError};
pub use id::{ActionId, PendingId, RouteId};
pub use outcome::Outcome;
pub use request::{Params, Request};
pub use url::Url;

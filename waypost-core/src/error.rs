//! Error types for Waypost.
//!
//! Routing outcomes (no match, timeout, cancel) are delegate events, not
//! errors. The types here only cover the API edges:
//!
//! - [`WaypostError`] - Top-level error type for all Waypost operations
//! - [`RouterError`] - Errors from router and routing entry calls

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Waypost operations.
#[derive(Error, Debug)]
pub enum WaypostError {
    /// An error occurred at the router API edge.
    #[error("router error: {0}")]
    Router(#[from] RouterError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors that can occur when talking to a router.
#[derive(Error, Debug)]
pub enum RouterError {
    /// The string handed to a dispatch call is not a URL.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The routing entry outlived the router that created it.
    #[error("router for route `{0}` has been dropped")]
    RouterDropped(String),
}

impl From<BoxError> for WaypostError {
    fn from(err: BoxError) -> Self {
        WaypostError::Custom(err)
    }
}

impl From<url::ParseError> for WaypostError {
    fn from(err: url::ParseError) -> Self {
        WaypostError::Router(RouterError::InvalidUrl(err))
    }
}

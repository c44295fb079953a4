//! Router configuration.

use super::Router;
use crate::delegate::RouterDelegate;
use std::rc::Rc;
use std::time::Duration;
use waypost_core::{Outcome, SerialContext};

/// Builder for constructing a [`Router`].
///
/// # Example
///
/// ```rust,ignore
/// let router = Router::<Screen>::builder(LocalContext::new())
///     .label("deeplinks")
///     .default_timeout(Duration::from_secs(5))
///     .delegate(TracingDelegate::new())
///     .build();
/// ```
pub struct RouterBuilder<O> {
    context: Rc<dyn SerialContext>,
    delegate: Option<Rc<dyn RouterDelegate<O>>>,
    default_timeout: Option<Duration>,
    label: String,
}

impl<O: Outcome> RouterBuilder<O> {
    pub(crate) fn new(context: Rc<dyn SerialContext>) -> Self {
        Self {
            context,
            delegate: None,
            default_timeout: None,
            label: String::from("waypost"),
        }
    }

    /// Set the delegate.
    pub fn delegate<D: RouterDelegate<O>>(mut self, delegate: D) -> Self {
        self.delegate = Some(Rc::new(delegate));
        self
    }

    /// Timeout applied by [`Router::dispatch_default`].
    ///
    /// A zero duration means no timeout.
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    /// Name attached to this router's log records.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Build the router.
    pub fn build(self) -> Router<O> {
        Router::from_parts(self.context, self.delegate, self.default_timeout, self.label)
    }
}

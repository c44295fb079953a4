//! Marker for action results.

/// A marker trait for the value an action produces.
///
/// The router never inspects an outcome; it only hands it to the delegate.
pub trait Outcome: 'static {}
impl<T: 'static> Outcome for T {}

#![allow(dead_code)]

use std::time::Duration;
use waypost::{ActionRef, Params, Router, RoutingEntry, Url, testing::RecordingDelegate};

// ============================================================================
// Test Outcome Types
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct RoutingResult {
    pub message: String,
}

// ============================================================================
// Fixture
// ============================================================================

pub const SHORT: Duration = Duration::from_millis(100);

pub struct Fixture<C> {
    pub context: C,
    pub router: Router<RoutingResult>,
    pub show: RoutingEntry<RoutingResult>,
    pub index: RoutingEntry<RoutingResult>,
    pub recorder: RecordingDelegate<RoutingResult>,
}

impl<C: waypost::SerialContext + Clone> Fixture<C> {
    pub fn new(context: C) -> Self {
        let router = Router::new(context.clone());
        let show = router.add_route("/people/:id/show");
        let index = router.add_route("/people");
        let recorder = RecordingDelegate::new();
        router.set_delegate(recorder.clone());

        Self {
            context,
            router,
            show,
            index,
            recorder,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

pub fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn routing_action(message: &str) -> ActionRef<RoutingResult> {
    let message = message.to_string();
    ActionRef::from_fn(move |_route, _request| {
        Some(RoutingResult {
            message: message.clone(),
        })
    })
}

//! Deterministic scenarios on a hand-driven context.

use std::time::Duration;
use waypost::{
    ActionRef, RoutePattern, Router, RouterError,
    testing::{CountingAction, ManualContext, RecordingDelegate, RouterEvent},
};

mod common;
use common::{Fixture, RoutingResult, SHORT, params, routing_action, url};

#[test]
fn test_nothing_happens_until_an_action_is_attached() {
    let fixture = Fixture::new(ManualContext::new());

    fixture
        .router
        .dispatch(url("app://localhost/people/1/show"), None);
    fixture.context.run_until_idle();
    fixture.context.advance(Duration::from_secs(60));

    assert!(fixture.recorder.routed().is_empty());
    assert!(fixture.recorder.failed().is_empty());
    assert_eq!(fixture.router.pending_len(), 1);

    fixture.show.set_action(Some(routing_action("show")));
    fixture.context.run_until_idle();

    let routed = fixture.recorder.routed();
    assert_eq!(routed.len(), 1);
    assert_eq!(routed[0].1.parameters(), params(&[("id", "1")]));
}

#[test]
fn test_unregistered_path_fails_exactly_once() {
    let fixture = Fixture::new(ManualContext::new());

    fixture
        .router
        .dispatch(url("app://localhost/no/such/route?key=value"), Some(SHORT));
    fixture.context.run_until_idle();
    fixture.context.advance(SHORT * 2);
    fixture.context.run_until_idle();

    let failed = fixture.recorder.failed();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].1, params(&[("key", "value")]));
    assert_eq!(fixture.recorder.count(), 1);
}

#[test]
fn test_timeout_then_late_action_never_routes() {
    let fixture = Fixture::new(ManualContext::new());

    fixture
        .router
        .dispatch(url("app://localhost/people/1/show"), Some(SHORT));
    fixture.context.run_until_idle();
    fixture.context.advance(SHORT);
    assert_eq!(fixture.recorder.timed_out().len(), 1);

    let counter = CountingAction::new();
    fixture.show.set_action(Some(ActionRef::new(counter.clone())));
    fixture.context.advance(SHORT * 10);

    assert_eq!(counter.count(), 0);
    assert!(fixture.recorder.routed().is_empty());
    assert_eq!(fixture.recorder.timed_out().len(), 1);
}

#[test]
fn test_cancel_before_drain_silences_all_routing_events() {
    let fixture = Fixture::new(ManualContext::new());
    fixture.index.set_action(Some(routing_action("index")));

    fixture
        .router
        .dispatch(url("app://localhost/people"), Some(SHORT));
    fixture
        .router
        .dispatch(url("app://localhost/no/such/route"), Some(SHORT));
    fixture.router.cancel();

    fixture.context.run_until_idle();
    fixture.context.advance(SHORT * 5);

    assert_eq!(fixture.recorder.events(), vec![RouterEvent::DidCancel]);
}

#[test]
fn test_stale_detach_keeps_current_action() {
    let fixture = Fixture::new(ManualContext::new());
    let old = routing_action("old");
    let new = routing_action("new");

    fixture.show.set_action(Some(old.clone()));
    fixture.show.set_action(Some(new.clone()));
    assert!(!fixture.show.clear_if_current(&old));
    assert_eq!(fixture.show.action(), Some(new));

    fixture
        .router
        .dispatch(url("app://localhost/people/9/show"), None);
    fixture.context.run_until_idle();
    assert_eq!(
        fixture.recorder.routed()[0].2,
        Some(RoutingResult {
            message: "new".into()
        })
    );
}

#[test]
fn test_query_parameters_override_path_parameters() {
    let fixture = Fixture::new(ManualContext::new());
    fixture.show.set_action(Some(routing_action("show")));

    fixture
        .router
        .dispatch(url("app://localhost/people/1/show?id=2&tab=bio"), None);
    fixture.context.run_until_idle();

    let request = &fixture.recorder.routed()[0].1;
    assert_eq!(request.path_parameters(), &params(&[("id", "1")]));
    assert_eq!(
        request.query_parameters(),
        &params(&[("id", "2"), ("tab", "bio")])
    );
    assert_eq!(request.parameters(), params(&[("id", "2"), ("tab", "bio")]));
}

#[test]
fn test_routing_entry_knows_its_router() {
    let fixture = Fixture::new(ManualContext::new());
    let owner = fixture.show.router().expect("router is alive");
    assert!(owner.ptr_eq(&fixture.router));
    assert_eq!(fixture.router.routes().len(), 2);
}

#[test]
fn test_host_path_and_url_patterns() {
    let context = ManualContext::new();
    let router = Router::<&'static str>::new(context.clone());
    let recorder = RecordingDelegate::new();
    router.set_delegate(recorder.clone());

    router
        .add_route(RoutePattern::host_path("people/:id"))
        .set_action(Some(ActionRef::from_fn(|_route, _request| Some("host"))));
    router
        .add_route("web://example.com/people/:id")
        .set_action(Some(ActionRef::from_fn(|_route, _request| Some("web"))));

    router.dispatch(url("myapp://people/5"), None);
    router.dispatch(url("web://example.com/people/6"), None);
    router.dispatch(url("web://elsewhere.com/people/7"), None);
    context.run_until_idle();

    let results: Vec<_> = recorder.routed().into_iter().map(|(_, _, r)| r).collect();
    assert_eq!(results, vec![Some("host"), Some("web")]);
    assert_eq!(recorder.failed().len(), 1);
}

#[test]
fn test_dispatch_str_rejects_garbage() {
    let fixture = Fixture::new(ManualContext::new());
    let err = fixture.router.dispatch_str("::::", None).unwrap_err();
    assert!(matches!(err, RouterError::InvalidUrl(_)));
    assert_eq!(fixture.router.pending_len(), 0);
}

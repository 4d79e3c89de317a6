//! Flight animator timing tests.
//!
//! All tests run on a paused tokio clock, so sleeping advances time
//! deterministically and ticks fire in order.

use route_core::{
    position_at, AnimationStatus, AnimatorConfig, FlightAnimator, PresentationAdapter,
    RecordingPresenter, Route, RouteError, Waypoint,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// 4 steps per segment, 100ms per step, recenter on even steps.
fn fast_config() -> AnimatorConfig {
    AnimatorConfig {
        steps_per_segment: 4,
        segment_duration_ms: 400,
        recenter_every: 2,
    }
}

fn zigzag(id: &str, points: usize) -> Route {
    let waypoints = (0..points)
        .map(|i| Waypoint::new(i as f64 * 1_000.0, if i % 2 == 0 { 0.0 } else { 500.0 }))
        .collect();
    Route::new(id, waypoints).unwrap()
}

fn animator() -> (FlightAnimator, Arc<RecordingPresenter>) {
    let presenter = Arc::new(RecordingPresenter::new());
    let sink: Arc<dyn PresentationAdapter> = presenter.clone();
    (FlightAnimator::new(fast_config(), sink).unwrap(), presenter)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[tokio::test(start_paused = true)]
async fn start_places_marker_on_first_waypoint() {
    let (mut animator, presenter) = animator();
    let route = zigzag("r", 3);

    animator.start(route.clone()).unwrap();

    assert_eq!(presenter.marker_positions(), vec![route.first()]);
    let state = animator.state();
    assert_eq!(state.status, AnimationStatus::Running);
    assert_eq!(state.segment_index, 0);
    assert_eq!(state.step, 0);
    assert_eq!(state.position, Some(route.first()));
}

#[tokio::test(start_paused = true)]
async fn ticks_follow_fixed_step_delay() {
    let (mut animator, presenter) = animator();
    let route = zigzag("r", 3);
    animator.start(route.clone()).unwrap();

    sleep(ms(50)).await;
    assert_eq!(presenter.marker_positions().len(), 1, "no tick before first delay");

    sleep(ms(100)).await;
    let markers = presenter.marker_positions();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[1], position_at(route.waypoints[0], route.waypoints[1], 1, 4));

    sleep(ms(200)).await;
    assert_eq!(presenter.marker_positions().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn animation_parks_on_final_waypoint() {
    let (mut animator, presenter) = animator();
    let route = zigzag("r", 3);
    animator.start(route.clone()).unwrap();

    sleep(ms(1_050)).await;

    let markers = presenter.marker_positions();
    // initial marker + 2 segments * 4 steps
    assert_eq!(markers.len(), 9);
    assert_eq!(markers[4], route.waypoints[1]);
    assert_eq!(*markers.last().unwrap(), route.last());
    assert_eq!(presenter.recenters().len(), 4);

    let state = animator.state();
    assert_eq!(state.status, AnimationStatus::Completed);
    assert_eq!(state.segment_index, 1);
    assert_eq!(state.progress, 1.0);

    sleep(ms(2_000)).await;
    assert_eq!(presenter.marker_positions().len(), 9, "no ticks after completion");
}

#[tokio::test(start_paused = true)]
async fn cancel_mid_flight_stops_emission_and_restart_begins_at_origin() {
    let (mut animator, presenter) = animator();
    let route = zigzag("ten", 10);
    animator.start(route.clone()).unwrap();

    sleep(ms(350)).await;
    assert_eq!(presenter.marker_positions().len(), 4);

    assert!(animator.cancel());
    assert_eq!(animator.status(), AnimationStatus::Idle);

    sleep(ms(5_000)).await;
    assert_eq!(
        presenter.marker_positions().len(),
        4,
        "cancelled run must not deliver further ticks"
    );

    presenter.take();
    animator.start(route.clone()).unwrap();
    assert_eq!(presenter.marker_positions(), vec![route.first()]);

    sleep(ms(150)).await;
    let markers = presenter.marker_positions();
    assert_eq!(markers.len(), 2, "only the new run ticks");
    assert_eq!(markers[1], position_at(route.waypoints[0], route.waypoints[1], 1, 4));
    assert_eq!(animator.state().segment_index, 0);
    assert_eq!(animator.state().step, 1);
}

#[tokio::test(start_paused = true)]
async fn restart_replaces_previous_run() {
    let (mut animator, presenter) = animator();
    let first = zigzag("first", 5);
    let second = Route::new(
        "second",
        vec![Waypoint::new(-9_000.0, -9_000.0), Waypoint::new(-8_000.0, -9_000.0)],
    )
    .unwrap();

    animator.start(first).unwrap();
    sleep(ms(250)).await;

    presenter.take();
    animator.start(second.clone()).unwrap();
    sleep(ms(1_000)).await;

    let markers = presenter.marker_positions();
    assert_eq!(markers.len(), 5);
    assert!(
        markers.iter().all(|p| p.y == -9_000.0),
        "positions from the replaced run leaked: {markers:?}"
    );
    assert_eq!(*markers.last().unwrap(), second.last());
    assert_eq!(animator.state().route_id.as_deref(), Some("second"));
}

#[tokio::test(start_paused = true)]
async fn cancel_when_idle_is_a_no_op() {
    let (mut animator, presenter) = animator();
    assert!(!animator.cancel());
    assert_eq!(animator.status(), AnimationStatus::Idle);
    assert!(presenter.events().is_empty());

    animator.start(zigzag("r", 2)).unwrap();
    sleep(ms(1_000)).await;
    assert_eq!(animator.status(), AnimationStatus::Completed);
    assert!(!animator.cancel(), "completed run has nothing to cancel");
    assert_eq!(animator.status(), AnimationStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn start_after_completion_flies_again() {
    let (mut animator, presenter) = animator();
    let route = zigzag("r", 2);

    animator.start(route.clone()).unwrap();
    sleep(ms(1_000)).await;
    assert_eq!(animator.status(), AnimationStatus::Completed);

    presenter.take();
    animator.start(route.clone()).unwrap();
    assert_eq!(animator.status(), AnimationStatus::Running);
    sleep(ms(1_000)).await;
    assert_eq!(presenter.marker_positions().len(), 5);
    assert_eq!(animator.status(), AnimationStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_progress() {
    let (mut animator, _presenter) = animator();
    let mut rx = animator.subscribe();

    animator.start(zigzag("r", 3)).unwrap();
    assert_eq!(rx.borrow_and_update().status, AnimationStatus::Running);

    sleep(ms(250)).await;
    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    assert_eq!(state.step, 2);
    assert_eq!(state.progress, 0.5);
}

#[tokio::test(start_paused = true)]
async fn dropping_animator_stops_ticks() {
    let (mut animator, presenter) = animator();
    animator.start(zigzag("r", 5)).unwrap();
    sleep(ms(150)).await;
    drop(animator);

    let before = presenter.marker_positions().len();
    sleep(ms(2_000)).await;
    assert_eq!(presenter.marker_positions().len(), before);
}

#[tokio::test]
async fn start_rejects_short_route() {
    let (mut animator, presenter) = animator();
    let short = Route {
        id: "short".into(),
        waypoints: vec![Waypoint::new(0.0, 0.0)],
        labels: Vec::new(),
    };
    assert!(animator.start(short).is_err());
    assert!(presenter.events().is_empty());
    assert_eq!(animator.status(), AnimationStatus::Idle);
}

#[test]
fn start_outside_runtime_reports_error() {
    let (mut animator, presenter) = animator();
    assert_eq!(animator.start(zigzag("r", 3)), Err(RouteError::NoRuntime));
    assert!(presenter.events().is_empty());
    assert_eq!(animator.status(), AnimationStatus::Idle);
    assert!(!animator.cancel());
}

//! Drive a flight to completion, optionally switching routes on the way.

use anyhow::Result;
use route_core::{AnimationState, AnimationStatus, RouteSelector, Waypoint};
use std::future::Future;

/// Switch to another route once enough steps have been flown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchPlan {
    pub route_id: String,
    pub after_steps: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightSummary {
    pub route_id: Option<String>,
    pub status: AnimationStatus,
    pub final_position: Option<Waypoint>,
    pub switched_to: Option<String>,
    pub interrupted: bool,
}

/// Steps flown so far on the current route.
pub fn steps_flown(state: &AnimationState, steps_per_segment: u32) -> u64 {
    state.segment_index as u64 * u64::from(steps_per_segment) + u64::from(state.step)
}

/// Wait for the active flight to finish.
///
/// Returns early, cancelling the flight, when `shutdown` resolves.
pub async fn fly_until_done(
    selector: &mut RouteSelector,
    steps_per_segment: u32,
    switch: Option<SwitchPlan>,
    shutdown: impl Future<Output = ()>,
) -> Result<FlightSummary> {
    let mut rx = selector.subscribe();
    let mut pending_switch = switch;
    let mut switched_to = None;
    let mut interrupted = false;
    tokio::pin!(shutdown);

    loop {
        let state = rx.borrow_and_update().clone();

        if let Some(plan) = &pending_switch {
            if state.status == AnimationStatus::Running
                && steps_flown(&state, steps_per_segment) >= plan.after_steps
            {
                selector.switch_active_route(&plan.route_id)?;
                switched_to = Some(plan.route_id.clone());
                pending_switch = None;
                continue;
            }
        }

        if state.status != AnimationStatus::Running {
            break;
        }

        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested, stopping flight");
                selector.cancel_flight();
                interrupted = true;
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    let state = selector.animation_state();
    Ok(FlightSummary {
        route_id: state.route_id,
        status: state.status,
        final_position: state.position,
        switched_to,
        interrupted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use route_core::{AnimatorConfig, PresentationAdapter, RecordingPresenter, RouteCatalog};
    use std::sync::Arc;
    use std::time::Duration;

    fn selector() -> (RouteSelector, Arc<RecordingPresenter>) {
        let presenter = Arc::new(RecordingPresenter::new());
        let sink: Arc<dyn PresentationAdapter> = presenter.clone();
        let config = AnimatorConfig {
            steps_per_segment: 2,
            segment_duration_ms: 20,
            recenter_every: 2,
        };
        let selector = RouteSelector::new(Arc::new(RouteCatalog::builtin()), config, sink).unwrap();
        (selector, presenter)
    }

    #[test]
    fn steps_flown_counts_across_segments() {
        let state = AnimationState {
            segment_index: 3,
            step: 7,
            ..Default::default()
        };
        assert_eq!(steps_flown(&state, 100), 307);
    }

    #[tokio::test(start_paused = true)]
    async fn flies_to_final_waypoint() {
        let (mut selector, presenter) = selector();
        let route = selector.start_flight().unwrap();

        let summary = fly_until_done(&mut selector, 2, None, std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.status, AnimationStatus::Completed);
        assert_eq!(summary.route_id.as_deref(), Some("coastal_route"));
        assert_eq!(summary.final_position, Some(route.last()));
        assert!(!summary.interrupted);
        // origin + 9 segments * 2 steps
        assert_eq!(presenter.marker_positions().len(), 19);
    }

    #[tokio::test(start_paused = true)]
    async fn switches_route_mid_flight() {
        let (mut selector, _) = selector();
        selector.start_flight().unwrap();

        let plan = SwitchPlan {
            route_id: "hybrid_route".into(),
            after_steps: 5,
        };
        let summary = fly_until_done(&mut selector, 2, Some(plan), std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.switched_to.as_deref(), Some("hybrid_route"));
        assert_eq!(summary.route_id.as_deref(), Some("hybrid_route"));
        assert_eq!(summary.status, AnimationStatus::Completed);
        assert_eq!(selector.active_route_id(), "hybrid_route");
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_flight() {
        let (mut selector, presenter) = selector();
        selector.start_flight().unwrap();

        let summary = fly_until_done(
            &mut selector,
            2,
            None,
            tokio::time::sleep(Duration::from_millis(35)),
        )
        .await
        .unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.status, AnimationStatus::Idle);
        let emitted = presenter.marker_positions().len();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(presenter.marker_positions().len(), emitted);
    }
}

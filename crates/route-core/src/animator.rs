//! Flight animation along a route.
//!
//! [`FlightPlayback`] is the timer-free stepping core: every call to
//! [`FlightPlayback::advance`] moves the marker one step along the current
//! segment. [`FlightAnimator`] drives a playback from a single tokio task at a
//! fixed per-step delay and forwards each position to the presentation
//! adapter.
//!
//! Each segment is split into `steps_per_segment` steps and every step waits
//! `segment_duration / steps_per_segment`. The delay does not depend on the
//! route length, so longer routes take proportionally longer to fly.

use crate::error::{Result, RouteError};
use crate::models::{Route, Waypoint};
use crate::presenter::PresentationAdapter;
use crate::spatial::lerp;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub const DEFAULT_STEPS_PER_SEGMENT: u32 = 100;
pub const DEFAULT_SEGMENT_DURATION_MS: u64 = 60_000;
pub const DEFAULT_RECENTER_EVERY: u32 = 5;

/// Timing parameters for the animation loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimatorConfig {
    /// Number of interpolation steps per segment
    pub steps_per_segment: u32,
    /// Time budget used to derive the per-step delay (milliseconds)
    pub segment_duration_ms: u64,
    /// Recenter the view every N steps
    pub recenter_every: u32,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            steps_per_segment: DEFAULT_STEPS_PER_SEGMENT,
            segment_duration_ms: DEFAULT_SEGMENT_DURATION_MS,
            recenter_every: DEFAULT_RECENTER_EVERY,
        }
    }
}

impl AnimatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.steps_per_segment == 0 {
            return Err(RouteError::InvalidConfig(
                "steps_per_segment must be positive".into(),
            ));
        }
        if self.segment_duration_ms == 0 {
            return Err(RouteError::InvalidConfig(
                "segment_duration_ms must be positive".into(),
            ));
        }
        if self.recenter_every == 0 {
            return Err(RouteError::InvalidConfig(
                "recenter_every must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Delay between two ticks.
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.segment_duration_ms) / self.steps_per_segment.max(1)
    }

    /// Time to fly a whole route at this step delay.
    pub fn route_duration(&self, route: &Route) -> Duration {
        self.step_delay() * self.steps_per_segment * route.segment_count() as u32
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationStatus {
    /// No run in progress
    #[default]
    Idle,
    /// Ticking along the route
    Running,
    /// Parked on the final waypoint
    Completed,
}

/// Snapshot of the live animation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnimationState {
    pub route_id: Option<String>,
    pub segment_index: usize,
    pub step: u32,
    /// Fraction of the current segment covered, in [0, 1]
    pub progress: f64,
    pub position: Option<Waypoint>,
    pub status: AnimationStatus,
}

/// Output of a single animation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub position: Waypoint,
    pub segment_index: usize,
    pub step: u32,
    /// The view should follow the marker on this step
    pub recenter: bool,
    /// This step landed on the route's final waypoint
    pub completed: bool,
}

/// Deterministic stepping state for one run along a route.
#[derive(Debug, Clone)]
pub struct FlightPlayback {
    route: Route,
    steps_per_segment: u32,
    recenter_every: u32,
    segment_index: usize,
    step: u32,
    completed: bool,
}

impl FlightPlayback {
    pub fn new(route: Route, config: &AnimatorConfig) -> Result<Self> {
        config.validate()?;
        route.validate()?;
        Ok(Self {
            route,
            steps_per_segment: config.steps_per_segment,
            recenter_every: config.recenter_every,
            segment_index: 0,
            step: 0,
            completed: false,
        })
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn segment_index(&self) -> usize {
        self.segment_index
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn progress(&self) -> f64 {
        f64::from(self.step) / f64::from(self.steps_per_segment)
    }

    /// Marker position for the current segment and step.
    pub fn position(&self) -> Waypoint {
        match self.route.segment(self.segment_index) {
            Some((start, end)) => position_at(start, end, self.step, self.steps_per_segment),
            None => self.route.last(),
        }
    }

    /// Move one step forward. Returns `None` once the final waypoint has
    /// been reached.
    pub fn advance(&mut self) -> Option<Tick> {
        if self.completed {
            return None;
        }

        self.step += 1;
        if self.step > self.steps_per_segment {
            self.segment_index += 1;
            self.step = 1;
        }

        let (start, end) = self.route.segment(self.segment_index)?;
        let position = position_at(start, end, self.step, self.steps_per_segment);
        let last_segment = self.segment_index + 1 == self.route.segment_count();
        self.completed = last_segment && self.step == self.steps_per_segment;

        Some(Tick {
            position,
            segment_index: self.segment_index,
            step: self.step,
            recenter: self.step % self.recenter_every == 0,
            completed: self.completed,
        })
    }

    pub fn snapshot(&self, status: AnimationStatus) -> AnimationState {
        AnimationState {
            route_id: Some(self.route.id.clone()),
            segment_index: self.segment_index,
            step: self.step,
            progress: self.progress(),
            position: Some(self.position()),
            status,
        }
    }
}

/// Position at `step` of `steps` along `[start, end]`.
///
/// Step 0 is `start` and step `steps` is `end`, both exact.
pub fn position_at(start: Waypoint, end: Waypoint, step: u32, steps: u32) -> Waypoint {
    if step == 0 {
        return start;
    }
    if step >= steps {
        return end;
    }
    lerp(start, end, f64::from(step) / f64::from(steps))
}

struct Shared {
    /// Current run id. Held locked while a tick is being emitted so that a
    /// bump from `cancel` cannot interleave with a stale emission.
    generation: Mutex<u64>,
    state_tx: watch::Sender<AnimationState>,
}

impl Shared {
    fn lock_generation(&self) -> MutexGuard<'_, u64> {
        self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owns the single animation timer and the live [`AnimationState`].
pub struct FlightAnimator {
    config: AnimatorConfig,
    presenter: Arc<dyn PresentationAdapter>,
    shared: Arc<Shared>,
    task: Option<JoinHandle<()>>,
}

impl FlightAnimator {
    pub fn new(config: AnimatorConfig, presenter: Arc<dyn PresentationAdapter>) -> Result<Self> {
        config.validate()?;
        let (state_tx, _) = watch::channel(AnimationState::default());
        Ok(Self {
            config,
            presenter,
            shared: Arc::new(Shared {
                generation: Mutex::new(0),
                state_tx,
            }),
            task: None,
        })
    }

    pub fn state(&self) -> AnimationState {
        self.shared.state_tx.borrow().clone()
    }

    pub fn status(&self) -> AnimationStatus {
        self.shared.state_tx.borrow().status
    }

    /// Watch state snapshots as the animation progresses.
    pub fn subscribe(&self) -> watch::Receiver<AnimationState> {
        self.shared.state_tx.subscribe()
    }

    /// Start flying `route` from its first waypoint.
    ///
    /// Any run in progress is cancelled first. The marker is placed on the
    /// first waypoint before this returns; ticks follow asynchronously on
    /// the current tokio runtime. Fails with [`RouteError::NoRuntime`],
    /// leaving any run in progress untouched, when there is none.
    pub fn start(&mut self, route: Route) -> Result<()> {
        let mut playback = FlightPlayback::new(route, &self.config)?;
        let runtime = Handle::try_current().map_err(|_| RouteError::NoRuntime)?;
        self.abort_task();

        let generation = {
            let mut current = self.shared.lock_generation();
            *current += 1;

            let origin = playback.position();
            self.presenter.set_marker_position(origin);
            self.shared
                .state_tx
                .send_replace(playback.snapshot(AnimationStatus::Running));
            *current
        };

        let step_delay = self.config.step_delay();
        tracing::info!(
            route_id = %playback.route().id,
            segments = playback.route().segment_count(),
            step_delay_ms = step_delay.as_millis() as u64,
            "Starting flight animation"
        );

        let shared = Arc::clone(&self.shared);
        let presenter = Arc::clone(&self.presenter);
        self.task = Some(runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + step_delay, step_delay);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let current = shared.lock_generation();
                if *current != generation {
                    break;
                }
                let Some(tick) = playback.advance() else {
                    break;
                };

                presenter.set_marker_position(tick.position);
                if tick.recenter {
                    presenter.recenter_view(tick.position);
                }

                let status = if tick.completed {
                    AnimationStatus::Completed
                } else {
                    AnimationStatus::Running
                };
                shared.state_tx.send_replace(playback.snapshot(status));
                drop(current);

                if tick.completed {
                    tracing::info!(
                        route_id = %playback.route().id,
                        "Flight reached final waypoint"
                    );
                    break;
                }
            }
        }));

        Ok(())
    }

    /// Stop the running animation. Returns `false` when nothing was running.
    pub fn cancel(&mut self) -> bool {
        let was_running = {
            let mut current = self.shared.lock_generation();
            *current += 1;

            let running = self.shared.state_tx.borrow().status == AnimationStatus::Running;
            if running {
                self.shared.state_tx.send_modify(|state| {
                    state.status = AnimationStatus::Idle;
                });
            }
            running
        };
        self.abort_task();

        if was_running {
            tracing::info!("Flight animation cancelled");
        } else {
            tracing::debug!("Cancel requested with no animation running");
        }
        was_running
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for FlightAnimator {
    fn drop(&mut self) {
        *self.shared.lock_generation() += 1;
        self.abort_task();
    }
}

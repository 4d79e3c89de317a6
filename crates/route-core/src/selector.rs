//! Active route selection, route overlays and no-fly zone avoidance.

use crate::animator::{AnimationState, AnimatorConfig, FlightAnimator};
use crate::catalog::RouteCatalog;
use crate::error::{Result, RouteError};
use crate::models::{NoFlyZone, Route, RouteStyle};
use crate::presenter::PresentationAdapter;
use crate::spatial::{route_intersects_zone, waypoints_in_zone};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Colors assigned to routes in show-all mode, cycled by catalog index.
pub const ROUTE_PALETTE: [&str; 4] = ["blue", "green", "orange", "purple"];

pub const ACTIVE_ROUTE_COLOR: &str = "blue";
pub const ACTIVE_ROUTE_WIDTH: f64 = 3.0;
pub const INACTIVE_ROUTE_COLOR: &str = "#999999";
pub const INACTIVE_ROUTE_WIDTH: f64 = 1.0;
pub const OVERLAY_ROUTE_WIDTH: f64 = 2.0;

/// Color for the route at `index` in a palette. The palette must not be empty.
pub fn palette_color<S: AsRef<str>>(palette: &[S], index: usize) -> &str {
    palette[index % palette.len()].as_ref()
}

/// Whether a route touches a no-fly zone, and where.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteFeasibility {
    pub route_id: String,
    pub intersects: bool,
    /// Indices of waypoints inside the zone
    pub waypoints_in_zone: Vec<usize>,
}

/// Holds the active route and coordinates the animator and the map.
pub struct RouteSelector {
    catalog: Arc<RouteCatalog>,
    presenter: Arc<dyn PresentationAdapter>,
    animator: FlightAnimator,
    palette: Vec<String>,
    active_route_id: String,
    /// Route id -> style, populated only in show-all mode
    displayed_routes: HashMap<String, RouteStyle>,
    no_fly_zone: Option<NoFlyZone>,
}

impl RouteSelector {
    /// Create a selector with the first catalog route active. Nothing is
    /// drawn or animated until [`RouteSelector::start_flight`].
    pub fn new(
        catalog: Arc<RouteCatalog>,
        config: AnimatorConfig,
        presenter: Arc<dyn PresentationAdapter>,
    ) -> Result<Self> {
        let active_route_id = catalog
            .first()
            .map(|route| route.id.clone())
            .ok_or(RouteError::EmptyCatalog)?;
        let animator = FlightAnimator::new(config, Arc::clone(&presenter))?;

        Ok(Self {
            catalog,
            presenter,
            animator,
            palette: ROUTE_PALETTE.iter().map(|c| c.to_string()).collect(),
            active_route_id,
            displayed_routes: HashMap::new(),
            no_fly_zone: None,
        })
    }

    /// Replace the show-all palette.
    pub fn with_palette(mut self, palette: Vec<String>) -> Result<Self> {
        if palette.is_empty() {
            return Err(RouteError::InvalidConfig("palette must not be empty".into()));
        }
        self.palette = palette;
        Ok(self)
    }

    pub fn catalog(&self) -> &RouteCatalog {
        &self.catalog
    }

    pub fn active_route_id(&self) -> &str {
        &self.active_route_id
    }

    pub fn active_route(&self) -> Result<&Route> {
        self.catalog.find_route(&self.active_route_id)
    }

    pub fn is_showing_all(&self) -> bool {
        !self.displayed_routes.is_empty()
    }

    /// Displayed routes and their styles, in catalog order.
    pub fn displayed_routes(&self) -> Vec<(String, RouteStyle)> {
        self.catalog
            .list_routes()
            .iter()
            .filter_map(|route| {
                self.displayed_routes
                    .get(&route.id)
                    .map(|style| (route.id.clone(), style.clone()))
            })
            .collect()
    }

    pub fn no_fly_zone(&self) -> Option<&NoFlyZone> {
        self.no_fly_zone.as_ref()
    }

    pub fn animation_state(&self) -> AnimationState {
        self.animator.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<AnimationState> {
        self.animator.subscribe()
    }

    /// Draw the active route and fly it from the first waypoint.
    ///
    /// Fails with [`RouteError::NoRuntime`] outside a tokio runtime.
    pub fn start_flight(&mut self) -> Result<Route> {
        let route = self.active_route()?.clone();
        self.animator.start(route.clone())?;
        self.render_active(&route);
        Ok(route)
    }

    /// Stop the flight. Returns `false` when nothing was flying.
    pub fn cancel_flight(&mut self) -> bool {
        self.animator.cancel()
    }

    /// Make `id` the active route and restart the flight on it.
    ///
    /// An unknown id, or a call made outside a tokio runtime
    /// ([`RouteError::NoRuntime`]), leaves the active route, the animation
    /// and the drawn routes untouched.
    pub fn switch_active_route(&mut self, id: &str) -> Result<Route> {
        let route = match self.catalog.find_route(id) {
            Ok(route) => route.clone(),
            Err(e) => {
                tracing::warn!(route_id = %id, "Cannot switch to unknown route");
                return Err(e);
            }
        };

        self.animator.start(route.clone())?;
        self.active_route_id = route.id.clone();

        if self.is_showing_all() {
            self.highlight_active();
        } else {
            self.render_active(&route);
        }

        tracing::info!(route_id = %route.id, "Switched active route");
        Ok(route)
    }

    /// Draw every catalog route in its palette color, replacing whatever
    /// was drawn before.
    pub fn show_all_routes(&mut self) -> Vec<(String, RouteStyle)> {
        self.presenter.remove_all_route_layers();
        self.displayed_routes.clear();

        for (index, route) in self.catalog.list_routes().iter().enumerate() {
            let color = palette_color(self.palette.as_slice(), index);
            let style = RouteStyle::new(color, OVERLAY_ROUTE_WIDTH);
            self.presenter
                .set_route_geometry(&route.id, &route.waypoints, &style);
            self.displayed_routes.insert(route.id.clone(), style);
        }

        tracing::debug!(routes = self.displayed_routes.len(), "Showing all routes");
        self.displayed_routes()
    }

    /// First route in catalog order with no segment touching the zone.
    pub fn find_feasible_route(&self, zone: &NoFlyZone) -> Option<&Route> {
        self.catalog
            .list_routes()
            .iter()
            .find(|route| !route_intersects_zone(route, zone))
    }

    /// Per-route intersection report, in catalog order.
    pub fn feasibility(&self, zone: &NoFlyZone) -> Vec<RouteFeasibility> {
        self.catalog
            .list_routes()
            .iter()
            .map(|route| RouteFeasibility {
                route_id: route.id.clone(),
                intersects: route_intersects_zone(route, zone),
                waypoints_in_zone: waypoints_in_zone(route, zone),
            })
            .collect()
    }

    /// Put a no-fly zone on the map and overlay all routes against it.
    pub fn add_no_fly_zone(&mut self, zone: NoFlyZone) {
        tracing::info!(
            x = zone.center().x,
            y = zone.center().y,
            radius = zone.radius(),
            "Adding no-fly zone"
        );
        self.presenter.show_no_fly_zone(&zone);
        self.no_fly_zone = Some(zone);
        self.show_all_routes();
    }

    /// Add the zone and switch to the first route that avoids it.
    ///
    /// Fails with [`RouteError::NoFeasibleRoute`] when every route touches
    /// the zone, or with [`RouteError::NoRuntime`] outside a tokio runtime.
    /// The zone stays drawn either way; the active route and animation are
    /// then left as they were.
    pub fn avoid_no_fly_zone(&mut self, zone: NoFlyZone) -> Result<Route> {
        self.add_no_fly_zone(zone);
        let Some(route_id) = self.find_feasible_route(&zone).map(|r| r.id.clone()) else {
            tracing::warn!("Every route crosses the no-fly zone");
            return Err(RouteError::NoFeasibleRoute);
        };
        self.switch_active_route(&route_id)
    }

    fn render_active(&self, route: &Route) {
        self.presenter.remove_all_route_layers();
        let style = RouteStyle::new(ACTIVE_ROUTE_COLOR, ACTIVE_ROUTE_WIDTH);
        self.presenter
            .set_route_geometry(&route.id, &route.waypoints, &style);
    }

    fn highlight_active(&mut self) {
        for route in self.catalog.list_routes() {
            let Some(style) = self.displayed_routes.get_mut(&route.id) else {
                continue;
            };
            *style = if route.id == self.active_route_id {
                RouteStyle::new(ACTIVE_ROUTE_COLOR, ACTIVE_ROUTE_WIDTH)
            } else {
                RouteStyle::new(INACTIVE_ROUTE_COLOR, INACTIVE_ROUTE_WIDTH)
            };
            self.presenter
                .set_route_geometry(&route.id, &route.waypoints, style);
        }
    }
}

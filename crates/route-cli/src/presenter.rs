//! Presentation adapter that renders to the log.

use route_core::{NoFlyZone, PresentationAdapter, RouteStyle, Waypoint};
use std::sync::atomic::{AtomicU64, Ordering};

/// Emits every map update as a structured tracing event.
#[derive(Debug, Default)]
pub struct TracingPresenter {
    markers: AtomicU64,
    recenters: AtomicU64,
}

impl TracingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker_updates(&self) -> u64 {
        self.markers.load(Ordering::Relaxed)
    }

    pub fn recenter_count(&self) -> u64 {
        self.recenters.load(Ordering::Relaxed)
    }
}

impl PresentationAdapter for TracingPresenter {
    fn set_marker_position(&self, coord: Waypoint) {
        self.markers.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(x = coord.x, y = coord.y, "Marker moved");
    }

    fn set_route_geometry(&self, route_id: &str, coordinates: &[Waypoint], style: &RouteStyle) {
        tracing::info!(
            route_id,
            points = coordinates.len(),
            color = %style.color,
            width = style.width,
            "Route layer drawn"
        );
    }

    fn recenter_view(&self, coord: Waypoint) {
        self.recenters.fetch_add(1, Ordering::Relaxed);
        tracing::info!(x = coord.x, y = coord.y, "View recentered");
    }

    fn remove_all_route_layers(&self) {
        tracing::debug!("Route layers cleared");
    }

    fn show_no_fly_zone(&self, zone: &NoFlyZone) {
        tracing::info!(
            x = zone.center().x,
            y = zone.center().y,
            radius = zone.radius(),
            "No-fly zone drawn"
        );
    }
}

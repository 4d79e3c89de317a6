//! Call contract toward the rendering surface.
//!
//! The core pushes marker positions, route geometry and camera hints through
//! [`PresentationAdapter`]; it never reads rendering state back.

use crate::models::{NoFlyZone, RouteStyle, Waypoint};
use std::sync::{Mutex, PoisonError};

/// Sink for everything the map needs to draw.
pub trait PresentationAdapter: Send + Sync {
    fn set_marker_position(&self, coord: Waypoint);

    fn set_route_geometry(&self, route_id: &str, coordinates: &[Waypoint], style: &RouteStyle);

    fn recenter_view(&self, coord: Waypoint);

    fn remove_all_route_layers(&self);

    /// Draw a no-fly zone overlay. Surfaces without overlays may ignore it.
    fn show_no_fly_zone(&self, _zone: &NoFlyZone) {}
}

/// One call made against a [`RecordingPresenter`].
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationEvent {
    Marker(Waypoint),
    RouteGeometry {
        route_id: String,
        coordinates: Vec<Waypoint>,
        style: RouteStyle,
    },
    Recenter(Waypoint),
    RemoveAllRouteLayers,
    NoFlyZone(NoFlyZone),
}

/// Presenter that keeps every call in memory, for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<PresentationEvent>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: PresentationEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    pub fn events(&self) -> Vec<PresentationEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain recorded events, leaving the log empty.
    pub fn take(&self) -> Vec<PresentationEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn marker_positions(&self) -> Vec<Waypoint> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PresentationEvent::Marker(coord) => Some(coord),
                _ => None,
            })
            .collect()
    }

    pub fn recenters(&self) -> Vec<Waypoint> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PresentationEvent::Recenter(coord) => Some(coord),
                _ => None,
            })
            .collect()
    }

    /// Route layers currently on the map, in the order they were drawn.
    pub fn route_layers(&self) -> Vec<(String, RouteStyle)> {
        let mut layers: Vec<(String, RouteStyle)> = Vec::new();
        for event in self.events() {
            match event {
                PresentationEvent::RemoveAllRouteLayers => layers.clear(),
                PresentationEvent::RouteGeometry { route_id, style, .. } => {
                    match layers.iter_mut().find(|(id, _)| *id == route_id) {
                        Some(layer) => layer.1 = style,
                        None => layers.push((route_id, style)),
                    }
                }
                _ => {}
            }
        }
        layers
    }
}

impl PresentationAdapter for RecordingPresenter {
    fn set_marker_position(&self, coord: Waypoint) {
        self.push(PresentationEvent::Marker(coord));
    }

    fn set_route_geometry(&self, route_id: &str, coordinates: &[Waypoint], style: &RouteStyle) {
        self.push(PresentationEvent::RouteGeometry {
            route_id: route_id.to_string(),
            coordinates: coordinates.to_vec(),
            style: style.clone(),
        });
    }

    fn recenter_view(&self, coord: Waypoint) {
        self.push(PresentationEvent::Recenter(coord));
    }

    fn remove_all_route_layers(&self) {
        self.push(PresentationEvent::RemoveAllRouteLayers);
    }

    fn show_no_fly_zone(&self, zone: &NoFlyZone) {
        self.push(PresentationEvent::NoFlyZone(*zone));
    }
}

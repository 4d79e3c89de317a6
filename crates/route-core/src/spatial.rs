//! Planar geometry for no-fly zone checks and waypoint interpolation.
//!
//! All inputs are projected map coordinates; nothing here knows about
//! latitude or longitude except the Web Mercator projection at the bottom.

use crate::models::{NoFlyZone, Route, Waypoint};
use std::f64::consts::PI;

/// Check if a point lies inside (or on the edge of) a circle.
///
/// A negative radius describes an empty zone and never contains anything.
pub fn point_in_circle(point: Waypoint, center: Waypoint, radius: f64) -> bool {
    if radius < 0.0 {
        return false;
    }
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    dx * dx + dy * dy <= radius * radius
}

/// Check if a segment touches a no-fly zone.
///
/// Only the endpoints are tested. A segment that passes through the zone
/// with both endpoints outside it is reported clear.
pub fn segment_intersects_zone(p1: Waypoint, p2: Waypoint, zone: &NoFlyZone) -> bool {
    point_in_circle(p1, zone.center(), zone.radius())
        || point_in_circle(p2, zone.center(), zone.radius())
}

/// Check every consecutive waypoint pair of a route against a zone.
pub fn route_intersects_zone(route: &Route, zone: &NoFlyZone) -> bool {
    route
        .waypoints
        .windows(2)
        .any(|pair| segment_intersects_zone(pair[0], pair[1], zone))
}

/// Indices of the waypoints that fall inside a zone.
pub fn waypoints_in_zone(route: &Route, zone: &NoFlyZone) -> Vec<usize> {
    route
        .waypoints
        .iter()
        .enumerate()
        .filter(|(_, wp)| point_in_circle(**wp, zone.center(), zone.radius()))
        .map(|(idx, _)| idx)
        .collect()
}

/// Linear interpolation between two waypoints, per axis.
///
/// `t == 0` returns `a` and `t == 1` returns `b` exactly, so markers land on
/// waypoints without floating-point drift.
pub fn lerp(a: Waypoint, b: Waypoint, t: f64) -> Waypoint {
    if t <= 0.0 {
        return a;
    }
    if t >= 1.0 {
        return b;
    }
    Waypoint {
        x: a.x + (b.x - a.x) * t,
        y: a.y + (b.y - a.y) * t,
    }
}

// ==== Projection ====

/// Maps geographic coordinates onto the projected map plane.
pub trait Projection: Send + Sync {
    fn project(&self, lon: f64, lat: f64) -> Waypoint;
}

/// Spherical Web Mercator (EPSG:3857), the projection slippy maps use.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

/// Sphere radius used by EPSG:3857.
pub const WEB_MERCATOR_RADIUS_M: f64 = 6_378_137.0;

/// Latitude beyond which Web Mercator is clamped.
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

impl Projection for WebMercator {
    fn project(&self, lon: f64, lat: f64) -> Waypoint {
        project_lon_lat(lon, lat)
    }
}

/// Project a lon/lat pair in degrees to Web Mercator meters.
pub fn project_lon_lat(lon: f64, lat: f64) -> Waypoint {
    let lat = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
    let x = WEB_MERCATOR_RADIUS_M * lon.to_radians();
    let y = WEB_MERCATOR_RADIUS_M * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
    Waypoint { x, y }
}

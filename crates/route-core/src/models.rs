//! Core data models for routes, zones and presentation styles.

use crate::error::{Result, RouteError};
use serde::{Deserialize, Serialize};

/// A point in the projected map coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
}

impl Waypoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Waypoint {
    fn from(coord: [f64; 2]) -> Self {
        Self::new(coord[0], coord[1])
    }
}

/// A named, ordered sequence of waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub waypoints: Vec<Waypoint>,
    /// Place names, one per waypoint when present
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl Route {
    /// Create a route, rejecting anything that cannot be animated.
    pub fn new(id: impl Into<String>, waypoints: Vec<Waypoint>) -> Result<Self> {
        let route = Self {
            id: id.into(),
            waypoints,
            labels: Vec::new(),
        };
        route.validate()?;
        Ok(route)
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Result<Self> {
        self.labels = labels;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.waypoints.len() < 2 {
            return Err(RouteError::InvalidRoute {
                id: self.id.clone(),
                reason: format!("needs at least 2 waypoints, got {}", self.waypoints.len()),
            });
        }
        if let Some(idx) = self.waypoints.iter().position(|wp| !wp.is_finite()) {
            return Err(RouteError::InvalidRoute {
                id: self.id.clone(),
                reason: format!("waypoint {idx} is not finite"),
            });
        }
        if !self.labels.is_empty() && self.labels.len() != self.waypoints.len() {
            return Err(RouteError::InvalidRoute {
                id: self.id.clone(),
                reason: format!(
                    "{} labels for {} waypoints",
                    self.labels.len(),
                    self.waypoints.len()
                ),
            });
        }
        Ok(())
    }

    pub fn segment_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Start and end of segment `index`.
    pub fn segment(&self, index: usize) -> Option<(Waypoint, Waypoint)> {
        let start = *self.waypoints.get(index)?;
        let end = *self.waypoints.get(index + 1)?;
        Some((start, end))
    }

    pub fn first(&self) -> Waypoint {
        self.waypoints[0]
    }

    pub fn last(&self) -> Waypoint {
        self.waypoints[self.waypoints.len() - 1]
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Human-readable name, e.g. `coastal route` for `coastal_route`.
    pub fn display_name(&self) -> String {
        self.id.replace('_', " ")
    }
}

/// Circular exclusion region in projected units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoFlyZone {
    center: Waypoint,
    radius: f64,
}

impl NoFlyZone {
    pub fn new(center: Waypoint, radius: f64) -> Result<Self> {
        if !center.is_finite() {
            return Err(RouteError::InvalidGeometry(format!(
                "zone center ({}, {}) is not finite",
                center.x, center.y
            )));
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(RouteError::InvalidGeometry(format!(
                "zone radius must be a non-negative number, got {radius}"
            )));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Waypoint {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

/// Stroke style for a route layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStyle {
    pub color: String,
    pub width: f64,
}

impl RouteStyle {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

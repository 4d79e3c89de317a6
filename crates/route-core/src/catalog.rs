//! Static catalog of named flight routes.

use crate::error::{Result, RouteError};
use crate::models::Route;
use crate::spatial::{Projection, WebMercator};
use std::collections::HashSet;

const SAN_FRANCISCO: (&str, f64, f64) = ("San Francisco", -122.4194, 37.7749);
const SAN_MATEO: (&str, f64, f64) = ("San Mateo", -122.3321, 37.5483);
const MOUNTAIN_VIEW: (&str, f64, f64) = ("Mountain View", -122.0819, 37.3541);
const SANTA_CRUZ: (&str, f64, f64) = ("Santa Cruz", -121.9552, 36.9741);
const MONTEREY: (&str, f64, f64) = ("Monterey", -121.8947, 36.6002);
const SAN_LUIS_OBISPO: (&str, f64, f64) = ("San Luis Obispo", -120.6596, 35.2828);
const SANTA_BARBARA: (&str, f64, f64) = ("Santa Barbara", -119.8871, 34.4208);
const OXNARD: (&str, f64, f64) = ("Oxnard", -119.2426, 34.2805);
const SANTA_MONICA: (&str, f64, f64) = ("Santa Monica", -118.7798, 34.0505);
const LOS_ANGELES: (&str, f64, f64) = ("Los Angeles", -118.2437, 34.0522);
const TRACY: (&str, f64, f64) = ("Tracy", -121.4944, 37.4419);
const MODESTO: (&str, f64, f64) = ("Modesto", -120.9969, 37.6213);
const MERCED: (&str, f64, f64) = ("Merced", -120.4829, 37.3021);
const FRESNO: (&str, f64, f64) = ("Fresno", -119.7871, 36.7378);
const VISALIA: (&str, f64, f64) = ("Visalia", -119.3157, 36.3302);
const BAKERSFIELD: (&str, f64, f64) = ("Bakersfield", -119.0187, 35.3733);
const LANCASTER: (&str, f64, f64) = ("Lancaster", -118.8597, 34.8233);
const SAN_FERNANDO: (&str, f64, f64) = ("San Fernando", -118.4412, 34.2164);
const STOCKTON: (&str, f64, f64) = ("Stockton", -121.2908, 37.9577);
const MADERA: (&str, f64, f64) = ("Madera", -120.0324, 36.9782);
const TEHACHAPI: (&str, f64, f64) = ("Tehachapi", -118.9859, 35.9957);
const GLENDALE: (&str, f64, f64) = ("Glendale", -118.3884, 34.1478);

type Place = (&'static str, f64, f64);

const BUILTIN_ROUTES: &[(&str, &[Place])] = &[
    (
        "coastal_route",
        &[
            SAN_FRANCISCO,
            SAN_MATEO,
            MOUNTAIN_VIEW,
            SANTA_CRUZ,
            MONTEREY,
            SAN_LUIS_OBISPO,
            SANTA_BARBARA,
            OXNARD,
            SANTA_MONICA,
            LOS_ANGELES,
        ],
    ),
    (
        "central_valley_route",
        &[
            SAN_FRANCISCO,
            TRACY,
            MODESTO,
            MERCED,
            FRESNO,
            VISALIA,
            BAKERSFIELD,
            LANCASTER,
            SAN_FERNANDO,
            LOS_ANGELES,
        ],
    ),
    (
        "eastern_route",
        &[
            SAN_FRANCISCO,
            STOCKTON,
            MODESTO,
            MADERA,
            FRESNO,
            TEHACHAPI,
            LANCASTER,
            SAN_FERNANDO,
            GLENDALE,
            LOS_ANGELES,
        ],
    ),
    (
        "hybrid_route",
        &[
            SAN_FRANCISCO,
            MOUNTAIN_VIEW,
            TRACY,
            MERCED,
            MADERA,
            VISALIA,
            BAKERSFIELD,
            TEHACHAPI,
            SANTA_MONICA,
            LOS_ANGELES,
        ],
    ),
];

/// Ordered, read-only set of routes.
#[derive(Debug, Clone)]
pub struct RouteCatalog {
    routes: Vec<Route>,
}

impl RouteCatalog {
    /// Build a catalog, validating every route and rejecting duplicate ids.
    /// At least one route is required.
    pub fn new(routes: Vec<Route>) -> Result<Self> {
        if routes.is_empty() {
            return Err(RouteError::EmptyCatalog);
        }
        let mut seen = HashSet::with_capacity(routes.len());
        for route in &routes {
            route.validate()?;
            if !seen.insert(route.id.as_str()) {
                return Err(RouteError::DuplicateRoute(route.id.clone()));
            }
        }
        Ok(Self { routes })
    }

    /// The compiled-in San Francisco to Los Angeles routes, in Web Mercator.
    pub fn builtin() -> Self {
        Self::builtin_with(&WebMercator)
    }

    /// The compiled-in routes projected with a caller-supplied transform.
    pub fn builtin_with(projection: &dyn Projection) -> Self {
        let routes = BUILTIN_ROUTES
            .iter()
            .map(|(id, places)| Route {
                id: (*id).to_string(),
                waypoints: places
                    .iter()
                    .map(|(_, lon, lat)| projection.project(*lon, *lat))
                    .collect(),
                labels: places.iter().map(|(name, _, _)| (*name).to_string()).collect(),
            })
            .collect();
        Self { routes }
    }

    pub fn list_routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn find_route(&self, id: &str) -> Result<&Route> {
        self.routes
            .iter()
            .find(|route| route.id == id)
            .ok_or_else(|| RouteError::RouteNotFound(id.to_string()))
    }

    pub fn first(&self) -> Option<&Route> {
        self.routes.first()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RouteCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

//! Error types for route lookup, zone validation and animation setup.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouteError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("route not found: {0}")]
    RouteNotFound(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid route {id}: {reason}")]
    InvalidRoute { id: String, reason: String },

    #[error("duplicate route id: {0}")]
    DuplicateRoute(String),

    #[error("route catalog is empty")]
    EmptyCatalog,

    /// Every route in the catalog touches the no-fly zone.
    #[error("no feasible route avoids the no-fly zone")]
    NoFeasibleRoute,

    #[error("invalid animator config: {0}")]
    InvalidConfig(String),

    /// The animation timer needs a tokio runtime on the calling thread.
    #[error("no tokio runtime available to drive the flight animation")]
    NoRuntime,
}

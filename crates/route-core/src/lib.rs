pub mod animator;
pub mod catalog;
pub mod error;
pub mod models;
pub mod presenter;
pub mod selector;
pub mod spatial;

pub use animator::{
    position_at, AnimationState, AnimationStatus, AnimatorConfig, FlightAnimator, FlightPlayback,
    Tick,
};
pub use catalog::RouteCatalog;
pub use error::{Result, RouteError};
pub use models::{NoFlyZone, Route, RouteStyle, Waypoint};
pub use presenter::{PresentationAdapter, PresentationEvent, RecordingPresenter};
pub use selector::{palette_color, RouteFeasibility, RouteSelector, ROUTE_PALETTE};
pub use spatial::{
    point_in_circle, project_lon_lat, route_intersects_zone, segment_intersects_zone,
    Projection, WebMercator,
};

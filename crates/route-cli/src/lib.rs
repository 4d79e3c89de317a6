//! Flight route simulator command line support.
//!
//! - config: environment configuration for the animator
//! - presenter: tracing-backed map adapter
//! - flight: drive a flight to completion

pub mod config;
pub mod flight;
pub mod presenter;

pub use config::Config;
pub use flight::{fly_until_done, FlightSummary, SwitchPlan};
pub use presenter::TracingPresenter;

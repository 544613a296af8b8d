//! `ClimateLens` - live weather and air-quality dashboard with a simple
//! future-climate projection
//!
//! This library provides the projection engine, the observation fetcher,
//! the view synchronizer contracts and the HTTP surface serving the
//! browser dashboard.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod models;
pub mod projection;
pub mod session;
pub mod view;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::ClimateLensConfig;
pub use dashboard::{CycleOutcome, Dashboard, DashboardEvent};
pub use error::ClimateLensError;
pub use models::{City, CityRegistry, Coordinates, LiveObservation, Scenario, TargetYear};
pub use projection::{ProjectionEngine, ProjectionResult};
pub use session::Session;
pub use view::{ControlSurface, MapView, ViewSynchronizer};
pub use weather::{HttpObservationFetcher, ObservationFetcher};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ClimateLensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

//! Data models for the `ClimateLens` dashboard
//!
//! - City: registry of selectable places with coordinates and coastal flag
//! - Observation: live weather and air-quality reading
//! - Scenario: scenario severity and target year selections

pub mod city;
pub mod observation;
pub mod scenario;

pub use city::{City, CityRegistry, Coordinates};
pub use observation::{FALLBACK_AQI, LiveObservation};
pub use scenario::{Scenario, TargetYear};

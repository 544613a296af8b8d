//! Projection Engine
//!
//! Derives the "future" metrics shown on the dashboard from a live reading
//! and the user's city, year and scenario selection. The model is a plain
//! multiplier transform: a severity coefficient (year factor times scenario
//! multiplier) scales temperature, AQI and sea level. Safety, risk and food
//! security depend on the scenario alone.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{City, CityRegistry, Coordinates, Scenario, TargetYear};

const FAR_FUTURE_FACTOR: f64 = 2.5;
const NEAR_TERM_FACTOR: f64 = 1.1;
const HIGH_MULTIPLIER: f64 = 2.2;
const LOW_MULTIPLIER: f64 = 0.4;
const HIGH_AQI_FACTOR: f64 = 1.9;
const LOW_AQI_FACTOR: f64 = 0.6;
/// °C of warming per unit of severity
const WARMING_PER_SEVERITY: f64 = 1.8;
/// Metres of sea-level rise per unit of severity
const SEA_RISE_PER_SEVERITY: f64 = 0.4;

/// Projected sea-level change for a city
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "metres", rename_all = "lowercase")]
pub enum SeaLevelDelta {
    /// Rise in metres, rounded to one decimal
    Rise(f64),
    /// Inland city, no numeric projection
    Stable,
}

impl fmt::Display for SeaLevelDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeaLevelDelta::Rise(metres) => write!(f, "+{metres:.1}m"),
            SeaLevelDelta::Stable => f.write_str("STABLE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FoodSecurity {
    Critical,
    Secure,
}

impl fmt::Display for FoodSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FoodSecurity::Critical => "CRITICAL",
            FoodSecurity::Secure => "SECURE",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Safety {
    Unsafe,
    Stable,
}

impl fmt::Display for Safety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Safety::Unsafe => "UNSAFE",
            Safety::Stable => "STABLE",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLabel {
    Extreme,
    Minimal,
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLabel::Extreme => "EXTREME",
            RiskLabel::Minimal => "MINIMAL",
        })
    }
}

/// Output of one projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub city: String,
    pub coordinates: Coordinates,
    pub year: TargetYear,
    pub scenario: Scenario,
    /// Year factor times scenario multiplier
    pub severity_coefficient: f64,
    /// Projected temperature in Celsius, rounded to one decimal
    pub future_temperature: f64,
    pub future_aqi: u32,
    pub sea_level: SeaLevelDelta,
    pub food_security: FoodSecurity,
    pub safety: Safety,
    pub risk: RiskLabel,
}

impl ProjectionResult {
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.future_temperature)
    }

    #[must_use]
    pub fn format_risk_alert(&self) -> String {
        format!("RISK LEVEL: {}", self.risk)
    }
}

#[must_use]
pub fn year_factor(year: TargetYear) -> f64 {
    if year.is_far_future() {
        FAR_FUTURE_FACTOR
    } else {
        NEAR_TERM_FACTOR
    }
}

#[must_use]
pub fn scenario_multiplier(scenario: Scenario) -> f64 {
    match scenario {
        Scenario::High => HIGH_MULTIPLIER,
        Scenario::Low => LOW_MULTIPLIER,
    }
}

#[must_use]
pub fn severity_coefficient(year: TargetYear, scenario: Scenario) -> f64 {
    year_factor(year) * scenario_multiplier(scenario)
}

/// Observed temperature plus warming for the given severity, one decimal
#[must_use]
pub fn future_temperature(observed: f64, severity: f64) -> f64 {
    round_to_tenth(observed + severity * WARMING_PER_SEVERITY)
}

#[must_use]
pub fn future_aqi(observed: u32, scenario: Scenario) -> u32 {
    let factor = match scenario {
        Scenario::High => HIGH_AQI_FACTOR,
        Scenario::Low => LOW_AQI_FACTOR,
    };
    (f64::from(observed) * factor).round() as u32
}

#[must_use]
pub fn sea_level_delta(coastal: bool, severity: f64) -> SeaLevelDelta {
    if coastal {
        SeaLevelDelta::Rise(round_to_tenth(severity * SEA_RISE_PER_SEVERITY))
    } else {
        SeaLevelDelta::Stable
    }
}

/// Scenario-only classification: (food security, safety, risk)
#[must_use]
pub fn classify(scenario: Scenario) -> (FoodSecurity, Safety, RiskLabel) {
    match scenario {
        Scenario::High => (FoodSecurity::Critical, Safety::Unsafe, RiskLabel::Extreme),
        Scenario::Low => (FoodSecurity::Secure, Safety::Stable, RiskLabel::Minimal),
    }
}

/// Project a resolved city. Pure and infallible.
#[must_use]
pub fn project_city(
    city: &City,
    observed_temperature: f64,
    observed_aqi: u32,
    year: TargetYear,
    scenario: Scenario,
) -> ProjectionResult {
    let severity = severity_coefficient(year, scenario);
    let (food_security, safety, risk) = classify(scenario);

    ProjectionResult {
        city: city.name.clone(),
        coordinates: city.coordinates,
        year,
        scenario,
        severity_coefficient: severity,
        future_temperature: future_temperature(observed_temperature, severity),
        future_aqi: future_aqi(observed_aqi, scenario),
        sea_level: sea_level_delta(city.coastal, severity),
        food_security,
        safety,
        risk,
    }
}

/// Projection engine bound to a city registry
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    registry: CityRegistry,
}

impl ProjectionEngine {
    #[must_use]
    pub fn new(registry: CityRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &CityRegistry {
        &self.registry
    }

    /// Project the future state of `city`.
    ///
    /// Fails with [`crate::ClimateLensError::CityNotFound`] when the city is
    /// not in the registry.
    pub fn project(
        &self,
        city: &str,
        observed_temperature: f64,
        observed_aqi: u32,
        year: TargetYear,
        scenario: Scenario,
    ) -> crate::Result<ProjectionResult> {
        let city = self.registry.lookup(city)?;
        Ok(project_city(
            city,
            observed_temperature,
            observed_aqi,
            year,
            scenario,
        ))
    }
}

/// Round to one decimal from the exact binary value, the way the dashboard has
/// always displayed figures: -18.15 is stored just above -18.15 and shows as
/// -18.1. Exact ties (multiples of 0.05 that are also multiples of 0.25) go
/// away from zero.
fn round_to_tenth(value: f64) -> f64 {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return (value * 10.0).round() / 10.0;
    }
    format!("{value:.1}").parse().unwrap_or(value)
}

//! Dashboard session state
//!
//! Holds what the browser original kept in globals: the selected scenario
//! and the last known live temperature. Only the dashboard dispatcher
//! mutates it; the projection engine never sees it.

use crate::models::{LiveObservation, Scenario};

#[derive(Debug, Clone)]
pub struct Session {
    scenario: Scenario,
    last_temperature: f64,
    last_observation: Option<CachedObservation>,
    cycles: u64,
}

#[derive(Debug, Clone)]
struct CachedObservation {
    city: String,
    observation: LiveObservation,
}

impl Session {
    #[must_use]
    pub fn new(scenario: Scenario, initial_temperature: f64) -> Self {
        Self {
            scenario,
            last_temperature: initial_temperature,
            last_observation: None,
            cycles: 0,
        }
    }

    #[must_use]
    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    pub fn set_scenario(&mut self, scenario: Scenario) {
        self.scenario = scenario;
    }

    /// Temperature of the most recent successful fetch, or the initial value
    #[must_use]
    pub fn last_temperature(&self) -> f64 {
        self.last_temperature
    }

    /// Remember a successful reading. Supersedes any earlier one.
    pub fn record_observation(&mut self, city: &str, observation: LiveObservation) {
        self.last_temperature = observation.temperature;
        self.last_observation = Some(CachedObservation {
            city: city.to_string(),
            observation,
        });
    }

    /// Last successful reading if it belongs to `city`
    #[must_use]
    pub fn observation_for(&self, city: &str) -> Option<&LiveObservation> {
        self.last_observation
            .as_ref()
            .filter(|cached| cached.city.eq_ignore_ascii_case(city))
            .map(|cached| &cached.observation)
    }

    /// Start a new update cycle and return its sequence number
    pub fn begin_cycle(&mut self) -> u64 {
        self.cycles += 1;
        self.cycles
    }

    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Scenario::Low, 25.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let session = Session::default();
        assert_eq!(session.scenario(), Scenario::Low);
        assert_eq!(session.last_temperature(), 25.0);
        assert!(session.observation_for("Delhi").is_none());
        assert_eq!(session.cycles(), 0);
    }

    #[test]
    fn test_record_observation_updates_temperature() {
        let mut session = Session::default();
        session.record_observation("Delhi", LiveObservation::new(33.2, 40.0, 2.1, Some(180)));

        assert_eq!(session.last_temperature(), 33.2);
        assert_eq!(
            session.observation_for("delhi").map(|o| o.air_quality_index),
            Some(Some(180))
        );
        assert!(session.observation_for("Mumbai").is_none());
    }

    #[test]
    fn test_newer_observation_supersedes() {
        let mut session = Session::default();
        session.record_observation("Delhi", LiveObservation::new(33.2, 40.0, 2.1, Some(180)));
        session.record_observation("Mumbai", LiveObservation::new(29.0, 80.0, 5.0, None));

        assert_eq!(session.last_temperature(), 29.0);
        assert!(session.observation_for("Delhi").is_none());
        assert!(session.observation_for("Mumbai").is_some());
    }

    #[test]
    fn test_cycles_increase() {
        let mut session = Session::default();
        assert_eq!(session.begin_cycle(), 1);
        assert_eq!(session.begin_cycle(), 2);
        assert_eq!(session.cycles(), 2);
    }
}

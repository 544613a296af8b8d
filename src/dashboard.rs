//! Dashboard event dispatcher
//!
//! Each user interaction runs one cycle: fetch (or reuse) a live reading,
//! project it, render the result. Transient fetch failures, slow providers
//! included, degrade to fallback values and a ticker message. An unknown city
//! refuses the update and leaves the previous render untouched.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::ClimateLensConfig;
use crate::models::{FALLBACK_AQI, LiveObservation, Scenario};
use crate::projection::{ProjectionEngine, ProjectionResult};
use crate::session::Session;
use crate::view::{ControlSurface, MapView, ViewSynchronizer, ticker};
use crate::weather::ObservationFetcher;
use crate::{ClimateLensError, Result};

/// Fetch deadline used when none is configured
const DEFAULT_FETCH_DEADLINE: Duration = Duration::from_secs(30);

/// User interactions that trigger an update cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DashboardEvent {
    /// Initial page load, shows the configured default city
    Load,
    CityChanged { city: String },
    YearChanged,
    ScenarioToggled { scenario: Scenario },
}

/// What one cycle produced
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub cycle: u64,
    pub projection: ProjectionResult,
    /// Reading used, `None` when the fetch failed and fallbacks were used
    pub observation: Option<LiveObservation>,
    pub link_healthy: bool,
}

pub struct Dashboard<F> {
    fetcher: F,
    engine: ProjectionEngine,
    view: ViewSynchronizer,
    session: Session,
    default_city: String,
    fetch_deadline: Duration,
}

impl<F: ObservationFetcher> Dashboard<F> {
    pub fn new(
        fetcher: F,
        engine: ProjectionEngine,
        view: ViewSynchronizer,
        session: Session,
        default_city: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            engine,
            view,
            session,
            default_city: default_city.into(),
            fetch_deadline: DEFAULT_FETCH_DEADLINE,
        }
    }

    /// Give up on a live reading after `deadline` and degrade to fallbacks
    #[must_use]
    pub fn with_fetch_deadline(mut self, deadline: Duration) -> Self {
        self.fetch_deadline = deadline;
        self
    }

    pub fn from_config(config: &ClimateLensConfig, fetcher: F) -> Self {
        Self::new(
            fetcher,
            ProjectionEngine::new(config.city_registry()),
            ViewSynchronizer::from_config(config),
            Session::new(
                config.dashboard.default_scenario,
                config.dashboard.initial_temperature,
            ),
            config.dashboard.default_city.clone(),
        )
        .with_fetch_deadline(config.providers.fetch_deadline())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Run one update cycle for `event`.
    #[instrument(skip(self, surface, map), fields(cycle = tracing::field::Empty))]
    pub async fn handle<S, M>(
        &mut self,
        event: DashboardEvent,
        surface: &mut S,
        map: &mut M,
    ) -> Result<CycleOutcome>
    where
        S: ControlSurface + Send,
        M: MapView + Send,
    {
        let (requested, refetch) = match &event {
            DashboardEvent::Load => (self.default_city.clone(), true),
            DashboardEvent::CityChanged { city } => (city.clone(), true),
            DashboardEvent::YearChanged => (surface.selected_city(), false),
            DashboardEvent::ScenarioToggled { scenario } => {
                self.session.set_scenario(*scenario);
                (surface.selected_city(), false)
            }
        };

        let city = match self.engine.registry().lookup(&requested) {
            Ok(city) => city.name.clone(),
            Err(e) => {
                warn!("Refusing update: {}", e);
                return Err(e);
            }
        };
        let year = surface.selected_year();
        let cycle = self.session.begin_cycle();
        tracing::Span::current().record("cycle", cycle);

        self.view
            .render_ticker(surface, &ticker::calibrating(&city));

        let (temperature, aqi, observation) = match self.reading(&city, refetch).await {
            Ok(observation) => {
                self.view.render_live(surface, &observation);
                (
                    observation.temperature,
                    observation.effective_aqi(),
                    Some(observation),
                )
            }
            Err(e) if e.is_transient() => {
                warn!("Live reading for {} unavailable, using fallbacks: {}", city, e);
                self.view.render_ticker(surface, ticker::LINK_ERROR);
                (self.session.last_temperature(), FALLBACK_AQI, None)
            }
            Err(e) => {
                warn!("Cycle {} aborted: {}", cycle, e);
                return Err(e);
            }
        };
        let link_healthy = observation.is_some();

        let projection =
            self.engine
                .project(&city, temperature, aqi, year, self.session.scenario())?;
        self.view.render_projection(surface, map, &projection);

        if link_healthy {
            self.view.render_ticker(surface, ticker::COMPLETE);
        }

        info!(
            "Cycle {} projected {} {} ({}): {} AQI {} sea {}",
            cycle,
            city,
            year,
            projection.scenario,
            projection.format_temperature(),
            projection.future_aqi,
            projection.sea_level
        );

        Ok(CycleOutcome {
            cycle,
            projection,
            observation,
            link_healthy,
        })
    }

    /// Fetch a fresh reading, or reuse the last one for `city` when allowed
    async fn reading(&mut self, city: &str, refetch: bool) -> Result<LiveObservation> {
        if !refetch {
            if let Some(observation) = self.session.observation_for(city) {
                debug!("Reusing last reading for {}", city);
                return Ok(observation.clone());
            }
        }

        let observation = tokio::time::timeout(self.fetch_deadline, self.fetcher.fetch(city))
            .await
            .map_err(|_| {
                ClimateLensError::api(format!(
                    "no reading for {city} within {}s",
                    self.fetch_deadline.as_secs()
                ))
            })??;
        self.session.record_observation(city, observation.clone());
        Ok(observation)
    }
}

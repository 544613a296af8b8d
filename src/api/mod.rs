//! JSON API consumed by the browser dashboard

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::error;

use crate::ClimateLensError;
use crate::config::{ClimateLensConfig, MapConfig};
use crate::dashboard::{Dashboard, DashboardEvent};
use crate::models::{City, Scenario, TargetYear};
use crate::weather::ObservationFetcher;

pub mod frame;

use frame::{Frame, FrameMap, FrameSurface};

/// Static data the browser needs before the first update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bootstrap {
    pub cities: Vec<City>,
    pub years: Vec<TargetYear>,
    pub default_city: String,
    pub default_year: TargetYear,
    pub default_scenario: Scenario,
    pub map: MapConfig,
}

impl Bootstrap {
    #[must_use]
    pub fn from_config(config: &ClimateLensConfig) -> Self {
        Self {
            cities: config.city_registry().iter().cloned().collect(),
            years: TargetYear::SELECTABLE.to_vec(),
            default_city: config.dashboard.default_city.clone(),
            default_year: config.dashboard.default_year,
            default_scenario: config.dashboard.default_scenario,
            map: config.map.clone(),
        }
    }
}

/// One user interaction plus the current form selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRequest {
    pub event: DashboardEvent,
    pub city: String,
    pub year: TargetYear,
}

/// Shared server state. The dashboard sits behind an async mutex so update
/// cycles never overlap.
pub struct AppState<F> {
    dashboard: Arc<Mutex<Dashboard<F>>>,
    bootstrap: Arc<Bootstrap>,
    request_timeout: Duration,
}

impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            dashboard: Arc::clone(&self.dashboard),
            bootstrap: Arc::clone(&self.bootstrap),
            request_timeout: self.request_timeout,
        }
    }
}

impl<F: ObservationFetcher> AppState<F> {
    pub fn new(config: &ClimateLensConfig, fetcher: F) -> Self {
        Self {
            dashboard: Arc::new(Mutex::new(Dashboard::from_config(config, fetcher))),
            bootstrap: Arc::new(Bootstrap::from_config(config)),
            request_timeout: config.server.request_timeout(&config.providers),
        }
    }
}

impl<F> AppState<F> {
    /// Budget for answering one request, longer than a whole fetch cycle
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

pub fn router<F>(state: AppState<F>) -> Router
where
    F: ObservationFetcher + Send + Sync + 'static,
{
    Router::new()
        .route("/bootstrap", get(bootstrap::<F>))
        .route("/events", post(dispatch::<F>))
        .with_state(state)
}

async fn bootstrap<F>(State(state): State<AppState<F>>) -> Json<Bootstrap>
where
    F: ObservationFetcher + Send + Sync + 'static,
{
    Json(state.bootstrap.as_ref().clone())
}

async fn dispatch<F>(
    State(state): State<AppState<F>>,
    Json(request): Json<EventRequest>,
) -> Result<Json<Frame>, ApiError>
where
    F: ObservationFetcher + Send + Sync + 'static,
{
    let mut surface = FrameSurface::new(request.city, request.year);
    let mut map = FrameMap::default();

    let mut dashboard = state.dashboard.lock().await;
    let outcome = dashboard
        .handle(request.event, &mut surface, &mut map)
        .await?;
    let scenario = dashboard.session().scenario();

    Ok(Json(Frame::assemble(
        outcome.cycle,
        scenario,
        outcome.link_healthy,
        surface,
        map,
    )))
}

/// Maps crate errors onto HTTP responses
pub struct ApiError(ClimateLensError);

impl From<ClimateLensError> for ApiError {
    fn from(err: ClimateLensError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ClimateLensError::CityNotFound { .. } => StatusCode::NOT_FOUND,
            ClimateLensError::Validation { .. } => StatusCode::BAD_REQUEST,
            ClimateLensError::Api { .. } | ClimateLensError::MalformedResponse { .. } => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let body = Json(json!({
            "error": self.0.user_message(),
            "detail": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

use anyhow::{Context, Result};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::{self, AppState};
use crate::config::ClimateLensConfig;
use crate::weather::{HttpObservationFetcher, ObservationFetcher};

/// Full application: `/api` routes plus the static frontend
pub fn app<F>(state: AppState<F>, static_dir: &str) -> Router
where
    F: ObservationFetcher + Send + Sync + 'static,
{
    let request_timeout = state.request_timeout();
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(state))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(cors),
        )
}

pub async fn run(config: &ClimateLensConfig) -> Result<()> {
    if config.providers.weather_api_key.is_none() || config.providers.air_quality_token.is_none() {
        warn!("Provider credentials missing, live readings will fall back to defaults");
    }

    let fetcher = HttpObservationFetcher::new(config.providers.clone())
        .context("Failed to set up observation fetcher")?;
    let state = AppState::new(config, fetcher);
    let app = app(state, &config.server.static_dir);

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Dashboard running at http://localhost:{}", config.server.port);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

//! Observation Fetcher
//!
//! Retrieves the live reading for a city from two providers: current
//! weather (temperature, humidity, wind) and an air-quality index. Both
//! requests are issued concurrently and joined before a reading is built.

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::config::ProvidersConfig;
use crate::models::LiveObservation;
use crate::{ClimateLensError, Result};

pub mod openweather;
pub mod waqi;

/// Source of live readings
pub trait ObservationFetcher {
    /// Fetch the current reading for `city`. Any failure (transport, status,
    /// unparsable body, missing credentials) is reported as an error; the
    /// caller decides how to degrade.
    fn fetch(&self, city: &str) -> impl Future<Output = Result<LiveObservation>> + Send;
}

/// Fetcher backed by the OpenWeatherMap and WAQI HTTP APIs
pub struct HttpObservationFetcher {
    client: ClientWithMiddleware,
    providers: ProvidersConfig,
}

impl HttpObservationFetcher {
    pub fn new(providers: ProvidersConfig) -> Result<Self> {
        let timeout = Duration::from_secs(providers.timeout_seconds.into());

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ClimateLens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClimateLensError::config(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(providers.max_retries);
        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { client, providers })
    }

    #[must_use]
    pub fn weather_url(&self, city: &str, api_key: &str) -> String {
        format!(
            "{}/weather?q={}&units=metric&appid={}",
            self.providers.weather_base_url.trim_end_matches('/'),
            urlencoding::encode(city),
            api_key
        )
    }

    #[must_use]
    pub fn air_quality_url(&self, city: &str, token: &str) -> String {
        format!(
            "{}/feed/{}/?token={}",
            self.providers.air_quality_base_url.trim_end_matches('/'),
            urlencoding::encode(city),
            token
        )
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        let api_key = self
            .providers
            .weather_api_key
            .as_deref()
            .ok_or_else(|| ClimateLensError::config("Missing weather API key"))?;
        let token = self
            .providers
            .air_quality_token
            .as_deref()
            .ok_or_else(|| ClimateLensError::config("Missing air-quality token"))?;
        Ok((api_key, token))
    }

    async fn get_json<T: DeserializeOwned>(&self, provider: &str, url: &str) -> Result<T> {
        let start = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!("{} responded with {} in {:.3}s", provider, status, start.elapsed().as_secs_f64());

        let body = response.error_for_status()?.json::<T>().await?;
        Ok(body)
    }
}

impl ObservationFetcher for HttpObservationFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, city: &str) -> Result<LiveObservation> {
        let (api_key, token) = self.credentials()?;
        let start = Instant::now();

        let weather_url = self.weather_url(city, api_key);
        let air_quality_url = self.air_quality_url(city, token);

        let (weather, air_quality) = futures::try_join!(
            self.get_json::<openweather::CurrentWeather>("weather provider", &weather_url),
            self.get_json::<waqi::FeedResponse>("air-quality provider", &air_quality_url),
        )?;

        let aqi = air_quality.aqi()?;
        if aqi.is_none() {
            warn!("No usable AQI reported for {}", city);
        }

        let observation = weather.into_observation(aqi);
        info!(
            "Fetched live reading for {} in {:.3}s: {:.1}°C, AQI {:?}",
            city,
            start.elapsed().as_secs_f64(),
            observation.temperature,
            observation.air_quality_index
        );
        Ok(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(providers: ProvidersConfig) -> HttpObservationFetcher {
        HttpObservationFetcher::new(providers).unwrap()
    }

    #[test]
    fn test_provider_urls() {
        let fetcher = fetcher(ProvidersConfig::default());
        assert_eq!(
            fetcher.weather_url("Delhi", "k3y"),
            "https://api.openweathermap.org/data/2.5/weather?q=Delhi&units=metric&appid=k3y"
        );
        assert_eq!(
            fetcher.air_quality_url("Delhi", "t0ken"),
            "https://api.waqi.info/feed/Delhi/?token=t0ken"
        );
    }

    #[test]
    fn test_city_is_url_encoded() {
        let mut providers = ProvidersConfig::default();
        providers.air_quality_base_url = "http://localhost:9000/".to_string();
        let fetcher = fetcher(providers);
        assert_eq!(
            fetcher.air_quality_url("New Delhi", "t"),
            "http://localhost:9000/feed/New%20Delhi/?token=t"
        );
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_without_network() {
        let fetcher = fetcher(ProvidersConfig::default());
        let err = fetcher.fetch("Delhi").await.unwrap_err();
        assert!(matches!(err, ClimateLensError::Config { .. }));
        assert!(err.is_transient());
    }
}

//! Live observation model and display formatting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Air-quality index used whenever the provider has no usable reading
pub const FALLBACK_AQI: u32 = 60;

/// One reading from the weather and air-quality providers
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LiveObservation {
    /// When the reading was fetched
    pub timestamp: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Air-quality index, `None` when the station reported nothing usable
    pub air_quality_index: Option<u32>,
}

impl LiveObservation {
    #[must_use]
    pub fn new(temperature: f64, humidity: f64, wind_speed: f64, aqi: Option<u32>) -> Self {
        Self {
            timestamp: Utc::now(),
            temperature,
            humidity,
            wind_speed,
            air_quality_index: aqi,
        }
    }

    /// AQI to display and project with
    #[must_use]
    pub fn effective_aqi(&self) -> u32 {
        self.air_quality_index.unwrap_or(FALLBACK_AQI)
    }

    /// Temperature rounded to a whole degree, halves rounding up
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", round_half_up(self.temperature))
    }

    #[must_use]
    pub fn format_humidity(&self) -> String {
        format!("{}%", self.humidity)
    }

    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{}m/s", self.wind_speed)
    }

    #[must_use]
    pub fn format_aqi(&self) -> String {
        self.effective_aqi().to_string()
    }
}

/// Round to the nearest integer with ties going towards positive infinity
#[must_use]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(temperature: f64, aqi: Option<u32>) -> LiveObservation {
        LiveObservation::new(temperature, 65.0, 3.6, aqi)
    }

    #[test]
    fn test_effective_aqi_falls_back() {
        assert_eq!(observation(25.0, Some(142)).effective_aqi(), 142);
        assert_eq!(observation(25.0, None).effective_aqi(), FALLBACK_AQI);
        assert_eq!(observation(25.0, Some(0)).effective_aqi(), 0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(24.5), 25);
        assert_eq!(round_half_up(24.49), 24);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
    }

    #[test]
    fn test_display_formatting() {
        let obs = observation(31.56, None);
        assert_eq!(obs.format_temperature(), "32°C");
        assert_eq!(obs.format_humidity(), "65%");
        assert_eq!(obs.format_wind(), "3.6m/s");
        assert_eq!(obs.format_aqi(), "60");
    }
}

//! Current-weather response from OpenWeatherMap (`/weather`, metric units)

use serde::Deserialize;

use crate::models::LiveObservation;

#[derive(Debug, Deserialize)]
pub struct CurrentWeather {
    pub main: MainReadings,
    pub wind: Wind,
}

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

impl CurrentWeather {
    #[must_use]
    pub fn into_observation(self, aqi: Option<u32>) -> LiveObservation {
        LiveObservation::new(self.main.temp, self.main.humidity, self.wind.speed, aqi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_current_weather() {
        let body = r#"{
            "coord": {"lon": 77.2167, "lat": 28.6667},
            "weather": [{"id": 721, "main": "Haze", "description": "haze"}],
            "main": {"temp": 31.05, "feels_like": 33.1, "pressure": 1004, "humidity": 58},
            "wind": {"speed": 3.6, "deg": 270},
            "name": "Delhi"
        }"#;
        let weather: CurrentWeather = serde_json::from_str(body).unwrap();
        let observation = weather.into_observation(Some(154));
        assert_eq!(observation.temperature, 31.05);
        assert_eq!(observation.humidity, 58.0);
        assert_eq!(observation.wind_speed, 3.6);
        assert_eq!(observation.air_quality_index, Some(154));
    }

    #[test]
    fn test_missing_temperature_is_rejected() {
        let body = r#"{"main": {"humidity": 58}, "wind": {"speed": 3.6}}"#;
        assert!(serde_json::from_str::<CurrentWeather>(body).is_err());

        let error_body = r#"{"cod": "404", "message": "city not found"}"#;
        assert!(serde_json::from_str::<CurrentWeather>(error_body).is_err());
    }
}

//! City registry: the fixed set of places the dashboard can show

use serde::{Deserialize, Serialize};

use crate::ClimateLensError;

/// Geographic coordinates in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as "lat, lon" with four decimals
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A selectable city
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct City {
    /// Display name, also used as provider query and asset name
    pub name: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    /// Coastal cities get a numeric sea-level projection
    pub coastal: bool,
}

impl City {
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, coastal: bool) -> Self {
        Self {
            name: name.into(),
            coordinates: Coordinates::new(latitude, longitude),
            coastal,
        }
    }
}

/// Closed set of cities known to the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct CityRegistry {
    cities: Vec<City>,
}

impl Default for CityRegistry {
    fn default() -> Self {
        Self {
            cities: vec![
                City::new("Delhi", 28.61, 77.20, false),
                City::new("Mumbai", 19.07, 72.87, true),
            ],
        }
    }
}

impl CityRegistry {
    /// Build a registry from an explicit list. An empty list yields the
    /// built-in registry.
    #[must_use]
    pub fn new(cities: Vec<City>) -> Self {
        if cities.is_empty() {
            Self::default()
        } else {
            Self { cities }
        }
    }

    /// Look a city up by name (ASCII case-insensitive).
    pub fn lookup(&self, name: &str) -> crate::Result<&City> {
        let name = name.trim();
        self.cities
            .iter()
            .find(|city| city.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ClimateLensError::city_not_found(name))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &City> {
        self.cities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = CityRegistry::default();
        assert_eq!(registry.iter().count(), 2);

        let delhi = registry.lookup("Delhi").unwrap();
        assert!(!delhi.coastal);
        assert_eq!(delhi.coordinates, Coordinates::new(28.61, 77.20));

        let mumbai = registry.lookup("Mumbai").unwrap();
        assert!(mumbai.coastal);
        assert_eq!(mumbai.coordinates, Coordinates::new(19.07, 72.87));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = CityRegistry::default();
        assert_eq!(registry.lookup("mumbai").unwrap().name, "Mumbai");
        assert_eq!(registry.lookup(" DELHI ").unwrap().name, "Delhi");
    }

    #[test]
    fn test_unknown_city_is_an_error() {
        let registry = CityRegistry::default();
        let err = registry.lookup("Atlantis").unwrap_err();
        assert!(matches!(err, ClimateLensError::CityNotFound { ref name } if name == "Atlantis"));
        assert!(!registry.contains("Atlantis"));
    }

    #[test]
    fn test_empty_list_falls_back_to_builtin() {
        assert_eq!(CityRegistry::new(Vec::new()), CityRegistry::default());

        let custom = CityRegistry::new(vec![City::new("Chennai", 13.08, 80.27, true)]);
        assert_eq!(custom.iter().count(), 1);
        assert!(custom.contains("Chennai"));
        assert!(!custom.contains("Delhi"));
    }

    #[test]
    fn test_city_entries_are_flat() {
        let city: City = serde_json::from_str(
            r#"{"name": "Chennai", "latitude": 13.08, "longitude": 80.27, "coastal": true}"#,
        )
        .unwrap();
        assert_eq!(city, City::new("Chennai", 13.08, 80.27, true));

        let value = serde_json::to_value(&city).unwrap();
        assert_eq!(value["latitude"], 13.08);
        assert!(value.get("coordinates").is_none());
    }

    #[test]
    fn test_coordinates_format() {
        assert_eq!(Coordinates::new(28.61, 77.2).format(), "28.6100, 77.2000");
    }
}

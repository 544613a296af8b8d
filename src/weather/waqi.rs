//! City feed response from the World Air Quality Index API (`/feed/<city>/`)

use serde::Deserialize;
use serde_json::Value;

use crate::{ClimateLensError, Result};

/// `data` is an object on success and a bare message string ("Unknown
/// station") on error, so it is kept untyped.
#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Value,
}

impl FeedResponse {
    /// AQI reported by the station, `None` when absent or non-numeric
    /// (stations without a current reading report `"-"`).
    ///
    /// A response without any `data` is malformed.
    pub fn aqi(&self) -> Result<Option<u32>> {
        if self.data.is_null() {
            return Err(ClimateLensError::malformed(
                "Air-quality response has no data section",
            ));
        }

        let aqi = match self.data.get("aqi") {
            Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
            _ => None,
        };
        Ok(aqi)
    }
}

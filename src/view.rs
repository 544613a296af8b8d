//! View Synchronizer
//!
//! Pushes live readings and projections into the control surface (the
//! dashboard's labelled fields and images) and the map view. Both are
//! consumed through the [`ControlSurface`] and [`MapView`] traits so the
//! rest of the crate never touches a concrete UI.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{AssetsConfig, ClimateLensConfig};
use crate::models::{Coordinates, LiveObservation, TargetYear};
use crate::projection::{ProjectionResult, Safety};

/// Display fields on the control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    LiveTemperature,
    LiveAqi,
    LiveHumidity,
    LiveWind,
    FutureTemperature,
    FutureAqi,
    FutureSeaLevel,
    FutureFood,
    FutureSafety,
    RiskAlert,
    Ticker,
}

impl Field {
    /// Element id in the dashboard document
    #[must_use]
    pub fn element_id(self) -> &'static str {
        match self {
            Field::LiveTemperature => "l-temp",
            Field::LiveAqi => "l-aqi",
            Field::LiveHumidity => "l-hum",
            Field::LiveWind => "l-wind",
            Field::FutureTemperature => "f-temp",
            Field::FutureAqi => "f-aqi",
            Field::FutureSeaLevel => "f-sea",
            Field::FutureFood => "f-food",
            Field::FutureSafety => "f-safe",
            Field::RiskAlert => "risk-alert",
            Field::Ticker => "ticker",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageSlot {
    Present,
    Future,
}

impl ImageSlot {
    #[must_use]
    pub fn element_id(self) -> &'static str {
        match self {
            ImageSlot::Present => "nowImg",
            ImageSlot::Future => "futureImg",
        }
    }
}

/// Colour overrides for a field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStyle {
    pub color: Option<String>,
    pub border_color: Option<String>,
}

/// The dashboard's form controls and display fields
pub trait ControlSurface {
    fn selected_city(&self) -> String;
    fn selected_year(&self) -> TargetYear;
    fn write_field(&mut self, field: Field, text: &str);
    fn style_field(&mut self, field: Field, style: &FieldStyle);
    fn set_image(&mut self, slot: ImageSlot, source: &str);
}

/// The map widget
pub trait MapView {
    fn pan_to(&mut self, center: Coordinates);
    fn move_marker(&mut self, position: Coordinates);
    fn set_marker_color(&mut self, color: &str);
    /// Re-layout after the pan settles. Widgets that emit a render-complete
    /// event may use it instead of waiting `delay`.
    fn request_relayout(&mut self, delay: Duration);
}

/// Colour tokens for one safety classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub safety_text: &'static str,
    pub alert_text: &'static str,
    pub alert_border: &'static str,
    pub marker: &'static str,
}

pub const UNSAFE_PALETTE: Palette = Palette {
    safety_text: "#ef4444",
    alert_text: "#ef4444",
    alert_border: "#ef4444",
    marker: "#ef4444",
};

pub const STABLE_PALETTE: Palette = Palette {
    safety_text: "#22c55e",
    alert_text: "#38bdf8",
    alert_border: "#38bdf8",
    marker: "#22c55e",
};

#[must_use]
pub fn palette(safety: Safety) -> &'static Palette {
    match safety {
        Safety::Unsafe => &UNSAFE_PALETTE,
        Safety::Stable => &STABLE_PALETTE,
    }
}

/// Status ticker messages
pub mod ticker {
    pub const LINK_ERROR: &str = "LINK ERROR: RETRYING...";
    pub const COMPLETE: &str = "AI PROJECTION COMPLETE // LINK STABLE";

    #[must_use]
    pub fn calibrating(city: &str) -> String {
        format!("CALIBRATING SATELLITE FOR {}...", city.to_uppercase())
    }
}

/// Resolves `<base><year><city>.jpg` image paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetNaming {
    present_year: u16,
    base_path: String,
}

impl AssetNaming {
    #[must_use]
    pub fn new(present_year: u16, base_path: impl Into<String>) -> Self {
        Self {
            present_year,
            base_path: base_path.into(),
        }
    }

    #[must_use]
    pub fn image(&self, year: u16, city: &str) -> String {
        format!("{}{}{}.jpg", self.base_path, year, city)
    }

    #[must_use]
    pub fn present_image(&self, city: &str) -> String {
        self.image(self.present_year, city)
    }

    #[must_use]
    pub fn future_image(&self, year: TargetYear, city: &str) -> String {
        self.image(year.value(), city)
    }
}

impl From<&AssetsConfig> for AssetNaming {
    fn from(config: &AssetsConfig) -> Self {
        Self::new(config.present_year, config.base_path.clone())
    }
}

impl Default for AssetNaming {
    fn default() -> Self {
        Self::from(&AssetsConfig::default())
    }
}

#[derive(Debug, Clone)]
pub struct ViewSynchronizer {
    assets: AssetNaming,
    relayout_delay: Duration,
}

impl ViewSynchronizer {
    #[must_use]
    pub fn new(assets: AssetNaming, relayout_delay: Duration) -> Self {
        Self {
            assets,
            relayout_delay,
        }
    }

    #[must_use]
    pub fn from_config(config: &ClimateLensConfig) -> Self {
        Self::new(
            AssetNaming::from(&config.assets),
            config.dashboard.relayout_delay(),
        )
    }

    pub fn render_ticker<S: ControlSurface>(&self, surface: &mut S, text: &str) {
        surface.write_field(Field::Ticker, text);
    }

    /// Write the live reading fields
    pub fn render_live<S: ControlSurface>(&self, surface: &mut S, observation: &LiveObservation) {
        surface.write_field(Field::LiveTemperature, &observation.format_temperature());
        surface.write_field(Field::LiveAqi, &observation.format_aqi());
        surface.write_field(Field::LiveHumidity, &observation.format_humidity());
        surface.write_field(Field::LiveWind, &observation.format_wind());
    }

    /// Write the projected fields, swap images and move the map
    pub fn render_projection<S: ControlSurface, M: MapView>(
        &self,
        surface: &mut S,
        map: &mut M,
        projection: &ProjectionResult,
    ) {
        let palette = palette(projection.safety);

        surface.write_field(Field::FutureTemperature, &projection.format_temperature());
        surface.write_field(Field::FutureAqi, &projection.future_aqi.to_string());
        surface.write_field(Field::FutureSeaLevel, &projection.sea_level.to_string());
        surface.write_field(Field::FutureFood, &projection.food_security.to_string());

        surface.write_field(Field::FutureSafety, &projection.safety.to_string());
        surface.style_field(
            Field::FutureSafety,
            &FieldStyle {
                color: Some(palette.safety_text.to_string()),
                border_color: None,
            },
        );

        surface.write_field(Field::RiskAlert, &projection.format_risk_alert());
        surface.style_field(
            Field::RiskAlert,
            &FieldStyle {
                color: Some(palette.alert_text.to_string()),
                border_color: Some(palette.alert_border.to_string()),
            },
        );

        surface.set_image(
            ImageSlot::Present,
            &self.assets.present_image(&projection.city),
        );
        surface.set_image(
            ImageSlot::Future,
            &self.assets.future_image(projection.year, &projection.city),
        );

        map.pan_to(projection.coordinates);
        map.move_marker(projection.coordinates);
        map.set_marker_color(palette.marker);
        map.request_relayout(self.relayout_delay);
    }
}

//! Render frames for the browser
//!
//! The server-side dashboard renders into these recorders. The browser
//! receives the resulting [`Frame`] and applies it to its document and
//! Leaflet map.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::{Coordinates, Scenario, TargetYear};
use crate::view::{ControlSurface, Field, FieldStyle, ImageSlot, MapView};

/// Pending change to one display field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MapCommand {
    PanTo { center: Coordinates },
    MoveMarker { position: Coordinates },
    SetMarkerColor { color: String },
    Relayout { delay_ms: u64 },
}

/// Control surface backed by the selection sent with a request
#[derive(Debug, Clone)]
pub struct FrameSurface {
    city: String,
    year: TargetYear,
    fields: BTreeMap<Field, FieldUpdate>,
    images: BTreeMap<&'static str, String>,
}

impl FrameSurface {
    #[must_use]
    pub fn new(city: impl Into<String>, year: TargetYear) -> Self {
        Self {
            city: city.into(),
            year,
            fields: BTreeMap::new(),
            images: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn field(&self, field: Field) -> Option<&FieldUpdate> {
        self.fields.get(&field)
    }

    #[must_use]
    pub fn text(&self, field: Field) -> Option<&str> {
        self.field(field).and_then(|update| update.text.as_deref())
    }

    #[must_use]
    pub fn image(&self, slot: ImageSlot) -> Option<&str> {
        self.images.get(slot.element_id()).map(String::as_str)
    }

    /// Nothing was written
    #[must_use]
    pub fn is_untouched(&self) -> bool {
        self.fields.is_empty() && self.images.is_empty()
    }
}

impl ControlSurface for FrameSurface {
    fn selected_city(&self) -> String {
        self.city.clone()
    }

    fn selected_year(&self) -> TargetYear {
        self.year
    }

    fn write_field(&mut self, field: Field, text: &str) {
        self.fields.entry(field).or_default().text = Some(text.to_string());
    }

    fn style_field(&mut self, field: Field, style: &FieldStyle) {
        let update = self.fields.entry(field).or_default();
        if let Some(color) = &style.color {
            update.color = Some(color.clone());
        }
        if let Some(border) = &style.border_color {
            update.border_color = Some(border.clone());
        }
    }

    fn set_image(&mut self, slot: ImageSlot, source: &str) {
        self.images.insert(slot.element_id(), source.to_string());
    }
}

/// Map view that records commands in order
#[derive(Debug, Clone, Default)]
pub struct FrameMap {
    commands: Vec<MapCommand>,
}

impl FrameMap {
    #[must_use]
    pub fn commands(&self) -> &[MapCommand] {
        &self.commands
    }
}

impl MapView for FrameMap {
    fn pan_to(&mut self, center: Coordinates) {
        self.commands.push(MapCommand::PanTo { center });
    }

    fn move_marker(&mut self, position: Coordinates) {
        self.commands.push(MapCommand::MoveMarker { position });
    }

    fn set_marker_color(&mut self, color: &str) {
        self.commands.push(MapCommand::SetMarkerColor {
            color: color.to_string(),
        });
    }

    fn request_relayout(&mut self, delay: Duration) {
        self.commands.push(MapCommand::Relayout {
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        });
    }
}

/// Everything the browser needs to apply one update cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub cycle: u64,
    pub scenario: Scenario,
    pub link_healthy: bool,
    /// Keyed by element id
    pub fields: BTreeMap<String, FieldUpdate>,
    /// Keyed by element id
    pub images: BTreeMap<String, String>,
    pub map: Vec<MapCommand>,
}

impl Frame {
    #[must_use]
    pub fn assemble(
        cycle: u64,
        scenario: Scenario,
        link_healthy: bool,
        surface: FrameSurface,
        map: FrameMap,
    ) -> Self {
        Self {
            cycle,
            scenario,
            link_healthy,
            fields: surface
                .fields
                .into_iter()
                .map(|(field, update)| (field.element_id().to_string(), update))
                .collect(),
            images: surface
                .images
                .into_iter()
                .map(|(id, source)| (id.to_string(), source))
                .collect(),
            map: map.commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_merges_with_text() {
        let mut surface = FrameSurface::new("Delhi", TargetYear::NEAR_TERM);
        surface.write_field(Field::RiskAlert, "RISK LEVEL: MINIMAL");
        surface.style_field(
            Field::RiskAlert,
            &FieldStyle {
                color: Some("#38bdf8".into()),
                border_color: Some("#38bdf8".into()),
            },
        );

        let update = surface.field(Field::RiskAlert).unwrap();
        assert_eq!(update.text.as_deref(), Some("RISK LEVEL: MINIMAL"));
        assert_eq!(update.color.as_deref(), Some("#38bdf8"));
        assert_eq!(update.border_color.as_deref(), Some("#38bdf8"));
    }

    #[test]
    fn test_frame_uses_element_ids() {
        let mut surface = FrameSurface::new("Delhi", TargetYear::NEAR_TERM);
        surface.write_field(Field::Ticker, "hello");
        surface.set_image(ImageSlot::Future, "2050Delhi.jpg");
        let mut map = FrameMap::default();
        map.request_relayout(Duration::from_millis(300));

        let frame = Frame::assemble(3, Scenario::Low, true, surface, map);
        assert_eq!(frame.fields["ticker"].text.as_deref(), Some("hello"));
        assert_eq!(frame.images["futureImg"], "2050Delhi.jpg");

        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["map"][0]["op"], "relayout");
        assert_eq!(json["map"][0]["delay_ms"], 300);
        assert_eq!(json["scenario"], "low");
        assert!(json["fields"]["ticker"].get("color").is_none());
    }
}

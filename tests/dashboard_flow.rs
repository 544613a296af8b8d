//! End-to-end update cycles through the public dashboard API

use std::sync::Mutex;

use climatelens::api::frame::{FrameMap, FrameSurface, MapCommand};
use climatelens::view::{Field, ImageSlot};
use climatelens::{
    ClimateLensConfig, ClimateLensError, Coordinates, Dashboard, DashboardEvent, LiveObservation,
    ObservationFetcher, Scenario, TargetYear,
};

/// Fetcher that serves a fixed reading until switched offline
struct ToggleFetcher {
    reading: Mutex<Option<LiveObservation>>,
}

impl ToggleFetcher {
    fn online(temperature: f64, aqi: u32) -> Self {
        Self {
            reading: Mutex::new(Some(LiveObservation::new(
                temperature,
                64.0,
                3.1,
                Some(aqi),
            ))),
        }
    }
}

impl ObservationFetcher for ToggleFetcher {
    async fn fetch(&self, _city: &str) -> climatelens::Result<LiveObservation> {
        let reading = self.reading.lock().unwrap().clone();
        reading.ok_or_else(|| ClimateLensError::api("connection refused"))
    }
}

async fn dispatch(
    dashboard: &mut Dashboard<ToggleFetcher>,
    event: DashboardEvent,
    city: &str,
    year: TargetYear,
) -> (FrameSurface, FrameMap) {
    let mut surface = FrameSurface::new(city, year);
    let mut map = FrameMap::default();
    dashboard
        .handle(event, &mut surface, &mut map)
        .await
        .expect("cycle should complete");
    (surface, map)
}

#[tokio::test]
async fn test_full_session_walkthrough() {
    let config = ClimateLensConfig::default();
    let mut dashboard = Dashboard::from_config(&config, ToggleFetcher::online(25.0, 60));

    // Initial load shows Delhi, low scenario, near term
    let (surface, _) = dispatch(
        &mut dashboard,
        DashboardEvent::Load,
        "Delhi",
        TargetYear::NEAR_TERM,
    )
    .await;
    assert_eq!(surface.text(Field::FutureSafety), Some("STABLE"));
    assert_eq!(surface.text(Field::RiskAlert), Some("RISK LEVEL: MINIMAL"));
    assert_eq!(surface.text(Field::FutureSeaLevel), Some("STABLE"));
    assert_eq!(surface.image(ImageSlot::Present), Some("2025Delhi.jpg"));

    // Switch to the coastal city
    let (surface, map) = dispatch(
        &mut dashboard,
        DashboardEvent::CityChanged {
            city: "Mumbai".into(),
        },
        "Mumbai",
        TargetYear::NEAR_TERM,
    )
    .await;
    assert_eq!(surface.text(Field::FutureTemperature), Some("25.8°C"));
    assert_eq!(surface.text(Field::FutureAqi), Some("36"));
    assert_eq!(surface.text(Field::FutureSeaLevel), Some("+0.2m"));
    assert_eq!(surface.text(Field::FutureFood), Some("SECURE"));
    assert_eq!(
        map.commands().first(),
        Some(&MapCommand::PanTo {
            center: Coordinates::new(19.07, 72.87)
        })
    );

    // Escalate the scenario, then jump to the far future
    dispatch(
        &mut dashboard,
        DashboardEvent::ScenarioToggled {
            scenario: Scenario::High,
        },
        "Mumbai",
        TargetYear::NEAR_TERM,
    )
    .await;
    let (surface, map) = dispatch(
        &mut dashboard,
        DashboardEvent::YearChanged,
        "Mumbai",
        TargetYear::FAR_FUTURE,
    )
    .await;

    assert_eq!(surface.text(Field::FutureTemperature), Some("34.9°C"));
    assert_eq!(surface.text(Field::FutureAqi), Some("114"));
    assert_eq!(surface.text(Field::FutureSeaLevel), Some("+2.2m"));
    assert_eq!(surface.text(Field::FutureFood), Some("CRITICAL"));
    assert_eq!(surface.text(Field::FutureSafety), Some("UNSAFE"));
    assert_eq!(surface.text(Field::RiskAlert), Some("RISK LEVEL: EXTREME"));
    assert_eq!(surface.image(ImageSlot::Future), Some("2100Mumbai.jpg"));
    assert!(map.commands().contains(&MapCommand::SetMarkerColor {
        color: "#ef4444".into()
    }));
    assert_eq!(dashboard.session().cycles(), 4);
}

#[tokio::test]
async fn test_link_loss_degrades_without_failing() {
    let config = ClimateLensConfig::default();
    let mut dashboard = Dashboard::from_config(&config, ToggleFetcher::online(33.0, 180));

    dispatch(&mut dashboard, DashboardEvent::Load, "Delhi", TargetYear::NEAR_TERM).await;

    // Provider goes away
    dashboard_fetcher_offline(&dashboard);
    let (surface, _) = dispatch(
        &mut dashboard,
        DashboardEvent::CityChanged {
            city: "Delhi".into(),
        },
        "Delhi",
        TargetYear::NEAR_TERM,
    )
    .await;

    // 33.0 + 0.44 * 1.8 = 33.792, AQI falls back to 60
    assert_eq!(surface.text(Field::FutureTemperature), Some("33.8°C"));
    assert_eq!(surface.text(Field::FutureAqi), Some("36"));
    assert_eq!(surface.text(Field::Ticker), Some("LINK ERROR: RETRYING..."));
    assert_eq!(surface.text(Field::LiveTemperature), None);
    assert_eq!(dashboard.session().last_temperature(), 33.0);
}

fn dashboard_fetcher_offline(dashboard: &Dashboard<ToggleFetcher>) {
    dashboard.fetcher().reading.lock().unwrap().take();
}

//! End-to-end flow: selection → resolution → fetch → view state.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use cityweather_core::{
    CITIES, Coordinate, DisabledGeolocator, ErrorKind, FixedGeolocator, LocationSource,
    OpenWeatherProvider, Phase, Resolver, Session, WeatherIcon, WeatherProvider, WeatherSnapshot,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn city(name: &str) -> LocationSource {
    #[allow(clippy::expect_used)]
    LocationSource::parse(name).expect("known city")
}

/// Answers instantly with the matching city's name, except for `fail_at`.
#[derive(Debug, Default)]
struct FakeProvider {
    calls: Arc<AtomicUsize>,
    fail_at: Option<Coordinate>,
    slow_at: Option<Coordinate>,
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn current(&self, coordinate: Coordinate) -> anyhow::Result<WeatherSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if Some(coordinate) == self.slow_at {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        if Some(coordinate) == self.fail_at {
            anyhow::bail!("simulated outage");
        }

        let name = CITIES
            .iter()
            .find(|c| c.coordinate == coordinate)
            .map(|c| c.name)
            .unwrap_or("Here");

        Ok(WeatherSnapshot {
            location_name: name.to_string(),
            temperature_celsius: 15.0,
            condition_code: 801,
            condition_description: "few clouds".to_string(),
            humidity_percent: 40,
            wind_speed: 2.0,
            observed_at: None,
        })
    }
}

fn fixed_resolver() -> Resolver {
    Resolver::new(Box::new(FixedGeolocator::new(Coordinate::new(37.5, 127.0))))
}

#[tokio::test]
async fn startup_on_current_location_renders_snapshot() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "37.5"))
        .and(query_param("lon", "127"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Seoul",
            "weather": [{"id": 800, "description": "clear sky"}],
            "main": {"temp": 20.0, "humidity": 50},
            "wind": {"speed": 3.2}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    #[allow(clippy::expect_used)]
    let provider = OpenWeatherProvider::new(
        "TEST_KEY".to_string(),
        mock_server.uri(),
        Duration::from_secs(5),
    )
    .expect("provider");

    let mut session = Session::new(fixed_resolver(), Arc::new(provider));
    session.select(LocationSource::CurrentLocation);
    assert_eq!(session.state().phase(), Phase::Loading);

    let state = session.settle().await;

    assert_eq!(state.phase(), Phase::Success);
    assert!(!state.is_loading);
    assert!(state.error.is_none());
    let snapshot = state.snapshot.as_ref().expect("snapshot");
    assert_eq!(snapshot.temperature_line(), "20°C / 68°F");
    assert_eq!(snapshot.icon(), WeatherIcon::Clear);
    assert_eq!(snapshot.humidity_line(), "50%");
    assert_eq!(snapshot.wind_line(), "3.2 m/s");
}

#[tokio::test]
async fn unavailable_location_skips_fetch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = FakeProvider {
        calls: calls.clone(),
        ..Default::default()
    };

    let mut session = Session::new(Resolver::new(Box::new(DisabledGeolocator)), Arc::new(provider));
    session.select(LocationSource::CurrentLocation);
    let state = session.settle().await;

    assert_eq!(state.phase(), Phase::Error);
    assert_eq!(state.error, Some(ErrorKind::LocationUnavailable));
    assert!(state.snapshot.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fetch_failure_keeps_previous_snapshot() {
    let provider = FakeProvider {
        fail_at: Some(CITIES[6].coordinate),
        ..Default::default()
    };
    let mut session = Session::new(fixed_resolver(), Arc::new(provider));

    session.select(city("Paris"));
    session.settle().await;

    session.select(city("London"));
    let state = session.settle().await;

    assert_eq!(state.phase(), Phase::Error);
    assert!(!state.is_loading);
    assert_eq!(state.error, Some(ErrorKind::WeatherFetchFailed));
    assert_eq!(
        state.snapshot.as_ref().map(|s| s.location_name.as_str()),
        Some("Paris")
    );
    assert_eq!(state.selected_source, Some(city("London")));
}

#[tokio::test]
async fn new_attempt_clears_error() {
    let mut session = Session::new(
        Resolver::new(Box::new(DisabledGeolocator)),
        Arc::new(FakeProvider::default()),
    );

    session.select(LocationSource::CurrentLocation);
    session.settle().await;
    assert_eq!(session.state().error, Some(ErrorKind::LocationUnavailable));

    session.select(city("Tokyo"));
    assert!(session.state().error.is_none());

    let state = session.settle().await;
    assert_eq!(state.phase(), Phase::Success);
}

#[tokio::test]
async fn reselecting_while_pending_latest_wins() {
    let provider = FakeProvider {
        slow_at: Some(CITIES[1].coordinate),
        ..Default::default()
    };
    let mut session = Session::new(fixed_resolver(), Arc::new(provider));

    session.select(city("Tokyo"));
    session.select(city("Paris"));

    let state = tokio::time::timeout(Duration::from_secs(5), session.settle())
        .await
        .expect("the aborted Tokyo load must not hold up Paris");

    assert_eq!(state.phase(), Phase::Success);
    assert_eq!(
        state.snapshot.as_ref().map(|s| s.location_name.as_str()),
        Some("Paris")
    );
}

#[tokio::test]
async fn queued_stale_completion_is_discarded() {
    let mut session = Session::new(fixed_resolver(), Arc::new(FakeProvider::default()));

    session.select(city("Tokyo"));
    // Let the Tokyo load finish and queue its completion.
    tokio::time::sleep(Duration::from_millis(50)).await;
    session.select(city("Beijing"));

    let first = session.next_completion().await.expect("tokyo completion");
    assert_eq!(first.token, 1);
    assert!(!session.complete(first));
    assert!(session.state().is_loading);

    let state = session.settle().await;
    assert_eq!(
        state.snapshot.as_ref().map(|s| s.location_name.as_str()),
        Some("Beijing")
    );
}

#[tokio::test]
async fn refresh_reloads_selected_source() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = FakeProvider {
        calls: calls.clone(),
        ..Default::default()
    };
    let mut session = Session::new(fixed_resolver(), Arc::new(provider));

    session.select(city("Rome"));
    session.settle().await;
    session.refresh();
    let state = session.settle().await;

    assert_eq!(state.selected_source, Some(city("Rome")));
    assert_eq!(state.generation(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn settle_without_selection_returns_immediately() {
    let mut session = Session::new(fixed_resolver(), Arc::new(FakeProvider::default()));
    let state = session.settle().await;
    assert_eq!(state.phase(), Phase::Idle);
}

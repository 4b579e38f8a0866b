//! Drives the dashboard controller end to end against a mock weather provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nimbus_core::{OpState, VoiceError};
use nimbus_services::{FavoritesStore, LocalStorage, UnitPreference};
use nimbus_ui::{DashboardController, Intent, SpeechRecognizer, UnsupportedSpeech, WeatherServices};
use nimbus_weather::{
    build_client, ConfiguredLocation, Coordinate, GeolocationProvider, LocationError,
    LocationResolver, UnitSystem, WeatherAggregator,
};
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SETTLE: Duration = Duration::from_secs(10);

struct DeniedLocation;

#[async_trait]
impl GeolocationProvider for DeniedLocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Err(LocationError::PermissionDenied)
    }
}

struct ScriptedSpeech(Result<String, VoiceError>);

#[async_trait]
impl SpeechRecognizer for ScriptedSpeech {
    async fn listen(&self) -> Result<String, VoiceError> {
        self.0.clone()
    }
}

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap()
}

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Westminster",
        "dt": 1_709_290_800,
        "main": {"temp": 11.6, "feels_like": 10.2, "humidity": 71},
        "wind": {"speed": 5.0, "deg": 240},
        "weather": [{"main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "sys": {"sunrise": 1_709_275_000, "sunset": 1_709_315_000}
    })
}

fn forecast_body() -> serde_json::Value {
    let list: Vec<_> = (0..40)
        .map(|i| {
            serde_json::json!({
                "dt": 1_709_294_400 + i * 10_800,
                "main": {"temp": 8.0 + (i % 8) as f64},
                "weather": [{"main": "Rain", "description": "light rain", "icon": "10d"}]
            })
        })
        .collect();
    serde_json::json!({ "list": list })
}

async fn mount_provider(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/geo/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "London", "lat": 51.5073, "lon": -0.1276}
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/geo/direct"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .with_priority(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/air_pollution"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "list": [{"main": {"aqi": 2}}]
        })))
        .mount(server)
        .await;
}

fn services(
    server: &MockServer,
    geolocation: Arc<dyn GeolocationProvider>,
    speech: Arc<dyn SpeechRecognizer>,
) -> WeatherServices {
    let client = Arc::new(build_client(Duration::from_secs(5)).unwrap());
    WeatherServices {
        resolver: LocationResolver::new(client.clone(), &format!("{}/geo", server.uri()), "k"),
        aggregator: WeatherAggregator::new(client, &format!("{}/data", server.uri()), "k"),
        geolocation,
        speech,
    }
}

struct Harness {
    rt: Runtime,
    server: MockServer,
    storage: LocalStorage,
}

impl Harness {
    fn new() -> Self {
        let rt = runtime();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            mount_provider(&server).await;
            server
        });
        Self {
            rt,
            server,
            storage: LocalStorage::in_memory().unwrap(),
        }
    }

    fn controller_with(
        &self,
        geolocation: Arc<dyn GeolocationProvider>,
        speech: Arc<dyn SpeechRecognizer>,
    ) -> DashboardController {
        DashboardController::new(
            self.rt.handle().clone(),
            services(&self.server, geolocation, speech),
            UnitPreference::new(self.storage.clone()),
            FavoritesStore::new(self.storage.clone()),
        )
        .unwrap()
    }

    fn controller(&self) -> DashboardController {
        self.controller_with(
            Arc::new(ConfiguredLocation::new(None)),
            Arc::new(UnsupportedSpeech),
        )
    }
}

#[test]
fn search_shows_snapshot_under_typed_name() {
    let h = Harness::new();
    let mut controller = h.controller();

    assert!(controller.dispatch(Intent::Search("  London ".into())));
    assert_eq!(controller.session().op_state, OpState::Acquiring);
    assert!(!controller.controls_enabled());
    assert!(controller.wait_settled(SETTLE));

    let session = controller.session();
    let snapshot = session.snapshot.as_ref().unwrap();
    assert_eq!(snapshot.city_name, "London");
    assert_eq!(snapshot.units, UnitSystem::Metric);
    assert_eq!(snapshot.hourly().len(), 8);
    assert!(session.error.is_none());
    assert_eq!(session.current_city.as_deref(), Some("London"));
    assert!(controller.countdown().is_some());

    let rendered = controller.view().to_string();
    assert!(rendered.contains("London ☆"));
    assert!(rendered.contains("Air quality: Fair (2)"));
}

#[test]
fn unknown_city_shows_not_found_message() {
    let h = Harness::new();
    let mut controller = h.controller();

    controller.dispatch(Intent::Search("Atlantis".into()));
    assert!(controller.wait_settled(SETTLE));

    let session = controller.session();
    assert!(session.snapshot.is_none());
    assert_eq!(
        session.error.as_deref(),
        Some("City not found. Please check the spelling.")
    );
    assert!(controller.countdown().is_none());
}

#[test]
fn blank_search_does_nothing() {
    let h = Harness::new();
    let mut controller = h.controller();

    assert!(!controller.dispatch(Intent::Search("   ".into())));
    assert_eq!(controller.session().op_state, OpState::Idle);
}

#[test]
fn second_search_rejected_while_busy() {
    let h = Harness::new();
    mount_slow_paris(&h);
    let mut controller = h.controller();

    assert!(controller.dispatch(Intent::Search("Paris".into())));
    assert!(!controller.dispatch(Intent::Search("London".into())));
    assert!(!controller.dispatch(Intent::UseLocation));
    assert!(!controller.dispatch(Intent::ToggleUnit));
    assert!(controller.wait_settled(SETTLE));

    assert_eq!(
        controller.session().snapshot.as_ref().unwrap().city_name,
        "Paris"
    );
}

fn mount_slow_paris(h: &Harness) {
    h.rt.block_on(async {
        Mock::given(method("GET"))
            .and(path("/geo/direct"))
            .and(query_param("q", "Paris"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"lat": 48.85, "lon": 2.35}]))
                    .set_delay(Duration::from_millis(500)),
            )
            .with_priority(1)
            .mount(&h.server)
            .await;
    });
}

#[test]
fn favorite_toggle_rejected_while_fetching() {
    let h = Harness::new();
    mount_slow_paris(&h);
    let mut controller = h.controller();

    controller.dispatch(Intent::Search("London".into()));
    assert!(controller.wait_settled(SETTLE));

    assert!(controller.dispatch(Intent::Search("Paris".into())));
    assert!(!controller.dispatch(Intent::ToggleFavorite));
    assert!(controller.wait_settled(SETTLE));

    assert!(controller.session().favorites.is_empty());
    assert!(!FavoritesStore::new(h.storage.clone())
        .contains("London")
        .unwrap());
}

#[test]
fn unit_toggle_refetches_and_persists() {
    let h = Harness::new();
    let mut controller = h.controller();

    controller.dispatch(Intent::Search("London".into()));
    assert!(controller.wait_settled(SETTLE));

    assert!(controller.dispatch(Intent::ToggleUnit));
    assert!(controller.session().snapshot.is_none());
    assert!(controller.wait_settled(SETTLE));

    let snapshot = controller.session().snapshot.as_ref().unwrap();
    assert_eq!(snapshot.units, UnitSystem::Imperial);
    assert_eq!(snapshot.city_name, "London");
    assert_eq!(
        UnitPreference::new(h.storage.clone()).load().unwrap(),
        UnitSystem::Imperial
    );
    assert!(controller.view().to_string().contains("°F"));

    // A fresh controller picks the stored preference up.
    let restarted = h.controller();
    assert_eq!(restarted.session().units, UnitSystem::Imperial);
}

#[test]
fn unit_toggle_without_city_only_switches_units() {
    let h = Harness::new();
    let mut controller = h.controller();

    assert!(controller.dispatch(Intent::ToggleUnit));
    assert_eq!(controller.session().op_state, OpState::Idle);
    assert_eq!(controller.session().units, UnitSystem::Imperial);
}

#[test]
fn favorite_toggle_tracks_current_city() {
    let h = Harness::new();
    let mut controller = h.controller();

    assert!(!controller.dispatch(Intent::ToggleFavorite));
    assert!(controller.session().notice.is_some());

    controller.dispatch(Intent::Search("London".into()));
    assert!(controller.wait_settled(SETTLE));

    assert!(controller.dispatch(Intent::ToggleFavorite));
    assert!(controller.session().is_favorite());
    assert!(controller.view().to_string().contains("[1] London"));
    assert!(FavoritesStore::new(h.storage.clone())
        .contains("London")
        .unwrap());

    assert!(controller.dispatch(Intent::ToggleFavorite));
    assert!(!controller.session().is_favorite());
    assert!(controller.session().favorites.is_empty());
}

#[test]
fn open_favorite_searches_it() {
    let h = Harness::new();
    FavoritesStore::new(h.storage.clone()).toggle("London").unwrap();
    let mut controller = h.controller();

    assert!(!controller.dispatch(Intent::OpenFavorite(3)));
    assert!(controller.dispatch(Intent::OpenFavorite(0)));
    assert!(controller.wait_settled(SETTLE));
    assert!(controller.session().is_favorite());
}

#[test]
fn denied_location_shows_message() {
    let h = Harness::new();
    let mut controller = h.controller_with(Arc::new(DeniedLocation), Arc::new(UnsupportedSpeech));

    assert!(controller.dispatch(Intent::UseLocation));
    assert_eq!(controller.session().op_state, OpState::Locating);
    assert!(controller.wait_settled(SETTLE));

    assert_eq!(
        controller.session().error.as_deref(),
        Some("You denied the request for your location.")
    );
}

#[test]
fn located_position_uses_provider_name() {
    let h = Harness::new();
    let position = Coordinate::new(51.5, -0.12);
    let mut controller = h.controller_with(
        Arc::new(ConfiguredLocation::new(Some(position))),
        Arc::new(UnsupportedSpeech),
    );

    assert!(controller.dispatch(Intent::UseLocation));
    assert!(controller.wait_settled(SETTLE));

    let snapshot = controller.session().snapshot.as_ref().unwrap();
    assert_eq!(snapshot.city_name, "Westminster");
    assert_eq!(
        controller.session().current_city.as_deref(),
        Some("Westminster")
    );
}

#[test]
fn voice_search_uses_transcript() {
    let h = Harness::new();
    let mut controller = h.controller_with(
        Arc::new(ConfiguredLocation::new(None)),
        Arc::new(ScriptedSpeech(Ok("London".into()))),
    );

    assert!(controller.dispatch(Intent::VoiceSearch));
    assert_eq!(controller.session().op_state, OpState::Listening);
    assert!(controller.wait_settled(SETTLE));

    let session = controller.session();
    assert_eq!(session.snapshot.as_ref().unwrap().city_name, "London");
    assert_eq!(session.notice.as_deref(), Some("Heard \"London\""));
}

#[test]
fn voice_without_speech_shows_message() {
    let h = Harness::new();
    let mut controller = h.controller_with(
        Arc::new(ConfiguredLocation::new(None)),
        Arc::new(ScriptedSpeech(Err(VoiceError::NoSpeech))),
    );

    controller.dispatch(Intent::VoiceSearch);
    assert!(controller.wait_settled(SETTLE));

    assert_eq!(
        controller.session().error.as_deref(),
        Some("No speech was detected. Please try again.")
    );
}

#[test]
fn failure_after_success_clears_dashboard() {
    let h = Harness::new();
    let mut controller = h.controller();

    controller.dispatch(Intent::Search("London".into()));
    assert!(controller.wait_settled(SETTLE));
    assert!(controller.countdown().is_some());

    controller.dispatch(Intent::Search("Atlantis".into()));
    assert!(controller.wait_settled(SETTLE));

    let session = controller.session();
    assert!(session.snapshot.is_none());
    assert!(session.error.is_some());
    assert!(controller.countdown().is_none());
    // The last good city stays the target of favorites and unit toggles.
    assert_eq!(session.current_city.as_deref(), Some("London"));
}

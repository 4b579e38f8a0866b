//! Weather backend: async city lookup, location and voice flows.
//! All network work runs off the controller's thread; results sent via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use nimbus_core::{AppError, VoiceError};
use nimbus_weather::{
    Coordinate, GeolocationProvider, LocationResolver, UnitSystem, WeatherAggregator,
    WeatherSnapshot,
};
use tokio::runtime::Handle;

use crate::error_mapping::IntoAppError;
use crate::services::speech::SpeechRecognizer;

/// Collaborators needed for one acquisition cycle.
pub struct WeatherServices {
    pub resolver: LocationResolver,
    pub aggregator: WeatherAggregator,
    pub geolocation: Arc<dyn GeolocationProvider>,
    pub speech: Arc<dyn SpeechRecognizer>,
}

/// Messages sent from async operations back to the controller
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Position found; the fetch for it has started
    Located(Coordinate),
    /// Transcript recognized; the search for it has started
    Heard(String),
    /// Final outcome of an acquisition, success or failure
    FetchDone(Result<WeatherSnapshot, AppError>),
}

/// Resolve `city`, then fetch its weather. Sends `FetchDone`.
pub fn request_search(
    runtime: &Handle,
    tx: &Sender<WeatherServiceMessage>,
    services: Arc<WeatherServices>,
    city: String,
    units: UnitSystem,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = search(&services, &city, units).await;
        let _ = tx.send(WeatherServiceMessage::FetchDone(result));
    });
}

/// Ask for the user's position, then fetch its weather.
/// Sends `Located` once the position is known, then `FetchDone`.
pub fn request_locate(
    runtime: &Handle,
    tx: &Sender<WeatherServiceMessage>,
    services: Arc<WeatherServices>,
    units: UnitSystem,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let coordinate = match services.geolocation.current_position().await {
            Ok(c) => {
                tracing::info!("Got location: {}", c);
                c
            }
            Err(e) => {
                tracing::warn!("Location lookup failed: {}", e);
                let _ = tx.send(WeatherServiceMessage::FetchDone(Err(e.into_app_error())));
                return;
            }
        };

        let _ = tx.send(WeatherServiceMessage::Located(coordinate));
        let result = services
            .aggregator
            .acquire(coordinate, units, None)
            .await
            .map_err(IntoAppError::into_app_error);
        let _ = tx.send(WeatherServiceMessage::FetchDone(result));
    });
}

/// Listen for a city name, then search for it.
/// Sends `Heard` once a transcript exists, then `FetchDone`.
pub fn request_voice(
    runtime: &Handle,
    tx: &Sender<WeatherServiceMessage>,
    services: Arc<WeatherServices>,
    units: UnitSystem,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let transcript = match services.speech.listen().await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                let _ = tx.send(WeatherServiceMessage::FetchDone(Err(VoiceError::NoSpeech.into())));
                return;
            }
            Err(e) => {
                tracing::warn!("Voice input failed: {}", e);
                let _ = tx.send(WeatherServiceMessage::FetchDone(Err(e.into())));
                return;
            }
        };

        tracing::info!("Heard {:?}", transcript);
        let _ = tx.send(WeatherServiceMessage::Heard(transcript.clone()));
        let result = search(&services, &transcript, units).await;
        let _ = tx.send(WeatherServiceMessage::FetchDone(result));
    });
}

async fn search(
    services: &WeatherServices,
    city: &str,
    units: UnitSystem,
) -> Result<WeatherSnapshot, AppError> {
    let coordinate = services
        .resolver
        .resolve(city)
        .await
        .map_err(IntoAppError::into_app_error)?;

    services
        .aggregator
        .acquire(coordinate, units, Some(city))
        .await
        .map_err(IntoAppError::into_app_error)
}

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::openweather::{
    build_snapshot, AirPollutionResponse, CurrentResponse, ErrorBody, ForecastResponse,
};
use crate::types::{AirQuality, Coordinate, UnitSystem, WeatherError, WeatherSnapshot};

pub const WEATHER_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

const USER_AGENT: &str = concat!("nimbus/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by the resolver and the aggregator.
pub fn build_client(timeout: Duration) -> Result<Client, WeatherError> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// What to do when only the air quality request fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AirQualityPolicy {
    /// Any failed request fails the whole acquisition
    #[default]
    Required,
    /// Air quality degrades to unknown; the other two requests stay mandatory
    BestEffort,
}

/// Fetches current conditions, forecast and air quality for one coordinate.
#[derive(Debug, Clone)]
pub struct WeatherAggregator {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    air_quality: AirQualityPolicy,
}

impl WeatherAggregator {
    pub fn new(client: Arc<Client>, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            air_quality: AirQualityPolicy::default(),
        }
    }

    pub fn with_air_quality_policy(mut self, policy: AirQualityPolicy) -> Self {
        self.air_quality = policy;
        self
    }

    /// Run the three requests concurrently and combine them.
    ///
    /// All three are awaited before deciding. Any mandatory failure ends the
    /// acquisition with `Acquisition`, carrying the current-conditions
    /// message if there is one, else the forecast message.
    #[instrument(skip(self), level = "info")]
    pub async fn acquire(
        &self,
        coordinate: Coordinate,
        units: UnitSystem,
        display_name: Option<&str>,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let current = self.get_json::<CurrentResponse>("weather", coordinate, Some(units));
        let forecast = self.get_json::<ForecastResponse>("forecast", coordinate, Some(units));
        let air = self.air_quality(coordinate);

        let (current, forecast, air) = match tokio::join!(current, forecast, air) {
            (Ok(current), Ok(forecast), Ok(air)) => (current, forecast, air),
            (current, forecast, _) => {
                return Err(acquisition_failure(current.err(), forecast.err()))
            }
        };

        let snapshot = build_snapshot(current, forecast, air, units, display_name)
            .map_err(into_acquisition)?;

        tracing::info!(
            "Fetched weather for {} ({} forecast points)",
            snapshot.city_name,
            snapshot.forecast.len()
        );
        Ok(snapshot)
    }

    async fn air_quality(&self, coordinate: Coordinate) -> Result<AirQuality, WeatherError> {
        let result = self
            .get_json::<AirPollutionResponse>("air_pollution", coordinate, None)
            .await
            .map(AirPollutionResponse::into_air_quality);

        match (result, self.air_quality) {
            (Ok(aq), _) => Ok(aq),
            (Err(e), AirQualityPolicy::BestEffort) => {
                tracing::warn!("Air quality unavailable, continuing without it: {}", e);
                Ok(AirQuality::unknown())
            }
            (Err(e), AirQualityPolicy::Required) => {
                tracing::warn!("Air quality request failed: {}", e);
                Err(e)
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        coordinate: Coordinate,
        units: Option<UnitSystem>,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let mut query = vec![
            ("lat", coordinate.latitude.to_string()),
            ("lon", coordinate.longitude.to_string()),
            ("appid", self.api_key.clone()),
        ];
        if let Some(units) = units {
            query.push(("units", units.as_str().to_string()));
        }

        tracing::debug!("GET {}", url);
        let response = self.client.get(&url).query(&query).send().await?;
        self.handle_response(endpoint, response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| WeatherError::Parse(format!("{} response: {}", endpoint, e)))
        } else {
            let text = response.text().await.unwrap_or_default();
            let message = ErrorBody::message_from(&text);
            tracing::warn!("{} returned {}: {:?}", endpoint, status, message);
            Err(WeatherError::Acquisition(message))
        }
    }
}

/// Pick the message shown for a failed acquisition. Current conditions take
/// precedence over the forecast; air quality never contributes one.
fn acquisition_failure(
    current: Option<WeatherError>,
    forecast: Option<WeatherError>,
) -> WeatherError {
    let message = [current, forecast]
        .into_iter()
        .flatten()
        .find_map(|err| match into_acquisition(err) {
            WeatherError::Acquisition(message) => message,
            _ => None,
        });
    WeatherError::Acquisition(message)
}

/// Collapse any failure during acquisition into `Acquisition`.
fn into_acquisition(err: WeatherError) -> WeatherError {
    match err {
        WeatherError::Acquisition(_) => err,
        other => {
            tracing::warn!("Weather acquisition failed: {}", other);
            WeatherError::Acquisition(None)
        }
    }
}

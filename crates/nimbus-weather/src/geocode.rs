//! Forward geocoding: city name to coordinate via OpenWeatherMap's direct geocoding.

use reqwest::Client;
use std::sync::Arc;
use tracing::instrument;

use crate::openweather::GeoEntry;
use crate::types::{Coordinate, WeatherError};

pub const GEO_API_BASE: &str = "https://api.openweathermap.org/geo/1.0";

#[derive(Debug, Clone)]
pub struct LocationResolver {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl LocationResolver {
    pub fn new(client: Arc<Client>, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Resolve a city name to the provider's best match.
    ///
    /// An empty result, a non-success status or a body that is not a list of
    /// places all mean `NotFound`. Transport failures surface as `Network`.
    #[instrument(skip(self), level = "info")]
    pub async fn resolve(&self, city: &str) -> Result<Coordinate, WeatherError> {
        let url = format!("{}/direct", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("limit", "1"), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Geocoding returned status {} for {:?}", status, city);
            return Err(WeatherError::NotFound(city.to_string()));
        }

        let body = response.text().await?;
        let entries: Vec<GeoEntry> = match serde_json::from_str(&body) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("Geocoding payload not a place list: {}", e);
                return Err(WeatherError::NotFound(city.to_string()));
            }
        };

        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::NotFound(city.to_string()))?;

        let place = entry.name.clone().unwrap_or_else(|| city.to_string());
        let coordinate = Coordinate::from(entry);
        tracing::info!("Resolved {:?} to {} ({})", city, place, coordinate);
        Ok(coordinate)
    }
}

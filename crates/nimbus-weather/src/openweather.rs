//! OpenWeatherMap wire formats and their conversion into the dashboard model.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::types::{
    AirQuality, Coordinate, ForecastPoint, UnitSystem, WeatherError, WeatherSnapshot,
};

#[derive(Debug, Deserialize)]
pub(crate) struct GeoEntry {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<GeoEntry> for Coordinate {
    fn from(e: GeoEntry) -> Self {
        Coordinate::new(e.lat, e.lon)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConditionEntry {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Sys {
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentResponse {
    #[serde(default)]
    pub name: String,
    pub dt: i64,
    pub main: CurrentMain,
    pub wind: Wind,
    pub weather: Vec<ConditionEntry>,
    pub sys: Sys,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastMain {
    pub temp: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastEntry {
    pub dt: i64,
    pub main: ForecastMain,
    pub weather: Vec<ConditionEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AirMain {
    pub aqi: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AirEntry {
    pub main: AirMain,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AirPollutionResponse {
    pub list: Vec<AirEntry>,
}

impl AirPollutionResponse {
    pub fn into_air_quality(self) -> AirQuality {
        self.list
            .into_iter()
            .next()
            .map(|e| AirQuality::from_index(e.main.aqi))
            .unwrap_or_else(AirQuality::unknown)
    }
}

/// Error body returned with non-2xx statuses, e.g. `{"cod":401,"message":"Invalid API key..."}`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Provider message from a raw error body, if it has one.
    pub fn message_from(text: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(text)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }
}

fn timestamp(secs: i64, field: &str) -> Result<DateTime<Utc>, WeatherError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| WeatherError::Parse(format!("{} out of range: {}", field, secs)))
}

impl ForecastEntry {
    fn into_point(self) -> Result<ForecastPoint, WeatherError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Parse("forecast entry without condition".into()))?;
        Ok(ForecastPoint {
            timestamp: timestamp(self.dt, "forecast dt")?,
            temperature: self.main.temp,
            icon: condition.icon,
            description: condition.description,
        })
    }
}

/// Combine the three responses into one snapshot.
///
/// `display_name` wins over the provider's place name when it is non-empty.
pub(crate) fn build_snapshot(
    current: CurrentResponse,
    forecast: ForecastResponse,
    air_quality: AirQuality,
    units: UnitSystem,
    display_name: Option<&str>,
) -> Result<WeatherSnapshot, WeatherError> {
    let condition = current
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::Parse("current weather without condition".into()))?;

    let forecast = forecast
        .list
        .into_iter()
        .map(ForecastEntry::into_point)
        .collect::<Result<Vec<_>, _>>()?;

    let city_name = display_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or(current.name);

    Ok(WeatherSnapshot {
        city_name,
        observed_at: timestamp(current.dt, "dt")?,
        temperature: current.main.temp,
        feels_like: current.main.feels_like,
        humidity: current.main.humidity,
        wind_speed: units.display_wind_speed(current.wind.speed),
        wind_direction: current.wind.deg,
        condition: condition.main,
        description: condition.description,
        icon: condition.icon,
        sunrise: timestamp(current.sys.sunrise, "sunrise")?,
        sunset: timestamp(current.sys.sunset, "sunset")?,
        air_quality,
        units,
        forecast,
    })
}

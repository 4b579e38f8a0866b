use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Display unit system. The provider is asked for data in this system directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Value of the provider's `units` parameter, also the stored form
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Metric => Self::Imperial,
            Self::Imperial => Self::Metric,
        }
    }

    pub fn temperature_suffix(self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }

    pub fn speed_suffix(self) -> &'static str {
        match self {
            Self::Metric => "km/h",
            Self::Imperial => "mph",
        }
    }

    /// Provider wind speed (m/s for metric, mph for imperial) in display units.
    pub fn display_wind_speed(self, provider_speed: f64) -> f64 {
        match self {
            Self::Metric => provider_speed * 3.6,
            Self::Imperial => provider_speed,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown unit system: {0}")]
pub struct UnknownUnitSystem(pub String);

impl FromStr for UnitSystem {
    type Err = UnknownUnitSystem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            other => Err(UnknownUnitSystem(other.to_string())),
        }
    }
}

/// Background theme derived from the provider's primary condition group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherTheme {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    #[default]
    Default,
}

impl WeatherTheme {
    /// Map an OpenWeatherMap `main` group ("Clear", "Drizzle", ...) to a theme.
    /// Mist, fog, haze and anything unrecognized use the default theme.
    pub fn from_condition(main: &str) -> Self {
        let condition = main.to_ascii_lowercase();
        if condition.contains("clear") {
            Self::Clear
        } else if condition.contains("cloud") {
            Self::Clouds
        } else if condition.contains("rain") || condition.contains("drizzle") {
            Self::Rain
        } else if condition.contains("snow") {
            Self::Snow
        } else if condition.contains("thunderstorm") {
            Self::Thunderstorm
        } else {
            Self::Default
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Clouds => "clouds",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Thunderstorm => "thunderstorm",
            Self::Default => "default",
        }
    }
}

/// Air quality category for the provider's 1-5 index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    Unknown,
}

impl AqiCategory {
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => Self::Good,
            2 => Self::Fair,
            3 => Self::Moderate,
            4 => Self::Poor,
            5 => Self::VeryPoor,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
            Self::Unknown => "Unknown",
        }
    }
}

/// Air quality reading; `index` is `None` when the provider gave nothing usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AirQuality {
    pub index: Option<i64>,
}

impl AirQuality {
    pub fn from_index(index: i64) -> Self {
        Self { index: Some(index) }
    }

    pub fn unknown() -> Self {
        Self { index: None }
    }

    pub fn category(&self) -> AqiCategory {
        self.index
            .map(AqiCategory::from_index)
            .unwrap_or(AqiCategory::Unknown)
    }
}

impl fmt::Display for AirQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{} ({})", self.category().label(), i),
            None => f.write_str(AqiCategory::Unknown.label()),
        }
    }
}

/// One 3-hour forecast sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub icon: String,
    pub description: String,
}

/// Hourly strip entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub icon: String,
    pub description: String,
}

impl From<&ForecastPoint> for HourlyPoint {
    fn from(p: &ForecastPoint) -> Self {
        Self {
            timestamp: p.timestamp,
            temperature: p.temperature,
            icon: p.icon.clone(),
            description: p.description.clone(),
        }
    }
}

/// One calendar day (UTC) of the multi-day outlook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub max_temp: f64,
    pub min_temp: f64,
    pub icon: String,
    pub description: String,
}

/// Everything the dashboard shows for one location, fetched in one cycle.
///
/// Unit-dependent fields (temperatures, wind speed) are in `units`.
/// Temperatures are kept unrounded; rounding happens when rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city_name: String,
    pub observed_at: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub wind_direction: Option<f64>,
    /// Primary condition group, e.g. "Rain"
    pub condition: String,
    pub description: String,
    pub icon: String,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub air_quality: AirQuality,
    pub units: UnitSystem,
    pub forecast: Vec<ForecastPoint>,
}

impl WeatherSnapshot {
    pub fn theme(&self) -> WeatherTheme {
        WeatherTheme::from_condition(&self.condition)
    }

    pub fn hourly(&self) -> Vec<HourlyPoint> {
        crate::forecast::summarize_hourly(&self.forecast)
    }

    /// Multi-day outlook excluding the observation day
    pub fn daily(&self) -> Vec<DailyAggregate> {
        crate::forecast::summarize_daily(&self.forecast, self.observed_at)
    }
}

/// Position lookup failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Position unavailable")]
    PositionUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location lookup unsupported")]
    Unsupported,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("City not found: {0}")]
    NotFound(String),
    #[error("Weather acquisition failed: {}", .0.as_deref().unwrap_or("no provider message"))]
    Acquisition(Option<String>),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aqi_categories() {
        assert_eq!(AqiCategory::from_index(1).label(), "Good");
        assert_eq!(AqiCategory::from_index(2).label(), "Fair");
        assert_eq!(AqiCategory::from_index(3).label(), "Moderate");
        assert_eq!(AqiCategory::from_index(4).label(), "Poor");
        assert_eq!(AqiCategory::from_index(5).label(), "Very Poor");
    }

    #[test]
    fn test_aqi_out_of_range_is_unknown() {
        assert_eq!(AqiCategory::from_index(0), AqiCategory::Unknown);
        assert_eq!(AqiCategory::from_index(7), AqiCategory::Unknown);
        assert_eq!(AqiCategory::from_index(-1), AqiCategory::Unknown);
    }

    #[test]
    fn test_air_quality_display() {
        assert_eq!(AirQuality::from_index(3).to_string(), "Moderate (3)");
        assert_eq!(AirQuality::from_index(7).to_string(), "Unknown (7)");
        assert_eq!(AirQuality::unknown().to_string(), "Unknown");
    }

    #[test]
    fn test_wind_conversion() {
        assert!((UnitSystem::Metric.display_wind_speed(5.0) - 18.0).abs() < 1e-9);
        assert_eq!(UnitSystem::Imperial.display_wind_speed(5.0), 5.0);
    }

    #[test]
    fn test_unit_round_trip_through_str() {
        for unit in [UnitSystem::Metric, UnitSystem::Imperial] {
            assert_eq!(unit.as_str().parse::<UnitSystem>(), Ok(unit));
        }
        assert_eq!(" Imperial ".parse::<UnitSystem>(), Ok(UnitSystem::Imperial));
        assert!("kelvin".parse::<UnitSystem>().is_err());
    }

    #[test]
    fn test_unit_toggle_and_suffixes() {
        assert_eq!(UnitSystem::Metric.toggled(), UnitSystem::Imperial);
        assert_eq!(UnitSystem::Imperial.toggled(), UnitSystem::Metric);
        assert_eq!(UnitSystem::Metric.temperature_suffix(), "°C");
        assert_eq!(UnitSystem::Imperial.speed_suffix(), "mph");
    }

    #[test]
    fn test_theme_mapping() {
        assert_eq!(WeatherTheme::from_condition("Clear"), WeatherTheme::Clear);
        assert_eq!(WeatherTheme::from_condition("Clouds"), WeatherTheme::Clouds);
        assert_eq!(WeatherTheme::from_condition("Drizzle"), WeatherTheme::Rain);
        assert_eq!(WeatherTheme::from_condition("Rain"), WeatherTheme::Rain);
        assert_eq!(WeatherTheme::from_condition("Snow"), WeatherTheme::Snow);
        assert_eq!(
            WeatherTheme::from_condition("Thunderstorm"),
            WeatherTheme::Thunderstorm
        );
        assert_eq!(WeatherTheme::from_condition("Mist"), WeatherTheme::Default);
        assert_eq!(WeatherTheme::from_condition(""), WeatherTheme::Default);
    }

    #[test]
    fn test_unit_serde_is_lowercase() {
        let json = serde_json::to_string(&UnitSystem::Imperial).unwrap();
        assert_eq!(json, "\"imperial\"");
    }
}

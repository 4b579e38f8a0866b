//! Weather acquisition for Nimbus
//!
//! Resolves city names with OpenWeatherMap geocoding, fetches current
//! conditions, forecast and air quality in one concurrent cycle, and reduces
//! the forecast into hourly and daily views.

pub mod countdown;
pub mod forecast;
pub mod geocode;
pub mod location;
mod openweather;
pub mod provider;
pub mod types;

pub use countdown::{countdown_at, Countdown, SunEvent};
pub use forecast::{summarize_daily, summarize_hourly};
pub use geocode::LocationResolver;
pub use location::{ConfiguredLocation, GeolocationProvider};
pub use provider::{build_client, AirQualityPolicy, WeatherAggregator};
pub use types::*;

use nimbus_core::{AppError, ReqwestErrorExt, WeatherError};
use nimbus_weather::WeatherError as ProviderError;

use super::IntoAppError;

impl IntoAppError for ProviderError {
    fn into_app_error(self) -> AppError {
        match self {
            ProviderError::NotFound(city) => AppError::Weather(WeatherError::CityNotFound(city)),
            ProviderError::Acquisition(message) => {
                AppError::Weather(WeatherError::Acquisition(message.unwrap_or_default()))
            }
            ProviderError::Network(e) => AppError::Network(e.into_network_error()),
            ProviderError::Location(e) => e.into_app_error(),
            ProviderError::Parse(detail) => {
                tracing::debug!("Unparseable weather payload: {}", detail);
                AppError::Weather(WeatherError::Acquisition(String::new()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_city_not_found() {
        let err = ProviderError::NotFound("Zzqx".into()).into_app_error();
        assert_eq!(err.user_message(), "City not found. Please check the spelling.");
    }

    #[test]
    fn acquisition_keeps_provider_message() {
        let err = ProviderError::Acquisition(Some("city not found".into())).into_app_error();
        assert_eq!(err.user_message(), "city not found");
    }

    #[test]
    fn acquisition_without_message_is_generic() {
        let err = ProviderError::Acquisition(None).into_app_error();
        assert_eq!(err.user_message(), "Could not fetch weather data.");
        let err = ProviderError::Parse("bad".into()).into_app_error();
        assert_eq!(err.user_message(), "Could not fetch weather data.");
    }
}

use nimbus_core::{AppError, LocationError};
use nimbus_weather::LocationError as ProviderLocationError;

use super::IntoAppError;

impl IntoAppError for ProviderLocationError {
    fn into_app_error(self) -> AppError {
        let mapped = match self {
            ProviderLocationError::PermissionDenied => LocationError::PermissionDenied,
            ProviderLocationError::PositionUnavailable => LocationError::PositionUnavailable,
            ProviderLocationError::Timeout => LocationError::Timeout,
            ProviderLocationError::Unsupported => LocationError::Unsupported,
        };
        AppError::Location(mapped)
    }
}

//! Centralized error types for Nimbus.
//!
//! Every failure the dashboard can show ends up as an `AppError`; the UI only
//! ever displays `user_message()`, while `Display` keeps the detail for logs.

use thiserror::Error;

/// Generic text shown when a weather request fails without a provider message.
pub const GENERIC_FETCH_MESSAGE: &str = "Could not fetch weather data.";

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("Voice input error: {0}")]
    Voice(#[from] VoiceError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the dashboard.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(e) => e.user_message().to_string(),
            AppError::Storage(e) => e.user_message().to_string(),
            AppError::Weather(e) => e.user_message(),
            AppError::Location(e) => e.user_message().to_string(),
            AppError::Voice(e) => e.user_message().to_string(),
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Local preference storage errors (SQLite).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Data corruption detected: {0}")]
    Corruption(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::Unavailable(_) => {
                "Unable to access saved preferences. Try restarting the app."
            }
            StorageError::QueryFailed(_) => "Saving your preferences failed. Please try again.",
            StorageError::Corruption(_) => {
                "Saved preferences may be corrupted. Consider resetting app data."
            }
        }
    }
}

/// Weather acquisition errors as the user sees them.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City not found: {0}")]
    CityNotFound(String),

    /// Carries the provider's own message when one was returned.
    #[error("Weather acquisition failed: {0}")]
    Acquisition(String),
}

impl WeatherError {
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::CityNotFound(_) => {
                "City not found. Please check the spelling.".to_string()
            }
            WeatherError::Acquisition(msg) if !msg.trim().is_empty() => msg.clone(),
            WeatherError::Acquisition(_) => GENERIC_FETCH_MESSAGE.to_string(),
        }
    }
}

/// Position lookup failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
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

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => "You denied the request for your location.",
            LocationError::PositionUnavailable => "Location information is unavailable.",
            LocationError::Timeout => "The request to get your location timed out.",
            LocationError::Unsupported => "Location lookup is not supported on this system.",
        }
    }
}

/// Speech recognition failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    #[error("No speech detected")]
    NoSpeech,

    #[error("No microphone available")]
    NoMicrophone,

    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("Speech recognition unsupported")]
    Unsupported,

    #[error("Speech recognition failed: {0}")]
    Other(String),
}

impl VoiceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            VoiceError::NoSpeech => "No speech was detected. Please try again.",
            VoiceError::NoMicrophone => "Microphone not found. Ensure it is enabled.",
            VoiceError::PermissionDenied => "Permission to use microphone was denied.",
            VoiceError::Unsupported => "Voice search is not supported on this system.",
            VoiceError::Other(_) => "An error occurred during voice recognition.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

/// Extension trait for converting rusqlite errors to our error types.
pub trait RusqliteErrorExt {
    fn into_storage_error(self) -> StorageError;
}

impl RusqliteErrorExt for rusqlite::Error {
    fn into_storage_error(self) -> StorageError {
        match &self {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("corrupt") => {
                StorageError::Corruption(self.to_string())
            }
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::CannotOpen =>
            {
                StorageError::Unavailable(self.to_string())
            }
            _ => StorageError::QueryFailed(self.to_string()),
        }
    }
}

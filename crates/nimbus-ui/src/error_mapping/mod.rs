//! Maps weather crate errors to nimbus_core::AppError for consistent user-facing messages.

mod location;
mod weather;

use nimbus_core::AppError;

/// Conversion into the application error taxonomy for types owned by other crates.
pub trait IntoAppError {
    fn into_app_error(self) -> AppError;
}

pub mod app;
pub mod config;
pub mod error;
pub mod op_state;

pub use app::App;
pub use config::{Config, LocationConfig, LoggingConfig, UiConfig, ValidationResult, WeatherConfig};
pub use error::{
    AppError, LocationError, NetworkError, ReqwestErrorExt, RusqliteErrorExt, StorageError,
    VoiceError, WeatherError,
};
pub use op_state::OpState;

use anyhow::Result;

/// Initialize logging. `RUST_LOG` wins over `default_level`.
///
/// Logs go to stderr so the dashboard on stdout stays readable.
pub fn init(default_level: &str) -> Result<()> {
    let level = if default_level.trim().is_empty() {
        "info"
    } else {
        default_level
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!("Nimbus core initialized");
    Ok(())
}

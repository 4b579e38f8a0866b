use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::config::ValidationResult;
use crate::Config;

/// Application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
    validation: ValidationResult,
}

impl App {
    /// Create a new application instance from the default or an explicit config file
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let (config, validation) = Config::load_validated(config_path)?;

        Ok(Self {
            config: Arc::new(config),
            validation,
        })
    }

    /// Build an application around an already loaded config
    pub fn with_config(config: Config) -> Self {
        let validation = config.validate();
        Self {
            config: Arc::new(config),
            validation,
        }
    }

    /// Prepare directories the dashboard writes to
    pub fn initialize(&mut self) -> Result<()> {
        tracing::info!(
            "Initializing application (config: {}, data: {})",
            self.config.config_dir.display(),
            self.config.data_dir.display()
        );

        std::fs::create_dir_all(&self.config.data_dir).with_context(|| {
            format!(
                "Failed to create data directory {}",
                self.config.data_dir.display()
            )
        })?;

        for warning in &self.validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        tracing::info!("Application initialized successfully");
        Ok(())
    }

    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the config for services
    pub fn shared_config(&self) -> Arc<Config> {
        self.config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.config_dir = dir.path().to_path_buf();
        config.data_dir = dir.path().join("data");

        let mut app = App::with_config(config);
        app.initialize().unwrap();

        assert!(dir.path().join("data").is_dir());
        assert_eq!(app.config().preferences_path(), dir.path().join("data/preferences.db"));
        app.shutdown().unwrap();
    }

    #[test]
    fn new_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "config_dir = \".\"\ndata_dir = \".\"\n\n[weather]\napi_base_url = \"nope\"\n",
        )
        .unwrap();

        assert!(App::new(Some(&path)).is_err());
    }
}

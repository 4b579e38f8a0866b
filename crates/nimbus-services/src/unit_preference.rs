use nimbus_core::StorageError;
use nimbus_weather::UnitSystem;

use crate::local_storage::LocalStorage;

/// Storage key; the value is "metric" or "imperial"
pub const UNIT_KEY: &str = "weather.unit";

/// The user's chosen unit system, persisted across runs.
#[derive(Clone)]
pub struct UnitPreference {
    storage: LocalStorage,
}

impl UnitPreference {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// Stored unit system; `Metric` when nothing usable is stored.
    pub fn load(&self) -> Result<UnitSystem, StorageError> {
        let stored = self.storage.get_item(UNIT_KEY)?;
        Ok(match stored {
            Some(value) => value.parse::<UnitSystem>().unwrap_or_else(|e| {
                tracing::warn!("Ignoring stored unit preference: {}", e);
                UnitSystem::default()
            }),
            None => UnitSystem::default(),
        })
    }

    /// Persist immediately.
    pub fn set(&self, unit: UnitSystem) -> Result<(), StorageError> {
        self.storage.set_item(UNIT_KEY, unit.as_str())?;
        tracing::info!("Unit preference set to {}", unit);
        Ok(())
    }
}

use nimbus_core::StorageError;

use crate::local_storage::LocalStorage;

/// Storage key; the value is a JSON array of city names
pub const FAVORITES_KEY: &str = "weather.favorites";

/// Favorite cities in the order they were added, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    cities: Vec<String>,
}

impl FavoritesSet {
    pub fn contains(&self, city: &str) -> bool {
        self.cities.iter().any(|c| c == city)
    }

    /// Add when absent, remove when present. Returns true if `city` is now a favorite.
    pub fn toggle(&mut self, city: &str) -> bool {
        if let Some(pos) = self.cities.iter().position(|c| c == city) {
            self.cities.remove(pos);
            false
        } else {
            self.cities.push(city.to_string());
            true
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.cities.iter().map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cities.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    fn decode(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(list) => {
                let mut set = Self::default();
                for city in list {
                    if !set.contains(&city) {
                        set.cities.push(city);
                    }
                }
                set
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable favorites: {}", e);
                Self::default()
            }
        }
    }

    fn encode(&self) -> String {
        serde_json::to_string(&self.cities).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Persisted favorites. Every mutation is written through immediately.
#[derive(Clone)]
pub struct FavoritesStore {
    storage: LocalStorage,
}

impl FavoritesStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> Result<FavoritesSet, StorageError> {
        let raw = self.storage.get_item(FAVORITES_KEY)?;
        Ok(FavoritesSet::decode(raw.as_deref()))
    }

    /// Flip membership of `city` and persist; returns the updated set.
    pub fn toggle(&self, city: &str) -> Result<FavoritesSet, StorageError> {
        let mut result = FavoritesSet::default();
        self.storage.update_item(FAVORITES_KEY, |raw| {
            let mut set = FavoritesSet::decode(raw.as_deref());
            let added = set.toggle(city);
            tracing::info!(
                "{} favorite {:?}",
                if added { "Added" } else { "Removed" },
                city
            );
            let encoded = set.encode();
            result = set;
            encoded
        })?;
        Ok(result)
    }

    pub fn contains(&self, city: &str) -> Result<bool, StorageError> {
        Ok(self.load()?.contains(city))
    }
}

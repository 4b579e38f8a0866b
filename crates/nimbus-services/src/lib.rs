//! Persisted user preferences: unit system and favorite cities.

pub mod favorites;
pub mod local_storage;
pub mod unit_preference;

pub use favorites::{FavoritesSet, FavoritesStore, FAVORITES_KEY};
pub use local_storage::LocalStorage;
pub use unit_preference::{UnitPreference, UNIT_KEY};

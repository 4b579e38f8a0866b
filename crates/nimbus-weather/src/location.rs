//! Where the user is. The dashboard asks a `GeolocationProvider`; how the
//! position is obtained is up to the implementation.

use async_trait::async_trait;

use crate::types::{Coordinate, LocationError};

#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinate, LocationError>;

    /// False when the provider can never answer (no position source at all)
    fn is_available(&self) -> bool {
        true
    }
}

/// Reports a position configured ahead of time, or `Unsupported` without one.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocation {
    position: Option<Coordinate>,
}

impl ConfiguredLocation {
    pub fn new(position: Option<Coordinate>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl GeolocationProvider for ConfiguredLocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        match self.position {
            Some(coordinate) => {
                tracing::debug!("Using configured position {}", coordinate);
                Ok(coordinate)
            }
            None => Err(LocationError::Unsupported),
        }
    }

    fn is_available(&self) -> bool {
        self.position.is_some()
    }
}

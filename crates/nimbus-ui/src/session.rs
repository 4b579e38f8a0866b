//! Everything the dashboard remembers between intents.

use nimbus_core::OpState;
use nimbus_services::FavoritesSet;
use nimbus_weather::{UnitSystem, WeatherSnapshot, WeatherTheme};

#[derive(Debug, Default)]
pub struct SessionState {
    pub op_state: OpState,
    pub units: UnitSystem,
    /// Last successfully displayed city; unit toggles and favorites act on it
    pub current_city: Option<String>,
    pub snapshot: Option<WeatherSnapshot>,
    /// User-facing message of the last failed acquisition
    pub error: Option<String>,
    /// Short status line (listening, heard, rejected input)
    pub notice: Option<String>,
    pub favorites: FavoritesSet,
}

impl SessionState {
    pub fn new(units: UnitSystem, favorites: FavoritesSet) -> Self {
        Self {
            units,
            favorites,
            ..Self::default()
        }
    }

    /// Enter a busy state; the previous result is hidden while it runs.
    pub fn begin(&mut self, state: OpState) {
        self.op_state = state;
        self.snapshot = None;
        self.error = None;
        self.notice = None;
    }

    pub fn apply_snapshot(&mut self, snapshot: WeatherSnapshot) {
        self.op_state = self.op_state.on_acquire_done();
        self.current_city = Some(snapshot.city_name.clone());
        self.snapshot = Some(snapshot);
        self.error = None;
    }

    /// A failure replaces whatever was shown with a single message.
    pub fn apply_error(&mut self, message: String) {
        self.op_state = self.op_state.on_acquire_done();
        self.snapshot = None;
        self.error = Some(message);
    }

    pub fn controls_enabled(&self) -> bool {
        self.op_state.controls_enabled()
    }

    pub fn is_favorite(&self) -> bool {
        self.current_city
            .as_deref()
            .is_some_and(|city| self.favorites.contains(city))
    }

    pub fn theme(&self) -> WeatherTheme {
        self.snapshot
            .as_ref()
            .map(WeatherSnapshot::theme)
            .unwrap_or_default()
    }
}

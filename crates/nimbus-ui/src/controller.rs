use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use nimbus_core::{AppError, OpState};
use nimbus_services::{FavoritesStore, UnitPreference};
use nimbus_weather::Countdown;
use tokio::runtime::Handle;

use crate::intent::Intent;
use crate::services::weather_service::{self, WeatherServiceMessage, WeatherServices};
use crate::services::CountdownTicker;
use crate::session::SessionState;
use crate::view::DashboardView;

/// Turns intents into background work and applies the results to the session.
///
/// Only one acquisition (search, location or voice) runs at a time; while it
/// runs those intents are rejected. Results are applied by `poll_channel` or
/// `wait_settled` on the caller's thread.
pub struct DashboardController {
    runtime: Handle,
    services: Arc<WeatherServices>,
    units: UnitPreference,
    favorites: FavoritesStore,
    session: SessionState,
    countdown: CountdownTicker,
    countdown_enabled: bool,
    tx: Sender<WeatherServiceMessage>,
    rx: Receiver<WeatherServiceMessage>,
}

impl DashboardController {
    /// Load stored preferences and start with an empty dashboard.
    pub fn new(
        runtime: Handle,
        services: WeatherServices,
        units: UnitPreference,
        favorites: FavoritesStore,
    ) -> Result<Self, AppError> {
        let unit = units.load()?;
        let favorite_set = favorites.load()?;
        let (tx, rx) = mpsc::channel();

        tracing::info!(
            "Dashboard ready ({} units, {} favorites)",
            unit,
            favorite_set.len()
        );

        Ok(Self {
            runtime,
            services: Arc::new(services),
            units,
            favorites,
            session: SessionState::new(unit, favorite_set),
            countdown: CountdownTicker::new(),
            countdown_enabled: true,
            tx,
            rx,
        })
    }

    pub fn with_countdown(mut self, enabled: bool) -> Self {
        self.countdown_enabled = enabled;
        self
    }

    /// Handle one intent. Returns false when it was rejected or had nothing to do.
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        tracing::debug!("Dispatching {:?}", intent);
        match intent {
            Intent::Search(text) => self.handle_search(&text),
            Intent::UseLocation => self.handle_use_location(),
            Intent::VoiceSearch => self.handle_voice_search(),
            Intent::ToggleFavorite => self.handle_toggle_favorite(),
            Intent::ToggleUnit => self.handle_toggle_unit(),
            Intent::OpenFavorite(index) => self.handle_open_favorite(index),
        }
    }

    fn handle_search(&mut self, text: &str) -> bool {
        let city = text.trim();
        if city.is_empty() {
            return false;
        }
        if !self.try_begin(OpState::Acquiring) {
            return false;
        }
        weather_service::request_search(
            &self.runtime,
            &self.tx,
            self.services.clone(),
            city.to_string(),
            self.session.units,
        );
        true
    }

    fn handle_use_location(&mut self) -> bool {
        if !self.try_begin(OpState::Locating) {
            return false;
        }
        weather_service::request_locate(
            &self.runtime,
            &self.tx,
            self.services.clone(),
            self.session.units,
        );
        true
    }

    fn handle_voice_search(&mut self) -> bool {
        if !self.try_begin(OpState::Listening) {
            return false;
        }
        weather_service::request_voice(
            &self.runtime,
            &self.tx,
            self.services.clone(),
            self.session.units,
        );
        true
    }

    fn handle_toggle_favorite(&mut self) -> bool {
        // The dashboard is blank while busy; there is nothing shown to star.
        if !self.session.controls_enabled() {
            tracing::warn!("Favorite toggle ignored while busy");
            return false;
        }
        let Some(city) = self.session.current_city.clone() else {
            self.session.notice = Some("Search for a city before adding it to favorites.".into());
            return false;
        };

        match self.favorites.toggle(&city) {
            Ok(set) => {
                self.session.favorites = set;
                true
            }
            Err(e) => {
                tracing::error!("Failed to update favorites: {}", e);
                self.session.notice = Some(AppError::from(e).user_message());
                false
            }
        }
    }

    fn handle_toggle_unit(&mut self) -> bool {
        if !self.session.controls_enabled() {
            tracing::warn!("Unit toggle ignored while busy");
            return false;
        }

        let next = self.session.units.toggled();
        if let Err(e) = self.units.set(next) {
            tracing::error!("Failed to save unit preference: {}", e);
            self.session.notice = Some(AppError::from(e).user_message());
            return false;
        }
        self.session.units = next;

        // Unit-dependent values must never be shown in the old system.
        match self.session.current_city.clone() {
            Some(city) => self.handle_search(&city),
            None => {
                self.session.snapshot = None;
                true
            }
        }
    }

    fn handle_open_favorite(&mut self, index: usize) -> bool {
        match self.session.favorites.get(index).map(str::to_string) {
            Some(city) => self.handle_search(&city),
            None => {
                self.session.notice = Some(format!("No favorite #{}.", index + 1));
                false
            }
        }
    }

    /// Enter `state` unless something is already running.
    fn try_begin(&mut self, state: OpState) -> bool {
        if !self.session.op_state.can_start_acquire() {
            tracing::warn!(
                "Ignoring request while {:?} is in progress",
                self.session.op_state
            );
            return false;
        }
        self.countdown.stop();
        self.session.begin(state);
        true
    }

    /// Apply every message that has already arrived. Returns how many were applied.
    pub fn poll_channel(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.apply(msg);
            applied += 1;
        }
        applied
    }

    /// Block until the running acquisition finishes or `timeout` passes.
    /// Returns true when the dashboard is idle again.
    pub fn wait_settled(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.poll_channel();

        while !self.session.op_state.can_start_acquire() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.rx.recv_timeout(remaining) {
                Ok(msg) => self.apply(msg),
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    fn apply(&mut self, msg: WeatherServiceMessage) {
        match msg {
            WeatherServiceMessage::Located(coordinate) => {
                tracing::debug!("Located at {}", coordinate);
                self.session.op_state = self.session.op_state.on_located();
            }
            WeatherServiceMessage::Heard(transcript) => {
                self.session.op_state = self.session.op_state.on_heard();
                self.session.notice = Some(format!("Heard \"{}\"", transcript));
            }
            WeatherServiceMessage::FetchDone(Ok(snapshot)) => {
                tracing::info!("Showing weather for {}", snapshot.city_name);
                if self.countdown_enabled {
                    self.countdown
                        .start(&self.runtime, snapshot.sunrise, snapshot.sunset);
                }
                self.session.apply_snapshot(snapshot);
            }
            WeatherServiceMessage::FetchDone(Err(e)) => {
                tracing::error!("Weather request failed: {}", e);
                self.countdown.stop();
                self.session.apply_error(e.user_message());
            }
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn controls_enabled(&self) -> bool {
        self.session.controls_enabled()
    }

    pub fn countdown(&self) -> Option<Countdown> {
        self.countdown.current()
    }

    pub fn view(&self) -> DashboardView<'_> {
        DashboardView::new(&self.session, self.countdown.current())
    }
}

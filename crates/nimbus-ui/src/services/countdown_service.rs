//! Live countdown to the next sunrise/sunset, refreshed every second.

use chrono::{DateTime, Utc};
use nimbus_weather::{countdown_at, Countdown};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct TickerState {
    generation: u64,
    value: Option<Countdown>,
}

/// Owns at most one running countdown task.
///
/// Starting a new countdown cancels the previous one. A cancelled task never
/// writes again: every write is checked against the current generation.
#[derive(Default)]
pub struct CountdownTicker {
    token: Option<CancellationToken>,
    state: Arc<RwLock<TickerState>>,
}

impl CountdownTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(
        &mut self,
        runtime: &tokio::runtime::Handle,
        sunrise: DateTime<Utc>,
        sunset: DateTime<Utc>,
    ) {
        self.stop();

        let generation = {
            let mut state = self.state.write();
            state.value = Some(countdown_at(Utc::now(), sunrise, sunset));
            state.generation
        };

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let state = self.state.clone();

        runtime.spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = interval.tick() => {
                        let mut state = state.write();
                        if state.generation != generation {
                            break;
                        }
                        state.value = Some(countdown_at(Utc::now(), sunrise, sunset));
                    }
                }
            }
            tracing::trace!("Countdown task {} finished", generation);
        });

        self.token = Some(token);
    }

    pub fn stop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        let mut state = self.state.write();
        state.generation = state.generation.wrapping_add(1);
        state.value = None;
    }

    pub fn current(&self) -> Option<Countdown> {
        self.state.read().value
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use nimbus_weather::SunEvent;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn start_publishes_value_immediately() {
        let rt = runtime();
        let mut ticker = CountdownTicker::new();
        let now = Utc::now();
        ticker.start(rt.handle(), now + ChronoDuration::hours(2), now + ChronoDuration::hours(14));

        let current = ticker.current().unwrap();
        assert_eq!(current.event, SunEvent::Sunrise);
    }

    #[test]
    fn stop_clears_value() {
        let rt = runtime();
        let mut ticker = CountdownTicker::new();
        let now = Utc::now();
        ticker.start(rt.handle(), now - ChronoDuration::hours(2), now + ChronoDuration::hours(8));
        ticker.stop();

        assert!(ticker.current().is_none());
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert!(ticker.current().is_none());
    }

    #[test]
    fn restart_replaces_previous_countdown() {
        let rt = runtime();
        let mut ticker = CountdownTicker::new();
        let now = Utc::now();
        ticker.start(rt.handle(), now + ChronoDuration::hours(1), now + ChronoDuration::hours(12));
        ticker.start(rt.handle(), now - ChronoDuration::hours(1), now + ChronoDuration::hours(3));

        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert_eq!(ticker.current().unwrap().event, SunEvent::Sunset);
    }
}

//! Time remaining until the next sunrise or sunset.

use chrono::{DateTime, Duration, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunEvent {
    Sunrise,
    Sunset,
}

impl SunEvent {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sunrise => "Sunrise",
            Self::Sunset => "Sunset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub event: SunEvent,
    pub remaining: Duration,
}

impl Countdown {
    /// Remaining time as `HH:MM:SS`
    pub fn hms(&self) -> String {
        let total = self.remaining.num_seconds().max(0);
        format!(
            "{:02}:{:02}:{:02}",
            total / 3600,
            (total % 3600) / 60,
            total % 60
        )
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.event.label(), self.hms())
    }
}

/// Next sun event after `now` for one day's sunrise/sunset.
///
/// After sunset the target is the same sunrise shifted by one day.
pub fn countdown_at(now: DateTime<Utc>, sunrise: DateTime<Utc>, sunset: DateTime<Utc>) -> Countdown {
    let (event, target) = if now < sunrise {
        (SunEvent::Sunrise, sunrise)
    } else if now < sunset {
        (SunEvent::Sunset, sunset)
    } else {
        (SunEvent::Sunrise, sunrise + Duration::days(1))
    };

    Countdown {
        event,
        remaining: target - now,
    }
}

//! Plain-text rendering of the session.
//!
//! Temperatures are rounded here and nowhere else; wind keeps one decimal.

use chrono::{DateTime, Local, TimeZone, Timelike};
use nimbus_core::OpState;
use nimbus_weather::{Countdown, DailyAggregate, HourlyPoint, UnitSystem, WeatherSnapshot};
use std::fmt::{self, Write as _};

use crate::session::SessionState;

pub struct DashboardView<'a> {
    session: &'a SessionState,
    countdown: Option<Countdown>,
}

impl<'a> DashboardView<'a> {
    pub fn new(session: &'a SessionState, countdown: Option<Countdown>) -> Self {
        Self { session, countdown }
    }
}

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.session;

        match session.op_state {
            OpState::Idle => {}
            OpState::Locating => writeln!(f, "Finding your location...")?,
            OpState::Listening => writeln!(f, "Listening... say (type) a city name")?,
            OpState::Acquiring => writeln!(f, "Fetching weather...")?,
        }
        if let Some(notice) = &session.notice {
            writeln!(f, "{}", notice)?;
        }

        if let Some(error) = &session.error {
            writeln!(f, "! {}", error)?;
        } else if let Some(snapshot) = &session.snapshot {
            write_snapshot(f, snapshot, session.is_favorite(), self.countdown)?;
        }

        if !session.favorites.is_empty() {
            let list = session
                .favorites
                .iter()
                .enumerate()
                .fold(String::new(), |mut acc, (i, city)| {
                    let _ = write!(acc, "  [{}] {}", i + 1, city);
                    acc
                });
            writeln!(f, "Favorites:{}", list)?;
        }

        let unit_label = match session.units {
            UnitSystem::Metric => "Metric (°C, km/h)",
            UnitSystem::Imperial => "Imperial (°F, mph)",
        };
        write!(f, "Units: {}", unit_label)
    }
}

fn write_snapshot(
    f: &mut fmt::Formatter<'_>,
    s: &WeatherSnapshot,
    favorite: bool,
    countdown: Option<Countdown>,
) -> fmt::Result {
    let t = s.units.temperature_suffix();
    let star = if favorite { "★" } else { "☆" };

    writeln!(f, "{} {}  [{}]", s.city_name, star, s.theme().name())?;
    writeln!(
        f,
        "  {} {}{}  {}",
        icon_glyph(&s.icon),
        round_temp(s.temperature),
        t,
        s.description
    )?;
    write!(
        f,
        "  Feels like {}{} | Humidity {}% | Wind {:.1} {}",
        round_temp(s.feels_like),
        t,
        s.humidity,
        s.wind_speed,
        s.units.speed_suffix()
    )?;
    match s.wind_direction {
        Some(deg) => writeln!(f, " {} ({:.0}°)", wind_arrow(deg), deg)?,
        None => writeln!(f)?,
    }
    writeln!(f, "  Air quality: {}", s.air_quality)?;
    write!(
        f,
        "  Sunrise {} | Sunset {}",
        clock_time(&s.sunrise.with_timezone(&Local)),
        clock_time(&s.sunset.with_timezone(&Local))
    )?;
    match countdown {
        Some(c) => writeln!(f, " | {}", c)?,
        None => writeln!(f)?,
    }

    let hourly = s.hourly();
    if !hourly.is_empty() {
        writeln!(f, "  Next 24 hours:")?;
        writeln!(f, "   {}", hourly_line(&hourly, t, &Local))?;
    }

    let daily = s.daily();
    if !daily.is_empty() {
        writeln!(f, "  Next days:")?;
        for day in &daily {
            writeln!(f, "   {}", daily_line(day))?;
        }
    }
    Ok(())
}

/// Round half up, the way the dashboard has always shown temperatures.
pub fn round_temp(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// "3pm", "12am"
pub fn hour_label<Tz: TimeZone>(time: &DateTime<Tz>) -> String {
    let (pm, hour) = time.hour12();
    format!("{}{}", hour, if pm { "pm" } else { "am" })
}

/// "06:42 AM"
fn clock_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    time.format("%I:%M %p").to_string()
}

fn hourly_line<Tz: TimeZone>(points: &[HourlyPoint], suffix: &str, tz: &Tz) -> String {
    points
        .iter()
        .map(|p| {
            format!(
                "{} {} {}{}",
                hour_label(&p.timestamp.with_timezone(tz)),
                icon_glyph(&p.icon),
                round_temp(p.temperature),
                suffix
            )
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// "Tue ☁ 14°/8° broken clouds"
pub fn daily_line(day: &DailyAggregate) -> String {
    format!(
        "{} {} {}°/{}° {}",
        day.date.format("%a"),
        icon_glyph(&day.icon),
        round_temp(day.max_temp),
        round_temp(day.min_temp),
        day.description
    )
}

/// Terminal stand-in for the provider's icon codes ("10d", "01n", ...)
pub fn icon_glyph(icon: &str) -> &'static str {
    match icon.get(..2).unwrap_or_default() {
        "01" => "☀",
        "02" => "⛅",
        "03" | "04" => "☁",
        "09" | "10" => "🌧",
        "11" => "⛈",
        "13" => "❄",
        "50" => "🌫",
        _ => "·",
    }
}

/// Arrow pointing where the wind blows to, from its meteorological direction.
fn wind_arrow(degrees: f64) -> &'static str {
    const ARROWS: [&str; 8] = ["↓", "↙", "←", "↖", "↑", "↗", "→", "↘"];
    let index = ((degrees.rem_euclid(360.0) + 22.5) / 45.0).floor() as usize % 8;
    ARROWS[index]
}

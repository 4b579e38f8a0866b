use clap::{Parser, ValueEnum};
use nimbus_ui::Intent;
use nimbus_weather::UnitSystem;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "nimbus", version, about = "Terminal weather dashboard")]
pub struct Args {
    /// Config file to use instead of <config dir>/nimbus/config.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Switch and remember the unit system before the first fetch
    #[arg(long, value_enum)]
    pub units: Option<UnitsArg>,

    /// Show one dashboard and exit instead of reading commands
    #[arg(long, default_value_t = false)]
    pub once: bool,

    /// Keep preferences in memory only
    #[arg(long, default_value_t = false)]
    pub ephemeral: bool,

    /// City to show first; without one the configured position is used
    pub city: Vec<String>,
}

impl Args {
    pub fn initial_city(&self) -> Option<String> {
        let city = self.city.join(" ");
        let city = city.trim();
        (!city.is_empty()).then(|| city.to_string())
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitsArg {
    Metric,
    Imperial,
}

impl From<UnitsArg> for UnitSystem {
    fn from(arg: UnitsArg) -> Self {
        match arg {
            UnitsArg::Metric => UnitSystem::Metric,
            UnitsArg::Imperial => UnitSystem::Imperial,
        }
    }
}

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    Favorites,
    Countdown,
    Suggest(String),
    Show,
    Help,
    Quit,
    Invalid(String),
}

pub const HELP: &str = "\
Commands:
  <city> | search <city>   show the weather for a city
  locate                   use your configured position
  voice                    dictate a city name on the next line
  fav                      add or remove the shown city from favorites
  favs                     list favorites
  open <n>                 show favorite number n
  units                    switch between metric and imperial
  countdown                time until the next sunrise or sunset
  suggest <prefix>         city name suggestions
  show                     print the dashboard again
  help                     this text
  quit                     exit";

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "" | "show" => Command::Show,
        "search" | "s" => Command::Intent(Intent::Search(rest.to_string())),
        "locate" | "here" => Command::Intent(Intent::UseLocation),
        "voice" | "listen" => Command::Intent(Intent::VoiceSearch),
        "fav" => Command::Intent(Intent::ToggleFavorite),
        "favs" | "favorites" => Command::Favorites,
        "open" => match rest.parse::<usize>() {
            Ok(n) if n > 0 => Command::Intent(Intent::OpenFavorite(n - 1)),
            _ => Command::Invalid(format!("'open' needs a favorite number, got '{}'", rest)),
        },
        "units" | "unit" => Command::Intent(Intent::ToggleUnit),
        "countdown" => Command::Countdown,
        "suggest" => Command::Suggest(rest.to_string()),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Intent(Intent::Search(line.to_string())),
    }
}

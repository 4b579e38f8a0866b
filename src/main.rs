use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use nimbus_core::{App, Config};
use nimbus_services::{FavoritesStore, LocalStorage, UnitPreference};
use nimbus_ui::{CitySuggestions, DashboardController, Intent, StdinDictation, WeatherServices};
use nimbus_weather::{
    build_client, AirQualityPolicy, ConfiguredLocation, Coordinate, GeolocationProvider,
    LocationResolver, WeatherAggregator,
};

mod cli;

use cli::{Command, HELP};

/// How often the prompt loop re-checks a running acquisition.
const SETTLE_STEP: Duration = Duration::from_millis(250);

fn main() -> Result<ExitCode> {
    let args = cli::Args::parse();

    let mut app = App::new(args.config.as_deref())?;
    nimbus_core::init(&app.config().logging.level)?;
    app.initialize()?;
    let config = app.shared_config();

    tracing::info!("Nimbus starting");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("nimbus-tokio")
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let storage = if args.ephemeral {
        LocalStorage::in_memory()?
    } else {
        LocalStorage::open(&config.preferences_path())?
    };

    let units = UnitPreference::new(storage.clone());
    if let Some(unit) = args.units {
        units.set(unit.into())?;
    }

    let services = build_services(&config)?;
    let location_available = services.geolocation.is_available();

    let mut controller = DashboardController::new(
        runtime.handle().clone(),
        services,
        units,
        FavoritesStore::new(storage),
    )?
    .with_countdown(config.ui.countdown && !args.once);

    let first = match args.initial_city() {
        Some(city) => Some(Intent::Search(city)),
        None if location_available && config.ui.locate_on_startup => Some(Intent::UseLocation),
        None => None,
    };
    if let Some(intent) = first {
        run_intent(&mut controller, intent);
    }

    let code = if args.once {
        println!("{}", controller.view());
        if controller.session().error.is_some() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    } else {
        if controller.session().snapshot.is_some() || controller.session().error.is_some() {
            println!("{}", controller.view());
        }
        prompt_loop(&mut controller, &config)?;
        ExitCode::SUCCESS
    };

    drop(controller);
    runtime.shutdown_timeout(Duration::from_secs(1));
    app.shutdown()?;
    Ok(code)
}

fn build_services(config: &Config) -> Result<WeatherServices> {
    let api_key = config.weather.effective_api_key().unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!("No OpenWeatherMap API key configured; requests will be rejected");
    }

    let client = Arc::new(
        build_client(Duration::from_secs(config.weather.timeout_secs))
            .context("Failed to build HTTP client")?,
    );

    let policy = if config.weather.tolerate_air_quality_failure {
        AirQualityPolicy::BestEffort
    } else {
        AirQualityPolicy::Required
    };

    let position = config
        .location
        .position()
        .map(|(latitude, longitude)| Coordinate::new(latitude, longitude));
    let geolocation: Arc<dyn GeolocationProvider> = Arc::new(ConfiguredLocation::new(position));

    Ok(WeatherServices {
        resolver: LocationResolver::new(client.clone(), &config.weather.geo_base_url, &api_key),
        aggregator: WeatherAggregator::new(client, &config.weather.api_base_url, &api_key)
            .with_air_quality_policy(policy),
        geolocation,
        speech: Arc::new(StdinDictation),
    })
}

/// Dispatch and block until the dashboard is idle again.
///
/// Voice search reads the next stdin line itself, so the prompt must not
/// read until it has settled.
fn run_intent(controller: &mut DashboardController, intent: Intent) {
    let listening = matches!(intent, Intent::VoiceSearch);
    if !controller.dispatch(intent) {
        if let Some(notice) = &controller.session().notice {
            println!("{}", notice);
        }
        return;
    }
    if listening {
        println!("{}", controller.view());
        let _ = io::stdout().flush();
    }
    while !controller.wait_settled(SETTLE_STEP) {}
}

fn prompt_loop(controller: &mut DashboardController, config: &Config) -> Result<()> {
    let suggestions = CitySuggestions::new(&config.ui.suggestions);
    println!("Type a city name, or 'help' for commands.");

    loop {
        print!("nimbus> ");
        io::stdout().flush().context("Failed to write prompt")?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line).context("Failed to read command")? == 0 {
            break;
        }

        match cli::parse(&line) {
            Command::Intent(intent) => {
                run_intent(controller, intent);
                println!("{}", controller.view());
            }
            Command::Favorites => {
                let favorites = &controller.session().favorites;
                if favorites.is_empty() {
                    println!("No favorites yet. Show a city and type 'fav'.");
                }
                for (i, city) in favorites.iter().enumerate() {
                    println!("  [{}] {}", i + 1, city);
                }
            }
            Command::Countdown => match controller.countdown() {
                Some(countdown) => println!("{}", countdown),
                None => println!("No sun times to count down to."),
            },
            Command::Suggest(prefix) => {
                let matches = suggestions.matching(&prefix);
                if matches.is_empty() {
                    println!("No suggestions for '{}'.", prefix);
                } else {
                    println!("{}", matches.join(", "));
                }
            }
            Command::Show => {
                controller.poll_channel();
                println!("{}", controller.view());
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
            Command::Invalid(message) => println!("{}", message),
        }
    }

    tracing::info!("Leaving prompt");
    Ok(())
}

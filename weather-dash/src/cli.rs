use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, InquireError, Select, Text, validator::Validation};
use weather_dash_core::{
    Config, FileSystemPersistence, TemperatureUnit, WeatherStateStore, source_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dash", version, about = "Weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Display unit, "C" or "F"; overrides the configured default.
    #[arg(long, global = true, value_parser = parse_unit)]
    pub unit: Option<TemperatureUnit>,

    /// Directory holding favorites and recent searches.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Seed for reproducible mock weather.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Skip the simulated network latency.
    #[arg(long, global = true)]
    pub no_delay: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Edit the stored configuration interactively.
    Configure,

    /// Show current conditions and the forecast.
    Show,

    /// Look up weather for a location.
    Search {
        /// Location, conventionally "City, Country".
        query: String,
    },

    /// Show weather for this device's location.
    Locate,

    /// Add or remove a location from favorites.
    Favorite {
        /// Location to toggle; the default location if absent.
        query: Option<String>,
    },

    /// List favorite locations.
    Favorites,

    /// List recent searches.
    Recent,

    /// Menu-driven dashboard session.
    Interactive,
}

fn parse_unit(value: &str) -> Result<TemperatureUnit, String> {
    TemperatureUnit::try_from(value).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        if let Command::Configure = self.command {
            return configure(config);
        }

        let store = self.build_store(config).await?;

        let outcome = match &self.command {
            Command::Configure => Ok(()),
            Command::Show => {
                print_dashboard(&store);
                Ok(())
            }
            Command::Search { query } => {
                run_search(&store, query).await;
                print_dashboard(&store);
                Ok(())
            }
            Command::Locate => {
                run_locate(&store).await;
                print_dashboard(&store);
                Ok(())
            }
            Command::Favorite { query } => favorite(&store, query.as_deref()).await,
            Command::Favorites => {
                print!("{}", render::favorites(&store.snapshot().favorites));
                Ok(())
            }
            Command::Recent => {
                print!("{}", render::recent(&store.snapshot().recent_searches));
                Ok(())
            }
            Command::Interactive => interactive(&store).await,
        };

        if let Err(e) = store.flush().await {
            tracing::warn!(error = %e, "could not flush pending writes");
        }

        outcome
    }

    async fn build_store(&self, mut config: Config) -> anyhow::Result<WeatherStateStore> {
        if let Some(unit) = self.unit {
            config.default_unit = unit;
        }
        if let Some(seed) = self.seed {
            config.mock.seed = Some(seed);
        }
        if self.no_delay {
            config.mock.search_latency_ms = 0;
            config.mock.location_latency_ms = 0;
        }

        let data_dir = match self.data_dir.clone().or_else(|| config.data_dir.clone()) {
            Some(dir) => dir,
            None => FileSystemPersistence::default_dir()?,
        };
        tracing::debug!(data_dir = %data_dir.display(), "using data directory");

        let store = WeatherStateStore::new(
            source_from_config(&config),
            Arc::new(FileSystemPersistence::new(data_dir)),
            config.store_options(),
        )
        .await;

        Ok(store)
    }
}

async fn run_search(store: &WeatherStateStore, query: &str) {
    println!("Fetching the latest forecast for {query}...");
    store.search(query).await;
}

async fn run_locate(store: &WeatherStateStore) {
    println!("Finding your location...");
    store.use_current_location().await;
}

/// Toggle the location `query` resolves to, or the current location when
/// there is no query. A failed lookup leaves favorites untouched.
async fn favorite(store: &WeatherStateStore, query: Option<&str>) -> anyhow::Result<()> {
    if let Some(query) = query {
        run_search(store, query).await;
        if let Some(error) = store.snapshot().error {
            anyhow::bail!("{error}; favorites unchanged");
        }
    }

    toggle_current_favorite(store);
    Ok(())
}

fn toggle_current_favorite(store: &WeatherStateStore) {
    let location = store.snapshot().current.location;
    store.toggle_favorite(&location);

    if store.snapshot().current.is_favorite {
        println!("★ Added {location} to favorites");
    } else {
        println!("Removed {location} from favorites");
    }
}

fn print_dashboard(store: &WeatherStateStore) {
    let state = store.snapshot();
    println!("{}", render::current(&state));
    println!("{}", render::hourly_forecast(&state.forecast, state.unit));
    print!("{}", render::daily_forecast(&state.forecast, state.unit));
}

/// Answer to an optional prompt inside the menu loop.
#[derive(Debug, PartialEq)]
enum Reply<T> {
    Answer(T),
    Skipped,
    Quit,
}

/// Esc skips the prompt; Ctrl-C ends the session.
fn reply<T>(answer: Result<Option<T>, InquireError>, what: &str) -> anyhow::Result<Reply<T>> {
    match answer {
        Ok(Some(value)) => Ok(Reply::Answer(value)),
        Ok(None) => Ok(Reply::Skipped),
        Err(InquireError::OperationInterrupted) => Ok(Reply::Quit),
        Err(e) => Err(e).with_context(|| format!("Failed to read {what}")),
    }
}

const SEARCH: &str = "Search a location";
const LOCATE: &str = "Use my location";
const TOGGLE_UNIT: &str = "Switch °C/°F";
const TOGGLE_FAVORITE: &str = "Add/remove favorite";
const OPEN_FAVORITE: &str = "Open a favorite";
const RECENT: &str = "Recent searches";
const QUIT: &str = "Quit";

async fn interactive(store: &WeatherStateStore) -> anyhow::Result<()> {
    print_dashboard(store);

    loop {
        let actions =
            vec![SEARCH, LOCATE, TOGGLE_UNIT, TOGGLE_FAVORITE, OPEN_FAVORITE, RECENT, QUIT];

        let choice = match reply(Select::new("What next?", actions).prompt_skippable(), "menu")? {
            Reply::Answer(choice) => choice,
            Reply::Skipped | Reply::Quit => break,
        };

        match choice {
            SEARCH => {
                let answer = Text::new("Location (City, Country):")
                    .with_validator(|input: &str| {
                        if input.trim().is_empty() {
                            Ok(Validation::Invalid("Please enter a location".into()))
                        } else {
                            Ok(Validation::Valid)
                        }
                    })
                    .prompt_skippable();

                match reply(answer, "location")? {
                    Reply::Answer(query) => {
                        run_search(store, query.trim()).await;
                        print_dashboard(store);
                    }
                    Reply::Skipped => {}
                    Reply::Quit => break,
                }
            }
            LOCATE => {
                run_locate(store).await;
                print_dashboard(store);
            }
            TOGGLE_UNIT => {
                store.toggle_unit();
                print_dashboard(store);
            }
            TOGGLE_FAVORITE => toggle_current_favorite(store),
            OPEN_FAVORITE => {
                let favorites = store.snapshot().favorites;
                if favorites.is_empty() {
                    print!("{}", render::favorites(&favorites));
                    continue;
                }

                let names: Vec<String> =
                    favorites.iter().map(|fav| format!("{}, {}", fav.name, fav.country)).collect();
                match reply(Select::new("Favorite:", names).prompt_skippable(), "favorite")? {
                    Reply::Answer(query) => {
                        run_search(store, &query).await;
                        print_dashboard(store);
                    }
                    Reply::Skipped => {}
                    Reply::Quit => break,
                }
            }
            RECENT => print!("{}", render::recent(&store.snapshot().recent_searches)),
            _ => break,
        }
    }

    Ok(())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let units = vec![TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit];
    let start = units.iter().position(|u| *u == config.default_unit).unwrap_or(0);
    let labels: Vec<&str> = units.iter().map(|u| u.symbol()).collect();

    let picked = Select::new("Default unit:", labels)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read default unit")?;
    config.default_unit = TemperatureUnit::try_from(picked)?;

    config.request_timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.request_timeout_secs)
        .with_validator(|secs: &u64| {
            if *secs == 0 {
                Ok(Validation::Invalid("Timeout must be at least 1 second".into()))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt()
        .context("Failed to read request timeout")?;

    config.mock.search_latency_ms = CustomType::<u64>::new("Simulated search latency (ms):")
        .with_default(config.mock.search_latency_ms)
        .prompt()
        .context("Failed to read search latency")?;

    config.mock.location_latency_ms = CustomType::<u64>::new("Simulated location latency (ms):")
        .with_default(config.mock.location_latency_ms)
        .prompt()
        .context("Failed to read location latency")?;

    config.mock.failure_rate = CustomType::<f64>::new("Simulated failure rate (0.0 - 1.0):")
        .with_default(config.mock.failure_rate)
        .with_validator(|rate: &f64| {
            if (0.0..=1.0).contains(rate) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid("Enter a value between 0.0 and 1.0".into()))
            }
        })
        .prompt()
        .context("Failed to read failure rate")?;

    config.validate()?;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

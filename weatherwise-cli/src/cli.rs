use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use weatherwise_core::{
    Config, Coordinates, FilePreferenceStore, FixedPosition, PreferenceStore, SearchError,
    Services, SystemClock, WeatherSession, provider::provider_from_config,
};

use crate::render::TerminalSink;

const CONFIG_FILE: &str = "config.toml";
const PREFERENCES_FILE: &str = "preferences.toml";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherwise", version, about = "Current weather, forecast and air quality")]
pub struct Cli {
    /// Directory holding config.toml and preferences.toml.
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, optionally with region and country, e.g. "Paris, FR".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },

    /// Show weather for a position given as coordinates.
    Here {
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Show weather for the last city again.
    Refresh,

    /// Switch between Celsius and Fahrenheit; toggles when no unit is given.
    Units { unit: Option<UnitChoice> },

    /// Switch between dark and light theme; toggles when no theme is given.
    Theme { theme: Option<ThemeChoice> },

    /// List recent searches, most recent first.
    Recent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitChoice {
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeChoice {
    Dark,
    Light,
}

/// Where config and preferences live for this invocation.
struct Paths {
    config: PathBuf,
    preferences: FilePreferenceStore,
}

impl Paths {
    fn resolve(config_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        match config_dir {
            Some(dir) => Ok(Self {
                config: dir.join(CONFIG_FILE),
                preferences: FilePreferenceStore::new(dir.join(PREFERENCES_FILE)),
            }),
            None => Ok(Self {
                config: Config::config_file_path()?,
                preferences: FilePreferenceStore::in_config_dir()?,
            }),
        }
    }

    fn open_session(&self) -> anyhow::Result<WeatherSession> {
        tracing::debug!(config = %self.config.display(), "loading configuration");

        let config = Config::load_from(&self.config)?;
        let provider = provider_from_config(&config)?;
        let clock = SystemClock::in_zone(config.viewer_zone()?);

        WeatherSession::new(
            Services::from_provider(provider).with_clock(Arc::new(clock)),
            Box::new(self.preferences.clone()),
        )
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let paths = Paths::resolve(self.config_dir)?;

        match self.command {
            Command::Configure => configure(&paths)?,
            Command::Show { city } => {
                let mut session = paths.open_session()?;
                let result = session.search(&city.join(" ")).await.map(|_| ());
                return Ok(finish(&session, result));
            }
            Command::Here { lat, lon } => {
                let position = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));
                let mut session = paths.open_session()?;
                let result = session.search_here(&FixedPosition(position)).await.map(|_| ());
                return Ok(finish(&session, result));
            }
            Command::Refresh => {
                let mut session = paths.open_session()?;
                let result = session.retry().await.map(|_| ());
                return Ok(finish(&session, result));
            }
            Command::Units { unit } => {
                let store = &paths.preferences;
                let mut prefs = store.load()?;
                match unit {
                    Some(choice) => prefs.use_celsius = choice == UnitChoice::Celsius,
                    None => {
                        prefs.toggle_units();
                    }
                }
                store.save(&prefs)?;

                let name = if prefs.use_celsius { "Celsius" } else { "Fahrenheit" };
                println!("Temperature unit changed to {name}");
            }
            Command::Theme { theme } => {
                let store = &paths.preferences;
                let mut prefs = store.load()?;
                match theme {
                    Some(choice) => prefs.use_dark_theme = choice == ThemeChoice::Dark,
                    None => {
                        prefs.toggle_theme();
                    }
                }
                store.save(&prefs)?;

                let name = if prefs.use_dark_theme { "dark" } else { "light" };
                println!("Theme changed to {name}");
            }
            Command::Recent => {
                let prefs = paths.preferences.load()?;
                if prefs.recent_cities.is_empty() {
                    println!("No recent searches.");
                }
                for city in &prefs.recent_cities {
                    println!("{city}");
                }
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}

fn configure(paths: &Paths) -> anyhow::Result<()> {
    let mut config = Config::load_from(&paths.config)?;

    let api_key = inquire::Password::new("OpenWeatherMap API key:")
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Create one at https://openweathermap.org/api")
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.require_api_key()?;
    config.save_to(&paths.config)?;

    println!("Saved API key to {}", paths.config.display());
    Ok(())
}

/// Renders whatever the session ended up with and maps failure to a non-zero exit.
fn finish(session: &WeatherSession, result: Result<(), SearchError>) -> ExitCode {
    let mut sink = TerminalSink::new();
    session.present(&mut sink);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

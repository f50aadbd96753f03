use anyhow::{Context, anyhow, bail};
use chrono::Timelike;
use clap::{Parser, Subcommand};
use inquire::{
    CustomType, CustomUserError, Text,
    validator::{ErrorMessage, Validation},
};
use std::sync::Arc;
use weather_core::{
    Config, ErrorKind, SearchOutcome, TempUnit, Theme, WeatherError, WeatherService,
    WeatherSnapshot, codes, store::FilePersistence,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively edit provider and cache settings.
    Configure,

    /// Show current conditions and forecast.
    Show {
        /// Place name, or "lat,lon" coordinates.
        query: String,

        /// Print the snapshot as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Number of hourly entries to print.
        #[arg(long, default_value_t = 24)]
        hours: usize,
    },

    /// Print a one-line summary suitable for sharing.
    Share {
        /// Place name, or "lat,lon" coordinates.
        query: String,
    },

    /// Set the temperature unit (C or F).
    Unit { unit: String },

    /// Set the theme (light or dark).
    Theme { theme: String },

    /// Set the interface language, e.g. "en" or "es".
    Language { code: String },

    /// Add a favorite location, or remove it if already present.
    Favorite { name: String },

    /// List favorite locations.
    Favorites,

    /// List recent searches.
    History {
        /// Forget all recent searches.
        #[arg(long)]
        clear: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        if let Command::Configure = self.command {
            // A broken file must not lock the user out of fixing it.
            let config = Config::load().unwrap_or_else(|err| {
                tracing::warn!("ignoring unreadable config: {err:#}");
                Config::default()
            });
            return configure(config);
        }

        let config = Config::load()?;
        let service = WeatherService::from_config(&config)?;

        match self.command {
            Command::Configure => {}
            Command::Show { query, json, hours } => {
                let snapshot = search(&service, &query).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&*snapshot)?);
                } else {
                    let prefs = service.preferences();
                    let night = codes::is_night_hour(chrono::Local::now().hour());
                    print!("{}", render::snapshot(&snapshot, &prefs, hours, night));
                }
            }
            Command::Share { query } => {
                let snapshot = search(&service, &query).await?;
                println!("{}", render::share_text(&snapshot, service.preferences().temp_unit));
            }
            Command::Unit { unit } => {
                let unit = TempUnit::try_from(unit.as_str())?;
                service.mutate_preferences(|store| store.set_temp_unit(unit));
                println!("Temperature unit set to °{unit}.");
            }
            Command::Theme { theme } => {
                let theme = Theme::try_from(theme.as_str())?;
                service.mutate_preferences(|store| store.set_theme(theme));
                println!("Theme set to {theme}.");
            }
            Command::Language { code } => {
                let code = code.trim();
                if code.is_empty() {
                    bail!("Language code must not be empty.");
                }
                service.mutate_preferences(|store| store.set_language(code));
                println!("Language set to {code}.");
            }
            Command::Favorite { name } => {
                if service.mutate_preferences(|store| store.toggle_favorite(&name)) {
                    println!("Added {name} to favorites.");
                } else {
                    println!("Removed {name} from favorites.");
                }
            }
            Command::Favorites => {
                let prefs = service.preferences();
                if prefs.favorites.is_empty() {
                    println!("No favorite locations yet.");
                }
                for name in &prefs.favorites {
                    println!("{name}");
                }
            }
            Command::History { clear } => {
                if clear {
                    service.mutate_preferences(|store| store.clear_history());
                    println!("Search history cleared.");
                } else {
                    let history = service.history();
                    if history.is_empty() {
                        println!("No recent searches.");
                    }
                    for (i, name) in history.entries().iter().enumerate() {
                        println!("{:>2}. {name}", i + 1);
                    }
                }
            }
        }

        Ok(())
    }
}

async fn search(
    service: &WeatherService<FilePersistence>,
    query: &str,
) -> anyhow::Result<Arc<WeatherSnapshot>> {
    match service.search(query).await {
        Ok(SearchOutcome::Current(snapshot)) => Ok(snapshot),
        Ok(SearchOutcome::Superseded) => bail!("Search for '{query}' was superseded."),
        Err(err) => Err(user_facing(err, query)),
    }
}

fn user_facing(err: WeatherError, query: &str) -> anyhow::Error {
    match err.kind() {
        ErrorKind::NotFound => anyhow!("No place matches '{query}'."),
        ErrorKind::Unavailable => {
            anyhow::Error::new(err).context("The weather service is unavailable, try again later")
        }
        ErrorKind::Malformed => {
            anyhow::Error::new(err).context("The weather service returned data we could not read")
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let language = Text::new("Geocoding language:")
        .with_default(&config.language)
        .with_validator(non_blank)
        .prompt()
        .context("Configuration cancelled")?;
    config.language = language.trim().to_string();

    config.cache_ttl_secs = CustomType::<u64>::new("Cache freshness window (seconds):")
        .with_default(config.cache_ttl_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Configuration cancelled")?;

    config.max_retries = CustomType::<u32>::new("Retries after a failed request:")
        .with_default(config.max_retries)
        .with_error_message("Please enter a whole number")
        .prompt()
        .context("Configuration cancelled")?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn non_blank(input: &str) -> Result<Validation, CustomUserError> {
    if input.trim().is_empty() {
        Ok(Validation::Invalid(ErrorMessage::Custom(
            "Please enter a language code, e.g. \"en\"".into(),
        )))
    } else {
        Ok(Validation::Valid)
    }
}
